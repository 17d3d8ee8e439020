use super::dimension::Dimension;
use super::unit_definitions::UnitRegistry;
use super::unit_value::{MAX_POWER, NamedUnit, UnitValue};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Unrecognizable unit pattern '{input}': {reason}")]
pub struct UnitParseError {
    pub input: String,
    pub reason: String,
}

impl UnitParseError {
    pub fn new(input: &str, reason: &str) -> Self {
        UnitParseError {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Recursive descent parser for unit strings.
///
/// Grammar:
/// ```text
/// product  := power (('*' | '/' | <juxtaposition>) power)*
/// power    := atom (('**' | '^') exponent)?
/// atom     := '(' product ')' | '1' | 'unit(' raw ')' | symbol
/// exponent := ['+' | '-'] digits | '(' ['+' | '-'] digits ')'
/// ```
/// The literal `1` is the only number accepted, so a string that reduces to a bare
/// numeric ratio like `1/2` is rejected.
pub struct UnitParser<'a> {
    registry: &'a UnitRegistry,
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> UnitParser<'a> {
    pub fn new(registry: &'a UnitRegistry, input: &'a str) -> Self {
        UnitParser {
            registry,
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    pub fn parse(mut self) -> Result<UnitValue, UnitParseError> {
        if self.input.trim().is_empty() {
            return Err(self.error("empty unit string"));
        }
        let value = self.product()?;
        self.skip_ws();
        if self.pos < self.chars.len() {
            return Err(self.error(&format!("unexpected '{}'", self.chars[self.pos])));
        }
        Ok(value)
    }

    fn error(&self, reason: &str) -> UnitParseError {
        UnitParseError::new(self.input, reason)
    }

    fn skip_ws(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn starts_atom(c: char) -> bool {
        c == '(' || c == '1' || is_symbol_char(c)
    }

    fn product(&mut self) -> Result<UnitValue, UnitParseError> {
        let mut value = self.power()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('*') if self.chars.get(self.pos + 1) != Some(&'*') => {
                    self.pos += 1;
                    let rhs = self.power()?;
                    value = self.in_range(value.checked_mul(&rhs))?;
                }
                Some('/') => {
                    self.pos += 1;
                    let rhs = self.power()?;
                    value = self.in_range(value.checked_div(&rhs))?;
                }
                Some(c) if Self::starts_atom(c) => {
                    let rhs = self.power()?;
                    value = self.in_range(value.checked_mul(&rhs))?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn power(&mut self) -> Result<UnitValue, UnitParseError> {
        let base = self.atom()?;
        self.skip_ws();
        let has_power = if self.input[self.byte_pos()..].starts_with("**") {
            self.pos += 2;
            true
        } else if self.peek() == Some('^') {
            self.pos += 1;
            true
        } else {
            false
        };
        if has_power {
            let exponent = self.exponent()?;
            self.in_range(base.checked_powi(exponent))
        } else {
            Ok(base)
        }
    }

    fn in_range(&self, value: Option<UnitValue>) -> Result<UnitValue, UnitParseError> {
        value.ok_or_else(|| {
            self.error(&format!("powers must stay within ±{}", MAX_POWER))
        })
    }

    fn byte_pos(&self) -> usize {
        self.chars[..self.pos].iter().map(|c| c.len_utf8()).sum()
    }

    fn exponent(&mut self) -> Result<i32, UnitParseError> {
        self.skip_ws();
        let parenthesized = self.peek() == Some('(');
        if parenthesized {
            self.pos += 1;
            self.skip_ws();
        }
        let mut text = String::new();
        if let Some(sign) = self.peek().filter(|c| *c == '-' || *c == '+') {
            text.push(sign);
            self.pos += 1;
        }
        while let Some(c) = self.peek().filter(|c| c.is_ascii_digit()) {
            text.push(c);
            self.pos += 1;
        }
        if matches!(self.peek(), Some('.') | Some('e') | Some('E')) {
            return Err(self.error("only integer powers are supported"));
        }
        let exponent: i32 = text
            .parse()
            .map_err(|_| self.error("expected an integer power"))?;
        if !(-MAX_POWER..=MAX_POWER).contains(&exponent) {
            return Err(self.error(&format!("power {} is out of range", exponent)));
        }
        if parenthesized {
            self.skip_ws();
            if self.peek() != Some(')') {
                return Err(self.error("unbalanced parentheses in power"));
            }
            self.pos += 1;
        }
        Ok(exponent)
    }

    fn atom(&mut self) -> Result<UnitValue, UnitParseError> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let inner = self.product()?;
                self.skip_ws();
                if self.peek() != Some(')') {
                    return Err(self.error("unbalanced parentheses"));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some('1') => {
                self.pos += 1;
                if self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
                    return Err(self.error("numeric factors are not units"));
                }
                Ok(UnitValue::dimensionless())
            }
            Some(c) if is_symbol_char(c) => {
                let start = self.pos;
                while self.peek().is_some_and(is_symbol_char) {
                    self.pos += 1;
                }
                let symbol: String = self.chars[start..self.pos].iter().collect();
                if symbol == "unit" && self.peek() == Some('(') {
                    return self.opaque();
                }
                self.registry
                    .lookup(&symbol)
                    .map(UnitValue::from_named)
                    .ok_or_else(|| self.error(&format!("unknown unit '{}'", symbol)))
            }
            Some(c) => Err(self.error(&format!("unexpected '{}'", c))),
            None => Err(self.error("unexpected end of unit string")),
        }
    }

    /// `unit(<raw pattern>)`: everything up to the balancing parenthesis is the tag.
    fn opaque(&mut self) -> Result<UnitValue, UnitParseError> {
        // at '('
        self.pos += 1;
        let start = self.pos;
        let mut depth = 1;
        while let Some(c) = self.peek() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        if depth != 0 {
            return Err(self.error("unbalanced parentheses in unit() tag"));
        }
        let tag: String = self.chars[start..self.pos].iter().collect();
        self.pos += 1;
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(self.error("empty unit() tag"));
        }
        Ok(UnitValue::from_named(NamedUnit::new(
            &format!("unit({})", tag),
            1.0,
            Dimension::opaque(tag),
        )))
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}
