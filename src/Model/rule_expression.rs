//! Text patterns of the host modeling language.
//!
//! `A(b=None) + B(a=None) | A(b=1) % B(a=1)` is a reversible rule whose reactant side
//! has two complex patterns and whose product side has one. `>>` marks an
//! irreversible rule, `|` or `<>` a reversible one, `+` separates complex patterns,
//! `%` joins monomer patterns bound into one complex and `None` (or `0`) stands for
//! an empty side.
use super::components::Monomer;
use super::model_errors::ModelError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn monomer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_]\w*)\s*(?:\((.*)\))?\s*$").unwrap()
    })
}

fn site_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_]\w*)\s*=\s*(\S.*?)\s*$").unwrap()
    })
}

/// Splits on `separator` outside parentheses and quotes.
fn split_top_level<'a>(text: &'a str, separator: char) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'') | (None, '"') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth -= 1,
            (None, c) if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn find_top_level(text: &str, token: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && text[i..].starts_with(token) => return Some(i),
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteCondition {
    pub site: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonomerPattern {
    pub monomer: String,
    pub sites: Vec<SiteCondition>,
}

impl MonomerPattern {
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let invalid = |reason: &str| ModelError::InvalidPattern {
            pattern: text.trim().to_string(),
            reason: reason.to_string(),
        };
        let caps = monomer_regex()
            .captures(text)
            .ok_or_else(|| invalid("expected Monomer(site=condition, ...)"))?;
        let monomer = caps[1].to_string();
        let mut sites = Vec::new();
        if let Some(inner) = caps.get(2) {
            for assignment in split_top_level(inner.as_str(), ',') {
                if assignment.trim().is_empty() {
                    continue;
                }
                let site = site_regex()
                    .captures(assignment)
                    .ok_or_else(|| invalid("site conditions look like site=value"))?;
                sites.push(SiteCondition {
                    site: site[1].to_string(),
                    condition: site[2].to_string(),
                });
            }
        }
        Ok(MonomerPattern { monomer, sites })
    }

    /// Checks the monomer, its sites and any quoted state against the declarations.
    pub fn validate(&self, monomers: &[Monomer]) -> Result<(), ModelError> {
        let monomer = monomers
            .iter()
            .find(|m| m.name == self.monomer)
            .ok_or_else(|| ModelError::UnknownMonomer(self.monomer.clone()))?;
        for condition in &self.sites {
            if !monomer.sites.contains(&condition.site) {
                return Err(ModelError::UnknownSite {
                    monomer: monomer.name.clone(),
                    site: condition.site.clone(),
                });
            }
            let state = condition.condition.trim_matches(|c: char| c == '\'' || c == '"');
            if state.len() != condition.condition.len() {
                if let Some(states) = monomer.site_states.get(&condition.site) {
                    if !states.iter().any(|s| s == state) {
                        return Err(ModelError::InvalidPattern {
                            pattern: self.to_string(),
                            reason: format!(
                                "state '{}' is not declared for site '{}'",
                                state, condition.site
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for MonomerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sites: Vec<String> = self
            .sites
            .iter()
            .map(|s| format!("{}={}", s.site, s.condition))
            .collect();
        write!(f, "{}({})", self.monomer, sites.join(", "))
    }
}

/// Monomer patterns bound together with `%`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexPattern {
    pub monomer_patterns: Vec<MonomerPattern>,
}

impl ComplexPattern {
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let monomer_patterns = split_top_level(text, '%')
            .into_iter()
            .map(MonomerPattern::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ComplexPattern { monomer_patterns })
    }

    pub fn validate(&self, monomers: &[Monomer]) -> Result<(), ModelError> {
        self.monomer_patterns
            .iter()
            .try_for_each(|mp| mp.validate(monomers))
    }
}

impl fmt::Display for ComplexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.monomer_patterns.iter().map(|m| m.to_string()).collect();
        write!(f, "{}", parts.join(" % "))
    }
}

/// Complex patterns joined with `+`; the number of them is the molecularity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReactionPattern {
    pub complex_patterns: Vec<ComplexPattern>,
}

impl ReactionPattern {
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let trimmed = text.trim();
        if trimmed == "None" || trimmed == "0" {
            return Ok(ReactionPattern::default());
        }
        let complex_patterns = split_top_level(trimmed, '+')
            .into_iter()
            .map(ComplexPattern::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReactionPattern { complex_patterns })
    }

    pub fn validate(&self, monomers: &[Monomer]) -> Result<(), ModelError> {
        self.complex_patterns
            .iter()
            .try_for_each(|cp| cp.validate(monomers))
    }
}

impl fmt::Display for ReactionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.complex_patterns.is_empty() {
            return write!(f, "None");
        }
        let parts: Vec<String> = self.complex_patterns.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(" + "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleExpression {
    pub reactant_pattern: ReactionPattern,
    pub product_pattern: ReactionPattern,
    pub is_reversible: bool,
}

impl RuleExpression {
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let invalid = |reason: &str| ModelError::InvalidRuleExpression {
            expression: text.to_string(),
            reason: reason.to_string(),
        };
        let (split_at, token_len, is_reversible) = if let Some(i) = find_top_level(text, "<>") {
            (i, 2, true)
        } else if let Some(i) = find_top_level(text, ">>") {
            (i, 2, false)
        } else if let Some(i) = find_top_level(text, "|") {
            (i, 1, true)
        } else {
            return Err(invalid("expected '>>', '|' or '<>'"));
        };
        let (lhs, rhs) = (&text[..split_at], &text[split_at + token_len..]);
        if lhs.trim().is_empty() || rhs.trim().is_empty() {
            return Err(invalid("both sides are required, use None for an empty side"));
        }
        let reactant_pattern = ReactionPattern::parse(lhs)?;
        let product_pattern = ReactionPattern::parse(rhs)?;
        Ok(RuleExpression {
            reactant_pattern,
            product_pattern,
            is_reversible,
        })
    }

    pub fn validate(&self, monomers: &[Monomer]) -> Result<(), ModelError> {
        self.reactant_pattern.validate(monomers)?;
        self.product_pattern.validate(monomers)
    }

    pub fn forward_order(&self) -> usize {
        self.reactant_pattern.complex_patterns.len()
    }

    pub fn reverse_order(&self) -> usize {
        self.product_pattern.complex_patterns.len()
    }
}

impl fmt::Display for RuleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.is_reversible { "|" } else { ">>" };
        write!(f, "{} {} {}", self.reactant_pattern, arrow, self.product_pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monomers() -> Vec<Monomer> {
        vec![
            Monomer::new("EGF", &["R"], &[]),
            Monomer::new("EGFR", &["L", "CR1", "Y1068"], &[("Y1068", &["U", "P"])]),
        ]
    }

    #[test]
    fn test_reversible_binding() {
        let rule =
            RuleExpression::parse("EGF(R=None) + EGFR(L=None) | EGF(R=1) % EGFR(L=1)").unwrap();
        assert!(rule.is_reversible);
        assert_eq!(rule.forward_order(), 2);
        assert_eq!(rule.reverse_order(), 1);
        assert_eq!(rule.product_pattern.complex_patterns[0].monomer_patterns.len(), 2);
        rule.validate(&monomers()).unwrap();
        assert_eq!(
            rule.to_string(),
            "EGF(R=None) + EGFR(L=None) | EGF(R=1) % EGFR(L=1)"
        );
    }

    #[test]
    fn test_synthesis_and_degradation() {
        let synth = RuleExpression::parse("None >> EGF()").unwrap();
        assert!(!synth.is_reversible);
        assert_eq!(synth.forward_order(), 0);
        let deg = RuleExpression::parse("EGF(R=None) >> 0").unwrap();
        assert_eq!(deg.reverse_order(), 0);
    }

    #[test]
    fn test_states_and_unknown_names() {
        let ok = ReactionPattern::parse("EGFR(Y1068='P')").unwrap();
        ok.validate(&monomers()).unwrap();
        let bad_state = ReactionPattern::parse("EGFR(Y1068='X')").unwrap();
        assert!(matches!(
            bad_state.validate(&monomers()),
            Err(ModelError::InvalidPattern { .. })
        ));
        let bad_site = ReactionPattern::parse("EGF(Q=None)").unwrap();
        assert!(matches!(
            bad_site.validate(&monomers()),
            Err(ModelError::UnknownSite { .. })
        ));
        let bad_monomer = ReactionPattern::parse("TNF()").unwrap();
        assert!(matches!(
            bad_monomer.validate(&monomers()),
            Err(ModelError::UnknownMonomer(_))
        ));
    }

    #[test]
    fn test_malformed_rules() {
        assert!(RuleExpression::parse("EGF() + EGFR()").is_err());
        assert!(RuleExpression::parse(" >> EGF()").is_err());
        assert!(RuleExpression::parse("EGF(R=) >> None").is_err());
        assert!(RuleExpression::parse("1EGF() >> None").is_err());
    }
}
