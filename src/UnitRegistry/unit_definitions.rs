//! Built-in unit symbols, SI prefixes and the process-wide registry instance.
use super::dimension::{
    AMOUNT, BASE_QUANTITIES, CELL, CURRENT, Dimension, LENGTH, LUMINOSITY, MASS, MOLECULES,
    TEMPERATURE, TIME,
};
use super::unit_parser::{UnitParseError, UnitParser};
use super::unit_value::{MAX_POWER, NamedUnit, UnitValue};
use log::info;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Avogadro constant, 1/mol
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// SI prefixes. `da` precedes `d` so that the longest prefix is tried first.
pub const SI_PREFIXES: [(&str, f64); 22] = [
    ("da", 1e1),
    ("Y", 1e24),
    ("Z", 1e21),
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("h", 1e2),
    ("d", 1e-1),
    ("c", 1e-2),
    ("m", 1e-3),
    ("u", 1e-6),
    ("µ", 1e-6),
    ("μ", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
    ("z", 1e-21),
    ("y", 1e-24),
];

/// Prefixes accepted by molar concentration. Large prefixes are excluded so that
/// `MM` or `kM` never shadow other readings.
const MOLAR_PREFIXES: [&str; 10] = ["d", "c", "m", "u", "µ", "μ", "n", "p", "f", "a"];

#[derive(Debug, Clone, PartialEq)]
pub enum PrefixPolicy {
    NoPrefixes,
    AllPrefixes,
    Only(Vec<String>),
}

impl PrefixPolicy {
    fn allows(&self, prefix: &str) -> bool {
        match self {
            PrefixPolicy::NoPrefixes => false,
            PrefixPolicy::AllPrefixes => true,
            PrefixPolicy::Only(list) => list.iter().any(|p| p == prefix),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnitDefinition {
    pub unit: NamedUnit,
    pub prefixes: PrefixPolicy,
    pub doc: String,
}

/// Table of unit symbols known to the parser.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    definitions: HashMap<String, UnitDefinition>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Registry with the built-in time, length, volume, mass, amount, molar,
    /// counting and a few thermodynamic units.
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            definitions: HashMap::new(),
        };
        let d = Dimension::dimensionless;
        let all = PrefixPolicy::AllPrefixes;
        let none = PrefixPolicy::NoPrefixes;
        let builtins: Vec<(&str, f64, Dimension, PrefixPolicy, &str)> = vec![
            ("s", 1.0, d().with(TIME, 1), all.clone(), "second"),
            ("min", 60.0, d().with(TIME, 1), none.clone(), "minute"),
            ("h", 3600.0, d().with(TIME, 1), none.clone(), "hour"),
            ("d", 86400.0, d().with(TIME, 1), none.clone(), "day"),
            ("m", 1.0, d().with(LENGTH, 1), all.clone(), "meter"),
            ("L", 1e-3, d().with(LENGTH, 3), all.clone(), "liter"),
            ("l", 1e-3, d().with(LENGTH, 3), all.clone(), "liter"),
            ("g", 1e-3, d().with(MASS, 1), all.clone(), "gram"),
            ("mcg", 1e-9, d().with(MASS, 1), none.clone(), "alias for microgram (ug)"),
            ("mol", 1.0, d().with(AMOUNT, 1), all.clone(), "mole"),
            (
                "M",
                1e3,
                d().with(AMOUNT, 1).with(LENGTH, -3),
                PrefixPolicy::Only(MOLAR_PREFIXES.iter().map(|p| p.to_string()).collect()),
                "molar concentration (M)",
            ),
            ("cell", 1.0, d().with(CELL, 1), none.clone(), "cell unit"),
            ("molecules", 1.0, d().with(MOLECULES, 1), none.clone(), "number of molecules"),
            ("molecule", 1.0, d().with(MOLECULES, 1), none.clone(), "number of molecules"),
            ("Hz", 1.0, d().with(TIME, -1), all.clone(), "hertz"),
            ("K", 1.0, d().with(TEMPERATURE, 1), all.clone(), "kelvin"),
            ("A", 1.0, d().with(CURRENT, 1), all.clone(), "ampere"),
            ("cd", 1.0, d().with(LUMINOSITY, 1), none.clone(), "candela"),
            (
                "J",
                1.0,
                d().with(MASS, 1).with(LENGTH, 2).with(TIME, -2),
                all.clone(),
                "joule",
            ),
            (
                "cal",
                4.184,
                d().with(MASS, 1).with(LENGTH, 2).with(TIME, -2),
                all.clone(),
                "calorie",
            ),
            (
                "N",
                1.0,
                d().with(MASS, 1).with(LENGTH, 1).with(TIME, -2),
                all.clone(),
                "newton",
            ),
            (
                "Pa",
                1.0,
                d().with(MASS, 1).with(LENGTH, -1).with(TIME, -2),
                all,
                "pascal",
            ),
        ];
        for (symbol, scale, dimension, prefixes, doc) in builtins {
            registry.insert(symbol, scale, dimension, prefixes, doc);
        }
        registry
    }

    fn insert(
        &mut self,
        symbol: &str,
        scale: f64,
        dimension: Dimension,
        prefixes: PrefixPolicy,
        doc: &str,
    ) {
        self.definitions.insert(
            symbol.to_string(),
            UnitDefinition {
                unit: NamedUnit::new(symbol, scale, dimension),
                prefixes,
                doc: doc.to_string(),
            },
        );
    }

    /// Defines a new unit symbol at runtime. Symbols that already resolve, bare or
    /// prefixed, are rejected.
    ///
    /// With `definition == None` the symbol becomes a new base dimension of its own
    /// (like `cell`); otherwise it is defined in terms of existing units, e.g.
    /// `define_unit("fl_oz", Some("mL"), false)` followed by scaling in the value.
    pub fn define_unit(
        &mut self,
        symbol: &str,
        definition: Option<&str>,
        prefixes: bool,
    ) -> Result<(), UnitParseError> {
        if symbol.is_empty() || !symbol.chars().all(|c| c.is_alphabetic() || c == '_') {
            return Err(UnitParseError::new(symbol, "unit symbols must be alphabetic"));
        }
        if symbol == "unit" {
            return Err(UnitParseError::new(symbol, "'unit' is reserved for unit(<pattern>) tags"));
        }
        if let Some(existing) = self.lookup(symbol) {
            return Err(UnitParseError::new(
                symbol,
                &format!("already defined as a unit of {}", existing.physical_type()),
            ));
        }
        let (scale, dimension) = match definition {
            Some(def) => {
                let value = self.parse(def)?;
                let dimension = value.dimension();
                if dimension.max_exponent() > MAX_POWER {
                    return Err(UnitParseError::new(
                        def,
                        &format!("dimension {} has powers beyond ±{}", dimension, MAX_POWER),
                    ));
                }
                (value.scale(), dimension)
            }
            None if BASE_QUANTITIES.contains(&symbol) => {
                return Err(UnitParseError::new(
                    symbol,
                    "name is reserved for a built-in base quantity",
                ));
            }
            None => (1.0, Dimension::base(symbol)),
        };
        let policy = if prefixes {
            PrefixPolicy::AllPrefixes
        } else {
            PrefixPolicy::NoPrefixes
        };
        info!("defining unit '{}' ({})", symbol, dimension);
        self.insert(symbol, scale, dimension, policy, definition.unwrap_or(symbol));
        Ok(())
    }

    /// Looks up a (possibly prefixed) symbol. Exact symbols win over prefixed readings,
    /// so `min` is minutes and `mM` is millimolar.
    pub fn lookup(&self, symbol: &str) -> Option<NamedUnit> {
        if let Some(def) = self.definitions.get(symbol) {
            return Some(def.unit.clone());
        }
        for (prefix, factor) in SI_PREFIXES.iter() {
            if let Some(rest) = symbol.strip_prefix(prefix) {
                if let Some(def) = self.definitions.get(rest) {
                    if def.prefixes.allows(prefix) {
                        return Some(NamedUnit::new(
                            symbol,
                            factor * def.unit.scale,
                            def.unit.dimension.clone(),
                        ));
                    }
                }
            }
        }
        None
    }

    pub fn parse(&self, input: &str) -> Result<UnitValue, UnitParseError> {
        UnitParser::new(self, input).parse()
    }

    /// Symbols and their descriptions, sorted by symbol.
    pub fn list_units(&self) -> Vec<(String, String, String)> {
        let mut out: Vec<(String, String, String)> = self
            .definitions
            .values()
            .map(|d| (d.unit.symbol.clone(), d.unit.physical_type(), d.doc.clone()))
            .collect();
        out.sort();
        out
    }
}

/// Global registry shared by every model in the process.
static GLOBAL_UNIT_REGISTRY: OnceLock<Mutex<UnitRegistry>> = OnceLock::new();

fn get_unit_registry() -> MutexGuard<'static, UnitRegistry> {
    GLOBAL_UNIT_REGISTRY
        .get_or_init(|| Mutex::new(UnitRegistry::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Read-only access to the global registry. The closure must not call back into
/// `with_unit_registry`.
pub fn with_unit_registry<F, R>(f: F) -> R
where
    F: FnOnce(&UnitRegistry) -> R,
{
    let registry = get_unit_registry();
    f(&registry)
}

pub fn with_unit_registry_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut UnitRegistry) -> R,
{
    let mut registry = get_unit_registry();
    f(&mut registry)
}

/// Parses a unit string with the global registry.
pub fn parse_unit(input: &str) -> Result<UnitValue, UnitParseError> {
    with_unit_registry(|registry| registry.parse(input))
}

/// Defines a unit in the global registry.
pub fn define_unit(
    symbol: &str,
    definition: Option<&str>,
    prefixes: bool,
) -> Result<(), UnitParseError> {
    with_unit_registry_mut(|registry| registry.define_unit(symbol, definition, prefixes))
}
