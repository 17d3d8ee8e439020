#[cfg(test)]
mod tests {
    use crate::UnitRegistry::dimension::{AMOUNT, Dimension, LENGTH};
    use crate::UnitRegistry::unit_definitions::{UnitRegistry, parse_unit};
    use approx::assert_relative_eq;

    #[test]
    fn test_round_trip_through_display() {
        let samples = [
            "1",
            "uM",
            "1/s",
            "1/(uM*s)",
            "1/(M*s)",
            "uM/s",
            "g/m**3",
            "cell**-1",
            "cell**-1*s**-1",
            "molecules s**-1",
            "m^-2 / s",
            "L / (mol * min)",
            "unit(A(b=None)) / s",
            "kg m**2 / s**2",
        ];
        for s in samples {
            let first = parse_unit(s).unwrap();
            let rendered = first.to_string();
            let second = parse_unit(&rendered).unwrap();
            assert_eq!(first, second, "round trip failed for '{}' -> '{}'", s, rendered);
            assert_eq!(rendered, second.to_string());
        }
    }

    #[test]
    fn test_prefix_resolution() {
        let registry = UnitRegistry::new();
        let mm = registry.parse("mM").unwrap();
        assert_eq!(mm.physical_type(), "molar concentration");
        assert_relative_eq!(mm.scale(), 1.0, epsilon = 1e-12);
        assert_eq!(registry.parse("min").unwrap().physical_type(), "time");
        assert_relative_eq!(registry.parse("pL").unwrap().scale(), 1e-15, epsilon = 1e-27);
        assert_relative_eq!(registry.parse("µM").unwrap().scale(), 1e-3, epsilon = 1e-15);
        // large prefixes are not accepted on molar
        assert!(registry.parse("kM").is_err());
    }

    #[test]
    fn test_rejects_bad_strings() {
        let registry = UnitRegistry::new();
        for bad in ["", "foo", "1/2", "s**0.5", "(uM", "uM)", "2 uM", "unit()"] {
            assert!(registry.parse(bad).is_err(), "'{}' should not parse", bad);
        }
    }

    #[test]
    fn test_physical_types_of_patterns() {
        let registry = UnitRegistry::new();
        let cases = [
            ("M", "molar concentration"),
            ("g/m**3", "mass density"),
            ("g/m**2", "surface mass density"),
            ("cell**-1", "number per cell"),
            ("mol/m**2", "mole area density"),
            ("m**-3", "number density"),
            ("m**-2", "column density"),
            ("molecules", "number of molecules"),
            ("M/s", "molar reaction rate"),
            ("mol/s", "catalytic activity"),
            ("g/s", "mass velocity"),
            ("1/s", "frequency"),
            ("Hz", "frequency"),
            ("pL", "volume"),
            ("1", "dimensionless"),
        ];
        for (unit, expected) in cases {
            assert_eq!(registry.parse(unit).unwrap().physical_type(), expected, "{}", unit);
        }
    }

    #[test]
    fn test_decomposition_keeps_order() {
        let unit = parse_unit("1/(uM*s)").unwrap();
        let symbols: Vec<String> = unit.bases().iter().map(|b| b.to_string()).collect();
        assert_eq!(symbols, vec!["uM".to_string(), "s".to_string()]);
        assert_eq!(unit.powers(), vec![-1, -1]);
    }

    #[test]
    fn test_runtime_definitions() {
        let mut registry = UnitRegistry::new();
        registry.define_unit("virion", None, false).unwrap();
        let per_virion = registry.parse("1/virion").unwrap();
        assert_eq!(per_virion.dimension(), Dimension::base("virion").inv());
        registry.define_unit("cc", Some("cm**3"), false).unwrap();
        assert_eq!(registry.parse("cc").unwrap(), registry.parse("mL").unwrap());
        assert!(registry.define_unit("bad unit", None, false).is_err());
        assert!(registry.define_unit("x", Some("nope"), false).is_err());
    }

    #[test]
    fn test_runtime_definitions_cannot_shadow() {
        let mut registry = UnitRegistry::new();
        registry.define_unit("virion", None, false).unwrap();
        for taken in ["s", "M", "mM", "molecules", "virion"] {
            assert!(registry.define_unit(taken, Some("min"), false).is_err(), "{}", taken);
        }
        assert_relative_eq!(
            registry.parse("s").unwrap().to(&registry.parse("min").unwrap()).unwrap(),
            1.0 / 60.0,
            epsilon = 1e-15
        );
        for reserved in ["time", "mass", "amount", "length", "unit"] {
            assert!(registry.define_unit(reserved, None, false).is_err(), "{}", reserved);
        }
        assert!(registry.lookup("time").is_none());
    }

    #[test]
    fn test_out_of_range_powers_are_rejected() {
        let registry = UnitRegistry::new();
        assert!(registry.parse("s**2147483647 * s").is_err());
        assert!(registry.parse("s**65").is_err());
        assert!(registry.parse("s**(-65)").is_err());
        assert!(registry.parse("s**-2147483648").is_err());
        assert!(registry.parse("s**64 * s").is_err());
        assert!(registry.parse("(s**8)**8 / s").is_ok());
        assert!(registry.parse("(s**8)**9").is_err());
        assert_eq!(registry.parse("s**64 / s").unwrap().powers(), vec![63]);
    }

    #[test]
    fn test_nested_definitions_keep_dimensions_bounded() {
        let mut registry = UnitRegistry::new();
        registry.define_unit("big", Some("m**32"), false).unwrap();
        registry.define_unit("bigger", Some("big**2"), false).unwrap();
        assert!(registry.define_unit("huge", Some("big**3"), false).is_err());
    }

    #[test]
    fn test_conversions() {
        let nm = parse_unit("nM").unwrap();
        let um = parse_unit("umol/L").unwrap();
        assert_relative_eq!(nm.to(&um).unwrap(), 1e-3, epsilon = 1e-15);
        assert_eq!(um.dimension(), Dimension::base(AMOUNT).with(LENGTH, -3));
        let per_min = parse_unit("1/min").unwrap();
        let per_s = parse_unit("1/s").unwrap();
        assert_relative_eq!(per_min.to(&per_s).unwrap(), 1.0 / 60.0, epsilon = 1e-15);
        assert!(nm.to(&parse_unit("molecules").unwrap()).is_err());
    }
}
