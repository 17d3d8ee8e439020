///////////////////////////TESTING////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::Model::components::{Component, UnitBearing};
    use crate::Model::model::Model;
    use crate::Model::model_errors::ModelError;
    use crate::Units::unit_annotation::SubjectKind;
    use approx::assert_relative_eq;

    fn receptor_model() -> Model {
        let mut model = Model::new("receptor");
        model.monomer("L", &["r"], &[]).unwrap();
        model
            .monomer("R", &["l", "y"], &[("y", &["U", "P"])])
            .unwrap();
        model
    }

    #[test]
    fn test_names_are_unique() {
        let mut model = receptor_model();
        model.parameter("k", 1.0, Some("1/s")).unwrap();
        assert_eq!(
            model.parameter("k", 2.0, None).unwrap_err(),
            ModelError::DuplicateComponent("k".to_string())
        );
        assert_eq!(
            model.monomer("L", &[], &[]).unwrap_err(),
            ModelError::DuplicateComponent("L".to_string())
        );
        assert_eq!(model.parameter_value("k"), Some(1.0));
    }

    #[test]
    fn test_monomer_states_must_name_sites() {
        let mut model = Model::new("bad_states");
        let err = model.monomer("M", &["a"], &[("b", &["on"])]).unwrap_err();
        assert!(matches!(err, ModelError::UnknownSite { .. }));
    }

    #[test]
    fn test_patterns_are_validated() {
        let mut model = receptor_model();
        model.parameter("k", 1.0, Some("1/s")).unwrap();
        assert!(matches!(
            model.rule("r1", "X() >> None", "k", None).unwrap_err(),
            ModelError::UnknownMonomer(ref m) if m == "X"
        ));
        assert!(matches!(
            model.rule("r2", "R(q=None) >> None", "k", None).unwrap_err(),
            ModelError::UnknownSite { .. }
        ));
        assert!(matches!(
            model.rule("r3", "R(y='Q') >> R(y='P')", "k", None).unwrap_err(),
            ModelError::InvalidPattern { .. }
        ));
        assert!(matches!(
            model.rule("r4", "R(y='U') R(y='P')", "k", None).unwrap_err(),
            ModelError::InvalidRuleExpression { .. }
        ));
        model.rule("phos", "R(y='U') >> R(y='P')", "k", None).unwrap();
        assert_eq!(model.rules().len(), 1);
    }

    #[test]
    fn test_rate_arguments_are_checked() {
        let mut model = receptor_model();
        model.parameter("kf", 1.0, Some("1/(uM*s)")).unwrap();
        model.parameter("kr", 1.0, Some("1/s")).unwrap();
        model.observable("Rtot", "R()").unwrap();
        let binding = "L(r=None) + R(l=None) | L(r=1) % R(l=1)";
        assert!(matches!(
            model.rule("b1", binding, "kf", None).unwrap_err(),
            ModelError::ReverseRateMismatch { .. }
        ));
        assert!(matches!(
            model
                .rule("b2", "L(r=None) + R(l=None) >> L(r=1) % R(l=1)", "kf", Some("kr"))
                .unwrap_err(),
            ModelError::ReverseRateMismatch { .. }
        ));
        assert!(matches!(
            model.rule("b3", binding, "Rtot", Some("kr")).unwrap_err(),
            ModelError::InvalidComponentKind { .. }
        ));
        assert!(matches!(
            model.rule("b4", binding, "missing", Some("kr")).unwrap_err(),
            ModelError::UnknownComponent(_)
        ));
        model.rule("bind", binding, "kf", Some("kr")).unwrap();
    }

    #[test]
    fn test_energy_rules_skip_unit_validation() {
        let mut model = receptor_model();
        model.parameter("phi", 0.5, None).unwrap();
        model
            .add_rule(
                "bind_energy",
                "L(r=None) + R(l=None) | L(r=1) % R(l=1)",
                "phi",
                Some("phi"),
                true,
            )
            .unwrap();
        assert!(model.rules()[0].energy);
    }

    #[test]
    fn test_components_track_their_annotation() {
        let mut model = receptor_model();
        model.parameter("k", 1.0, None).unwrap();
        let component = model.component("k").unwrap();
        assert!(!component.has_units());
        assert!(model.annotation_of(component).is_none());

        model.add_units("k", Some("1/s"), None).unwrap();
        model.add_units("k", Some("1/min"), None).unwrap();
        let component = model.component("k").unwrap();
        assert_eq!(component.kind(), SubjectKind::Parameter);
        assert_eq!(component.units(), Some(1));
        assert_eq!(
            model.annotation_of(component).unwrap().unit_string(),
            "1/min"
        );
        assert_eq!(model.unit_map()["k"], "1/min");
        assert!(matches!(
            model.add_units("nothing", Some("1/s"), None).unwrap_err(),
            ModelError::UnknownComponent(_)
        ));
    }

    #[test]
    fn test_observable_units_and_conversion() {
        let mut model = receptor_model();
        model
            .observable_with_units("Rp", "R(y='P')", Some("nM"), Some("uM"))
            .unwrap();
        let annotation = model
            .component("Rp")
            .and_then(|c| model.annotation_of(c))
            .unwrap();
        assert_eq!(annotation.unit_string(), "uM");
        assert_relative_eq!(annotation.conversion_factor().unwrap(), 1e-3, max_relative = 1e-12);
        assert!(
            model
                .observable_with_units("Rs", "R()", Some("nM"), Some("1/s"))
                .is_err()
        );
        let obs: Vec<&str> = model.observables().map(|o| o.name.as_str()).collect();
        assert_eq!(obs, vec!["Rp"]);
    }

    #[test]
    fn test_expression_units_ignore_conversion() {
        let mut model = receptor_model();
        model.parameter("k", 2.0, Some("1/s")).unwrap();
        model.expression_from_str("k2", "k*2").unwrap();
        assert_eq!(model.unit_map()["k2"], "1 / s");
        model.add_units("k2", Some("1/min"), Some("1/s")).unwrap();
        assert_eq!(model.unit_map()["k2"], "1/min");
        assert!(matches!(
            model.component("k2").unwrap(),
            Component::Expression(_)
        ));
        assert_eq!(model.expressions().count(), 1);
        assert!(matches!(
            model.convert_units("k2", "1/s").unwrap_err(),
            ModelError::InvalidComponentKind { .. }
        ));
    }

    #[test]
    fn test_malformed_expression_text_is_an_error() {
        let mut model = receptor_model();
        model.parameter("k", 2.0, Some("1/s")).unwrap();
        for text in ["k*(", "", "k*", "(k", "k)", "*k", "k; drop", "k*()"] {
            assert!(
                matches!(
                    model.expression_from_str("bad", text).unwrap_err(),
                    ModelError::InvalidExpression { .. }
                ),
                "accepted '{}'",
                text
            );
        }
        assert!(model.component("bad").is_none());
        model.expression_from_str("ok", "k*3").unwrap();
        assert_eq!(model.unit_map()["ok"], "1 / s");
    }

    #[test]
    fn test_display_lists_units() {
        let mut model = receptor_model();
        model.parameter("kf", 2.0, Some("1/s")).unwrap();
        model.parameter("R0", 5.0, Some("nM")).unwrap();
        model.initial("R(l=None, y='U')", "R0", false).unwrap();
        model.rule("deg", "R() >> None", "kf", None).unwrap();
        let text = model.to_string();
        assert!(text.contains("Parameter('kf', 2), unit=['1/s']"));
        assert!(text.contains("Initial(R(l=None, y='U'), R0), unit=[nM]"));
        assert!(text.contains("Rule('deg', R() >> None, kf)"));
        let table = model.units_table();
        assert_eq!(table.len(), 3);
    }
}
