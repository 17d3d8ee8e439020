use super::classifier::unit_role;
use super::unit_annotation::UnitAnnotation;
use super::unit_errors::UnitsWarning;
use crate::Model::components::UnitBearing;
use crate::Model::model::Model;
use log::warn;

fn duplicate_warnings(units: &[UnitAnnotation]) -> Vec<UnitsWarning> {
    let mut warnings = Vec::new();
    for (i, first) in units.iter().enumerate() {
        for second in &units[i + 1..] {
            if first.subject() == second.subject() {
                warnings.push(UnitsWarning::DuplicateUnits {
                    kind: first.kind().to_string(),
                    name: first.subject_name().to_string(),
                });
            }
        }
    }
    warnings
}

/// Groups annotations by role, keeping the order in which roles first appear.
fn group_by_role(units: &[UnitAnnotation]) -> Vec<(String, Vec<&UnitAnnotation>)> {
    let mut groups: Vec<(String, Vec<&UnitAnnotation>)> = Vec::new();
    for annotation in units {
        let role = unit_role(annotation.unit());
        match groups.iter_mut().find(|(r, _)| *r == role) {
            Some((_, members)) => members.push(annotation),
            None => groups.push((role, vec![annotation])),
        }
    }
    groups
}

fn label(annotation: &UnitAnnotation) -> String {
    annotation.value().unwrap_or("1").to_string()
}

fn mismatch_warnings(units: &[UnitAnnotation]) -> Vec<UnitsWarning> {
    let mut warnings = Vec::new();
    for (role, members) in group_by_role(units) {
        for (i, first) in members.iter().enumerate() {
            for second in &members[i + 1..] {
                if first.unit() != second.unit() {
                    warnings.push(UnitsWarning::MismatchedUnits {
                        first_unit: label(first),
                        first_kind: first.kind().to_string(),
                        first_name: first.subject_name().to_string(),
                        second_unit: label(second),
                        second_kind: second.kind().to_string(),
                        second_name: second.subject_name().to_string(),
                        role: role.clone(),
                    });
                }
            }
        }
    }
    warnings
}

/// Reports duplicate unit assignments, disagreeing units within a role and
/// parameters without units.
///
/// Never fails; every finding is logged and returned.
pub fn check(model: &Model) -> Vec<UnitsWarning> {
    let units = model.units();
    let mut warnings = Vec::new();
    if units.is_empty() {
        warnings.push(UnitsWarning::NoUnits {
            model: model.name.clone(),
        });
    }
    warnings.extend(duplicate_warnings(units));
    warnings.extend(mismatch_warnings(units));
    for parameter in model.parameters() {
        if !parameter.has_units() {
            warnings.push(UnitsWarning::MissingUnits {
                name: parameter.name.clone(),
            });
        }
    }
    for warning in &warnings {
        warn!("UnitsWarning: {}", warning);
    }
    warnings
}
