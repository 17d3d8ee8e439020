use super::consistency_check::check;
use super::unit_errors::UnitsWarning;
use crate::Model::model::Model;
use crate::Model::model_errors::ModelError;
use log::info;

/// Scope of a model definition that always ends with a consistency check.
///
/// `finish` runs the check and hands the model back. If the scope is dropped
/// without finishing, for example while a panic unwinds through the definition,
/// the check still runs from `Drop`.
pub struct UnitsScope {
    model: Model,
    finished: bool,
}

impl UnitsScope {
    pub fn new(model: Model) -> Self {
        UnitsScope {
            model,
            finished: false,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn finish(mut self) -> (Model, Vec<UnitsWarning>) {
        let warnings = check(&self.model);
        self.finished = true;
        (std::mem::take(&mut self.model), warnings)
    }
}

impl Drop for UnitsScope {
    fn drop(&mut self) {
        if !self.finished {
            check(&self.model);
        }
    }
}

/// A model assembled inside `define_with_units` together with its check results.
#[derive(Debug)]
pub struct UnitsDefinition {
    pub model: Model,
    pub warnings: Vec<UnitsWarning>,
}

/// Builds a model named `name` with `body` and checks its units on the way out.
///
/// The check runs on success and on error; an error from `body` is returned after
/// the check has logged its warnings.
pub fn define_with_units<F>(name: &str, body: F) -> Result<UnitsDefinition, ModelError>
where
    F: FnOnce(&mut Model) -> Result<(), ModelError>,
{
    info!("defining model '{}' with units", name);
    let mut scope = UnitsScope::new(Model::new(name));
    let outcome = body(scope.model_mut());
    let (model, warnings) = scope.finish();
    outcome?;
    Ok(UnitsDefinition { model, warnings })
}
