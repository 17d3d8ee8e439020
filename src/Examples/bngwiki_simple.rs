//! EGF binding to EGFR, simulated in molecule counts.
//!
//! Rate constants and amounts are given in molar units and converted into
//! molecules through a 1 pL molecule volume (`f * 100 pL` with `f = 0.01`).
use crate::Model::model_errors::ModelError;
use crate::Units::define_with_units::{UnitsDefinition, define_with_units};

pub fn bngwiki_simple() -> Result<UnitsDefinition, ModelError> {
    define_with_units("bngwiki_simple", |model| {
        model.set_simulation_units("molecules", "s", None)?;

        // scaling factor
        let f = 0.01;
        model.parameter("f", f, None)?;
        model.add_units("f", None, None)?;

        model.set_molecule_volume(f * 100.0, "pL")?;

        model.parameter("EGF0", 2.0, Some("nM"))?;
        model.parameter("EGFR0", f * 1.8e5, Some("molecules"))?;

        model.parameter("kp1", 9.0e7, Some("1/(M*s)"))?;
        model.parameter("km1", 0.06, Some("1/s"))?;

        model.monomer("EGF", &["R"], &[])?;
        model.monomer("EGFR", &["L", "CR1", "Y1068"], &[("Y1068", &["U", "P"])])?;

        model.initial("EGF(R=None)", "EGF0", false)?;
        model.initial("EGFR(L=None, CR1=None, Y1068='U')", "EGFR0", false)?;

        model.rule(
            "egf_binds_egfr",
            "EGF(R=None) + EGFR(L=None) | EGF(R=1) % EGFR(L=1)",
            "kp1",
            Some("km1"),
        )?;

        // molecules
        model.observable("Lbound", "EGF(R=ANY)")?;
        Ok(())
    })
}
