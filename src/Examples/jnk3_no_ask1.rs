//! Arrestin-3 scaffolded activation of JNK3 by MKK4 and MKK7, in micromolar and
//! seconds. Dissociation constants from the literature are turned into paired
//! association (`kf_*`, `1/(uM * s)`) and dissociation (`kr_*`, `1/s`) rates.
use crate::Model::model_errors::ModelError;
use crate::Units::define_with_units::{UnitsDefinition, define_with_units};

const SECOND_ORDER: &str = "1/(uM * s)";
const FIRST_ORDER: &str = "1/s";

/// (name, value, unit)
const RATE_PARAMETERS: [(&str, f64, &str); 44] = [
    // pMKK4 with Arrestin-3, K_D = 347 uM
    ("kf_pMKK4_Arr", 2.0, SECOND_ORDER),
    ("kr_pMKK4_Arr", 240.0, FIRST_ORDER),
    // pMKK7 with Arrestin-3, K_D = 13 uM
    ("kf_pMKK7_Arr", 2.0, SECOND_ORDER),
    ("kr_pMKK7_Arr", 26.0, FIRST_ORDER),
    // Arrestin3-MKK4 binds uuJNK3, K_D = 1.4 uM
    ("kf_MKK4_Arr_bind_uuJNK3", 2.0, SECOND_ORDER),
    ("kr_MKK4_Arr_bind_uuJNK3", 2.8, FIRST_ORDER),
    // Arrestin3 binds upJNK3, K_D = 4.2 uM
    ("kf_upJNK3BindArr", 2.0, SECOND_ORDER),
    ("kr_upJNK3BindArr", 20.0, FIRST_ORDER),
    ("kf_upJNK3_bind_Arr_MKK4", 2.0, SECOND_ORDER),
    ("kr_upJNK3_bind_Arr_MKK4", 8.4, FIRST_ORDER),
    ("kf_upJNK3_bind_Arr_MKK7", 2.0, SECOND_ORDER),
    ("kr_upJNK3_bind_Arr_MKK7", 8.4, FIRST_ORDER),
    // Arrestin3 binds puJNK3, K_D = 10.5 uM
    ("kf_puJNK3BindArr", 2.0, SECOND_ORDER),
    ("kr_puJNK3BindArr", 20.0, FIRST_ORDER),
    ("kf_puJNK3_bind_Arr_MKK4", 2.0, SECOND_ORDER),
    ("kr_puJNK3_bind_Arr_MKK4", 21.0, FIRST_ORDER),
    ("kf_puJNK3_bind_Arr_MKK7", 2.0, SECOND_ORDER),
    ("kr_puJNK3_bind_Arr_MKK7", 21.0, FIRST_ORDER),
    // ppJNK3 with Arrestin-3, K_D = 220 uM
    ("kf_ppJNK3_Arr", 2.0, SECOND_ORDER),
    ("kr_ppJNK3_Arr", 32.0, FIRST_ORDER),
    // uuJNK3 binds Arrestin, K_D = 1.4 uM
    ("kf_uuJNK3_Arr", 2.0, SECOND_ORDER),
    ("kr_uuJNK3_Arr", 2.2, FIRST_ORDER),
    // calibrated
    ("kf_MKK4BindArr_uuJNK3", 2.0, SECOND_ORDER),
    ("kr_MKK4BindArr_uuJNK3", 80.0, FIRST_ORDER),
    ("kf_MKK7BindArr_JNK3", 2.0, SECOND_ORDER),
    ("kr_MKK7BindArr_JNK3", 60.0, FIRST_ORDER),
    ("kf_MKK7_Arr_bind_uuJNK3", 2.0, SECOND_ORDER),
    ("kr_MKK7_Arr_bind_uuJNK3", 2.8, FIRST_ORDER),
    // free JNK3 with MKK4
    ("kf_MKK4_uuJNK3", 2.0, SECOND_ORDER),
    ("kr_MKK4_uuJNK3", 80.0, FIRST_ORDER),
    ("kf_MKK4_puJNK3", 2.0, SECOND_ORDER),
    ("kr_MKK4_puJNK3", 80.0, FIRST_ORDER),
    // free JNK3 with MKK7
    ("kf_MKK7_uuJNK3", 2.0, SECOND_ORDER),
    ("kr_MKK7_uuJNK3", 60.0, FIRST_ORDER),
    ("kf_MKK7_upJNK3", 2.0, SECOND_ORDER),
    ("kr_MKK7_upJNK3", 60.0, FIRST_ORDER),
    // catalysis on the scaffold
    ("kcat_pMKK4_ArrJNK3", 1.0, FIRST_ORDER),
    ("kcat_pMKK7_ArrJNK3", 1.0, FIRST_ORDER),
    ("keq_pMKK4_to_pMKK7", 1.0, SECOND_ORDER),
    ("keq_pMKK7_to_pMKK4", 1.0, SECOND_ORDER),
    ("kf_pJNK3_MKK4complex", 2.0, SECOND_ORDER),
    ("kr_pJNK3_MKK4complex", 80.0, FIRST_ORDER),
    ("kf_pJNK3_MKK7complex", 2.0, SECOND_ORDER),
    ("kr_pJNK3_MKK7complex", 60.0, FIRST_ORDER),
];

const INITIAL_AMOUNTS: [(&str, f64, &str); 6] = [
    ("Arrestin_0", 5.0, "uM"),
    ("pMKK4_0", 50.0, "nM"),
    ("pMKK7_0", 50.0, "nM"),
    ("uuJNK3_0", 0.593211087, "uM"),
    ("puJNK3_0", 0.0, "uM"),
    ("upJNK3_0", 6.788913, "nM"),
];

const INITIALS: [(&str, &str); 6] = [
    ("Arrestin(b1=None, b2=None, b3=None)", "Arrestin_0"),
    ("MKK4(b=None, state='P')", "pMKK4_0"),
    ("MKK7(b=None, state='P')", "pMKK7_0"),
    ("JNK3(b=None, threo='U', tyro='U')", "uuJNK3_0"),
    ("JNK3(b=None, threo='P', tyro='U')", "puJNK3_0"),
    ("JNK3(b=None, threo='U', tyro='P')", "upJNK3_0"),
];

/// (name, expression, forward rate, reverse rate)
const RULES: [(&str, &str, &str, Option<&str>); 27] = [
    // Arrestin with MKK4/7 and JNK3
    (
        "pMKK4BindArr",
        "Arrestin(b1=None, b2=None, b3=None) + MKK4(b=None, state='P') | Arrestin(b1=None, b2=2, b3=None) % MKK4(b=2, state='P')",
        "kf_pMKK4_Arr",
        Some("kr_pMKK4_Arr"),
    ),
    (
        "pMKK7BindArr",
        "Arrestin(b1=None, b2=None, b3=None) + MKK7(b=None, state='P') | Arrestin(b1=None, b2=2, b3=None) % MKK7(b=2, state='P')",
        "kf_pMKK7_Arr",
        Some("kr_pMKK7_Arr"),
    ),
    (
        "uuJNK3BindArr",
        "Arrestin(b1=None, b2=None, b3=None) + JNK3(b=None, threo='U', tyro='U') | Arrestin(b1=None, b2=None, b3=3) % JNK3(b=3, threo='U', tyro='U')",
        "kf_uuJNK3_Arr",
        Some("kr_uuJNK3_Arr"),
    ),
    (
        "upJNK3BindArr",
        "Arrestin(b1=None, b2=None, b3=None) + JNK3(b=None, threo='U', tyro='P') | Arrestin(b1=None, b2=None, b3=3) % JNK3(b=3, threo='U', tyro='P')",
        "kf_upJNK3BindArr",
        Some("kr_upJNK3BindArr"),
    ),
    (
        "puJNK3BindArr",
        "Arrestin(b1=None, b2=None, b3=None) + JNK3(b=None, threo='P', tyro='U') | Arrestin(b1=None, b2=None, b3=3) % JNK3(b=3, threo='P', tyro='U')",
        "kf_puJNK3BindArr",
        Some("kr_puJNK3BindArr"),
    ),
    // MKK4 with JNK3 on the scaffold
    (
        "MKK4_ArrBinduuJNK3",
        "Arrestin(b1=None, b2=2, b3=None) % MKK4(b=2, state='P') + JNK3(b=None, threo='U', tyro='U') | Arrestin(b1=None, b2=2, b3=3) % MKK4(b=2, state='P') % JNK3(b=3, threo='U', tyro='U')",
        "kf_MKK4_Arr_bind_uuJNK3",
        Some("kr_MKK4_Arr_bind_uuJNK3"),
    ),
    (
        "MKK4catJNK3Arr",
        "Arrestin(b1=None, b2=2, b3=3) % MKK4(b=2, state='P') % JNK3(b=3, tyro='U') >> Arrestin(b1=None, b2=2, b3=3) % MKK4(b=2, state='P') % JNK3(b=3, tyro='P')",
        "kcat_pMKK4_ArrJNK3",
        None,
    ),
    (
        "upJNK3Arr_MKK4_diss",
        "Arrestin(b1=None, b2=2, b3=3) % MKK4(b=2, state='P') % JNK3(b=3, threo='U', tyro='P') | Arrestin(b1=None, b2=2, b3=None) % MKK4(b=2, state='P') + JNK3(b=None, threo='U', tyro='P')",
        "kr_upJNK3_bind_Arr_MKK4",
        Some("kf_upJNK3_bind_Arr_MKK4"),
    ),
    (
        "puJNK3Arr_MKK4_diss",
        "Arrestin(b1=None, b2=2, b3=3) % MKK4(b=2, state='P') % JNK3(b=3, threo='P', tyro='U') | Arrestin(b1=None, b2=2, b3=None) % MKK4(b=2, state='P') + JNK3(b=None, threo='P', tyro='U')",
        "kr_puJNK3_bind_Arr_MKK4",
        Some("kf_puJNK3_bind_Arr_MKK4"),
    ),
    (
        "ppJNK3Arr_MKK4_diss",
        "Arrestin(b1=None, b2=2, b3=3) % MKK4(b=2, state='P') % JNK3(b=3, threo='P', tyro='P') | Arrestin(b1=None, b2=2, b3=None) % MKK4(b=2, state='P') + JNK3(b=None, threo='P', tyro='P')",
        "kr_ppJNK3_Arr",
        Some("kf_ppJNK3_Arr"),
    ),
    // MKK7 with JNK3 on the scaffold
    (
        "MKK7_ArrBindUUJNK3",
        "Arrestin(b1=None, b2=2, b3=None) % MKK7(b=2, state='P') + JNK3(b=None, threo='U', tyro='U') | Arrestin(b1=None, b2=2, b3=3) % MKK7(b=2, state='P') % JNK3(b=3, threo='U', tyro='U')",
        "kf_MKK7_Arr_bind_uuJNK3",
        Some("kr_MKK7_Arr_bind_uuJNK3"),
    ),
    (
        "MKK7catJNK3Arr",
        "Arrestin(b1=None, b2=2, b3=3) % MKK7(b=2, state='P') % JNK3(b=3, threo='U') >> Arrestin(b1=None, b2=2, b3=3) % MKK7(b=2, state='P') % JNK3(b=3, threo='P')",
        "kcat_pMKK7_ArrJNK3",
        None,
    ),
    (
        "puJNK3Arr_MKK7_diss",
        "Arrestin(b1=None, b2=2, b3=3) % MKK7(b=2, state='P') % JNK3(b=3, threo='P', tyro='U') | Arrestin(b1=None, b2=2, b3=None) % MKK7(b=2, state='P') + JNK3(b=None, threo='P', tyro='U')",
        "kr_puJNK3_bind_Arr_MKK7",
        Some("kf_puJNK3_bind_Arr_MKK7"),
    ),
    (
        "upJNK3Arr_MKK7_diss",
        "Arrestin(b1=None, b2=2, b3=3) % MKK7(b=2, state='P') % JNK3(b=3, threo='U', tyro='P') | Arrestin(b1=None, b2=2, b3=None) % MKK7(b=2, state='P') + JNK3(b=None, threo='U', tyro='P')",
        "kr_upJNK3_bind_Arr_MKK7",
        Some("kf_upJNK3_bind_Arr_MKK7"),
    ),
    (
        "ppJNK3Arr_MKK7_diss",
        "Arrestin(b1=None, b2=2, b3=3) % MKK7(b=2, state='P') % JNK3(b=3, threo='P', tyro='P') | Arrestin(b1=None, b2=2, b3=None) % MKK7(b=2, state='P') + JNK3(b=None, threo='P', tyro='P')",
        "kr_ppJNK3_Arr",
        Some("kf_ppJNK3_Arr"),
    ),
    // MKK4/7 release from the arrestin complex
    (
        "MKK4DissArr_uuJNK3",
        "Arrestin(b1=None, b2=None, b3=3) % JNK3(b=3, tyro='U') + MKK4(b=None, state='P') | Arrestin(b1=None, b2=2, b3=3) % JNK3(b=3, tyro='U') % MKK4(b=2, state='P')",
        "kf_MKK4BindArr_uuJNK3",
        Some("kr_MKK4BindArr_uuJNK3"),
    ),
    (
        "MKK7DissArr_JNK3",
        "Arrestin(b1=None, b2=None, b3=3) % JNK3(b=3, threo='U') + MKK7(b=None, state='P') | Arrestin(b1=None, b2=2, b3=3) % JNK3(b=3, threo='U') % MKK7(b=2, state='P')",
        "kf_MKK7BindArr_JNK3",
        Some("kr_MKK7BindArr_JNK3"),
    ),
    (
        "EqpMKK4And7",
        "Arrestin(b1=None, b2=2, b3=3) % MKK4(b=2, state='P') % JNK3(b=3, threo='U', tyro='P') + MKK7(b=None, state='P') >> Arrestin(b1=None, b2=2, b3=3) % MKK7(b=2, state='P') % JNK3(b=3, threo='U', tyro='P') + MKK4(b=None, state='P')",
        "keq_pMKK4_to_pMKK7",
        None,
    ),
    (
        "EqpMKK7And4",
        "Arrestin(b1=None, b2=2, b3=3) % MKK7(b=2, state='P') % JNK3(b=3, threo='P', tyro='U') + MKK4(b=None, state='P') >> Arrestin(b1=None, b2=2, b3=3) % MKK4(b=2, state='P') % JNK3(b=3, threo='P', tyro='U') + MKK7(b=None, state='P')",
        "keq_pMKK7_to_pMKK4",
        None,
    ),
    // MKK4/7 with free JNK3
    (
        "MKK4BinduuJNK3",
        "MKK4(b=None, state='P') + JNK3(b=None, threo='U', tyro='U') | MKK4(b=1, state='P') % JNK3(b=1, threo='U', tyro='U')",
        "kf_MKK4_uuJNK3",
        Some("kr_MKK4_uuJNK3"),
    ),
    (
        "MKK4BindpuJNK3",
        "MKK4(b=None, state='P') + JNK3(b=None, threo='P', tyro='U') | MKK4(b=1, state='P') % JNK3(b=1, threo='P', tyro='U')",
        "kf_MKK4_puJNK3",
        Some("kr_MKK4_puJNK3"),
    ),
    (
        "MKK4catJNK3",
        "MKK4(b=1, state='P') % JNK3(b=1, tyro='U') >> MKK4(b=1, state='P') % JNK3(b=1, tyro='P')",
        "kcat_pMKK4_ArrJNK3",
        None,
    ),
    (
        "pJNK3_MKK4complex_diss",
        "MKK4(b=1, state='P') % JNK3(b=1, tyro='P') | MKK4(b=None, state='P') + JNK3(b=None, tyro='P')",
        "kr_pJNK3_MKK4complex",
        Some("kf_pJNK3_MKK4complex"),
    ),
    (
        "MKK7BinduuJNK3",
        "MKK7(b=None, state='P') + JNK3(b=None, threo='U', tyro='U') | MKK7(b=1, state='P') % JNK3(b=1, threo='U', tyro='U')",
        "kf_MKK7_uuJNK3",
        Some("kr_MKK7_uuJNK3"),
    ),
    (
        "MKK7BindupJNK3",
        "MKK7(b=None, state='P') + JNK3(b=None, threo='U', tyro='P') | MKK7(b=1, state='P') % JNK3(b=1, threo='U', tyro='P')",
        "kf_MKK7_upJNK3",
        Some("kr_MKK7_upJNK3"),
    ),
    (
        "MKK7catJNK3",
        "MKK7(b=1, state='P') % JNK3(b=1, threo='U') >> MKK7(b=1, state='P') % JNK3(b=1, threo='P')",
        "kcat_pMKK7_ArrJNK3",
        None,
    ),
    (
        "pJNK3_MKK7complex_diss",
        "MKK7(b=1, state='P') % JNK3(b=1, threo='P') | MKK7(b=None, state='P') + JNK3(b=None, threo='P')",
        "kr_pJNK3_MKK7complex",
        Some("kf_pJNK3_MKK7complex"),
    ),
];

pub fn jnk3_no_ask1() -> Result<UnitsDefinition, ModelError> {
    define_with_units("jnk3_no_ask1", |model| {
        model.set_simulation_units("uM", "s", None)?;

        model.monomer("Arrestin", &["b1", "b2", "b3"], &[])?;
        model.monomer("MKK4", &["b", "state"], &[("state", &["U", "P"])])?;
        model.monomer("MKK7", &["b", "state"], &[("state", &["U", "P"])])?;
        model.monomer(
            "JNK3",
            &["b", "threo", "tyro"],
            &[("threo", &["U", "P"]), ("tyro", &["U", "P"])],
        )?;

        for (name, value, unit) in RATE_PARAMETERS.iter().chain(INITIAL_AMOUNTS.iter()) {
            model.parameter(name, *value, Some(*unit))?;
        }
        for (pattern, value) in INITIALS {
            model.initial(pattern, value, false)?;
        }
        for (name, expression, forward, reverse) in RULES.iter() {
            model.rule(name, expression, forward, *reverse)?;
        }

        model.observable("pTyr_jnk3", "JNK3(tyro='P')")?;
        model.observable("pThr_jnk3", "JNK3(threo='P')")?;
        model.observable("all_jnk3", "JNK3(tyro='P', threo='P')")?;
        Ok(())
    })
}
