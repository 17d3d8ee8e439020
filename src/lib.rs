#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Model;
#[allow(non_snake_case)]
pub mod UnitRegistry;
#[allow(non_snake_case)]
pub mod Units;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod settings;
