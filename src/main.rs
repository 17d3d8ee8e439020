use KinUnits::Examples::units_examples::report;
use KinUnits::Utils::load_from_file::load_model_from_file;
use KinUnits::cli::cli_main::run_interactive_menu;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::process::ExitCode;

pub fn main() -> ExitCode {
    if TermLogger::init(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("logger already initialized");
    }
    // a model file on the command line is checked without the menu
    match std::env::args().nth(1) {
        Some(path) => match load_model_from_file(&path) {
            Ok(definition) => {
                report(&definition);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        None => {
            run_interactive_menu();
            ExitCode::SUCCESS
        }
    }
}
