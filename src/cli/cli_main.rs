use super::cli_examples::examples_menu;
use crate::Examples::units_examples::report;
use crate::UnitRegistry::unit_definitions::{define_unit, with_unit_registry};
use crate::Utils::load_from_file::load_model_from_file;
use prettytable::{Table, row};
use std::io::{self, Write};

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => examples_menu(),
            "2" => check_model_file(),
            "3" => list_units(),
            "4" => define_new_unit(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to KinUnits: unit inference and consistency checks\n
    for rule-based biochemical models \n \x1b[0m"
    );
    println!("\x1b[33m1. Example models\x1b[0m");
    println!("\x1b[33m2. Check a model file (JSON)\x1b[0m");
    println!("\x1b[33m3. List registered units\x1b[0m");
    println!("\x1b[33m4. Define a unit\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    io::stdout().flush().ok();
}

pub fn get_user_input() -> String {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        // end of input leaves the menus
        Ok(0) | Err(_) => "0".to_string(),
        Ok(_) => input,
    }
}

fn prompt(text: &str) -> String {
    print!("{}", text);
    io::stdout().flush().ok();
    get_user_input().trim().to_string()
}

/// Loads, builds and checks a model file, printing its units and warnings.
pub fn check_model_file() {
    let path = prompt("Path to model file: ");
    match load_model_from_file(&path) {
        Ok(definition) => report(&definition),
        Err(e) => println!("\x1b[31m{}\x1b[0m", e),
    }
}

fn list_units() {
    let units = with_unit_registry(|registry| registry.list_units());
    let mut table = Table::new();
    table.add_row(row!["Symbol", "Physical type", "Description"]);
    for (symbol, physical_type, doc) in units {
        table.add_row(row![symbol, physical_type, doc]);
    }
    table.printstd();
}

fn define_new_unit() {
    let symbol = prompt("Symbol: ");
    let definition = prompt("Definition in existing units (empty for a new base unit): ");
    let prefixes = prompt("Allow SI prefixes? [y/N]: ");
    let definition = if definition.is_empty() {
        None
    } else {
        Some(definition.as_str())
    };
    match define_unit(&symbol, definition, prefixes.eq_ignore_ascii_case("y")) {
        Ok(()) => println!("Unit '{}' defined.", symbol),
        Err(e) => println!("\x1b[31m{}\x1b[0m", e),
    }
}
