use super::cli_main::get_user_input;
use crate::Examples::units_examples::units_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. bngwiki_simple (molecules, s)");
        println!("2. jnk3_no_ask1 (uM, s)");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        io::stdout().flush().ok();

        let choice = get_user_input();
        match choice.trim() {
            "1" => units_examples(0),
            "2" => units_examples(1),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
