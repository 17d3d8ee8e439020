/// Interactive text menu
pub mod cli_main;
/// Example models submenu
pub mod cli_examples;
