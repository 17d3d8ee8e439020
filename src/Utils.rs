/// Loading unit-aware model descriptions from JSON files.
pub mod load_from_file;
