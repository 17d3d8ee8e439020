/// EGF/EGFR binding in molecule counts
pub mod bngwiki_simple;
/// JNK3 activation on the arrestin scaffold, in micromolar
pub mod jnk3_no_ask1;
/// runs an example by number and prints its units
pub mod units_examples;
