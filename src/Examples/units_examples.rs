use super::bngwiki_simple::bngwiki_simple;
use super::jnk3_no_ask1::jnk3_no_ask1;
use crate::Units::define_with_units::UnitsDefinition;
use log::error;
use prettytable::{Table, row};

/// Prints the model, its unit table and the consistency warnings.
pub fn report(definition: &UnitsDefinition) {
    println!("{}", definition.model);
    definition.model.pretty_print_units();
    if definition.warnings.is_empty() {
        println!("No unit warnings.");
        return;
    }
    let mut table = Table::new();
    table.add_row(row!["#", "UnitsWarning"]);
    for (i, warning) in definition.warnings.iter().enumerate() {
        table.add_row(row![i + 1, warning]);
    }
    table.printstd();
}

pub fn units_examples(task: usize) {
    let outcome = match task {
        0 => {
            // molar parameters converted into molecule counts
            bngwiki_simple()
        }
        1 => {
            // uM/s model with paired association and dissociation rates
            jnk3_no_ask1()
        }
        _ => {
            println!("No example number {}", task);
            return;
        }
    };
    match outcome {
        Ok(definition) => {
            report(&definition);
            for order in definition.model.reaction_order() {
                match order.reverse {
                    Some(reverse) => println!("{}: order {} / {}", order.rule, order.forward, reverse),
                    None => println!("{}: order {}", order.rule, order.forward),
                }
            }
        }
        Err(e) => error!("example {} failed: {}", task, e),
    }
}
