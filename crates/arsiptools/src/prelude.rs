pub use crate::error::Error;

pub use anstream::eprintln;
pub use anstream::println;
pub use color_eyre::eyre::{eyre, Context, OptionExt, Result};
pub use std::format as f;

pub fn new_table() -> prettytable::Table {
    let mut table = prettytable::Table::new();

    let format = prettytable::format::FormatBuilder::new()
        .padding(1, 1)
        .build();

    table.set_format(format);

    table
}

/// Print the end-of-run outcome counts the way every batch command does.
pub fn print_summary(successes: usize, failures: usize, incompletes: usize) {
    let mut table = new_table();
    table.add_row(prettytable::row!["Successes", successes]);
    table.add_row(prettytable::row!["Failures", failures]);
    if incompletes > 0 {
        table.add_row(prettytable::row!["Incomplete", incompletes]);
    }
    table.printstd();
}
