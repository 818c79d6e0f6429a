//! One module per invocation mode.
//!
//! Commands write to caller-supplied streams so they can be driven from
//! tests with in-memory buffers.

pub mod add;
pub mod import;
pub mod list;
pub mod show;

use std::fmt::Display;
use std::io::{self, Write};

/// Print `code<TAB>name` rows with codes left-aligned to a shared width.
fn print_rows<'a, C, I>(out: &mut impl Write, rows: I) -> io::Result<()>
where
    C: Display + 'a,
    I: IntoIterator<Item = (C, &'a str, usize)>,
{
    let rows: Vec<_> = rows.into_iter().collect();
    let width = rows.iter().map(|(_, _, w)| *w).max().unwrap_or(0);
    for (code, name, _) in rows {
        writeln!(out, "{code:<width$}\t{name}")?;
    }
    Ok(())
}
