//! The two-column `email,optIn` export format used by the dashboard.

use super::route::ImportRow;
use crate::domain::subscriber::opt_in;

/// Parses a CSV document into import rows.
///
/// The header row is optional and recognised by a first cell of `email`. Blank lines are
/// ignored. A missing or blank `optIn` cell means consent.
pub fn parse(document: &str) -> Vec<ImportRow> {
    let mut lines = document.lines().filter(|line| !line.trim().is_empty()).peekable();

    if let Some(first) = lines.peek() {
        let header = split_cells(first);
        if header.first().is_some_and(|cell| cell.eq_ignore_ascii_case("email")) {
            lines.next();
        }
    }

    lines
        .map(|line| {
            let mut cells = split_cells(line).into_iter();
            let email = cells.next().filter(|email| !email.is_empty());
            let opt_in = cells
                .next()
                .filter(|flag| !flag.is_empty())
                .map_or(true, |flag| opt_in::parse_flag(&flag));

            ImportRow {
                email,
                opt_in,
                source: line.trim().to_owned(),
            }
        })
        .collect()
}

/// Splits a line on commas that are not inside a double-quoted cell.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut cell).trim().to_owned()),
            c => cell.push(c),
        }
    }
    cells.push(cell.trim().to_owned());

    cells
}
