use crate::{table::Table, transform::string_ops};

/// Title-cases and collapses internal whitespace in every column that is still
/// textual. Returns the table and the number of cells that changed.
pub fn standardize_text(table: Table) -> (Table, usize) {
    let mut changed = 0usize;
    let table = table.map_columns(|column| {
        let (column, count) = column.map_text(string_ops::standardize);
        changed += count;
        column
    });
    (table, changed)
}
