use serde::Serialize;

use crate::table::Table;

pub const DEFAULT_NULL_ROW_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PruneStats {
    pub empty_rows_removed: usize,
    /// Rows holding at least one null after empty rows are gone.
    pub null_rows: usize,
    pub null_row_fraction: f64,
    pub null_rows_removed: usize,
}

impl PruneStats {
    pub fn retained_null_rows(&self) -> bool {
        self.null_rows > 0 && self.null_rows_removed == 0
    }
}

/// Drops rows whose every cell is null, then drops every row holding a null
/// when such rows make up strictly less than `threshold` of what remains.
pub fn prune_null_rows(table: Table, threshold: f64) -> (Table, PruneStats) {
    let mut stats = PruneStats::default();
    if table.column_count() == 0 {
        return (table, stats);
    }

    let not_empty = table
        .rows()
        .map(|row| row.iter().any(Option::is_some))
        .collect::<Vec<_>>();
    let before = table.row_count();
    let table = table.retain_rows(&not_empty);
    stats.empty_rows_removed = before - table.row_count();

    let complete = table
        .rows()
        .map(|row| row.iter().all(Option::is_some))
        .collect::<Vec<_>>();
    stats.null_rows = complete.iter().filter(|flag| !**flag).count();
    if table.row_count() == 0 {
        return (table, stats);
    }
    stats.null_row_fraction = stats.null_rows as f64 / table.row_count() as f64;

    if stats.null_rows > 0 && stats.null_row_fraction < threshold {
        let before = table.row_count();
        let table = table.retain_rows(&complete);
        stats.null_rows_removed = before - table.row_count();
        return (table, stats);
    }
    (table, stats)
}
