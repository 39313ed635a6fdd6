//! Runs the five cleaning stages in order and collects what each one did.
//!
//! Stage order is fixed: deduplicate, trim, infer types, standardize text,
//! prune null rows. The table moves through by value; no stage looks back.

use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;

use crate::{
    config::CleanOptions,
    table::Table,
    transform::{
        dedup::deduplicate,
        infer::{ColumnDecision, coerce_types},
        prune::{PruneStats, prune_null_rows},
        standardize::standardize_text,
        trim::trim_text,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub input_columns: usize,
    pub duplicates_removed: usize,
    pub cells_trimmed: usize,
    pub decisions: Vec<ColumnDecision>,
    pub cells_standardized: usize,
    pub pruning: PruneStats,
    pub output_rows: usize,
    pub output_columns: usize,
}

impl CleaningReport {
    pub fn coerced_columns(&self) -> impl Iterator<Item = &ColumnDecision> {
        self.decisions.iter().filter(|decision| decision.coerced())
    }
}

pub fn clean(table: Table, options: &CleanOptions) -> (Table, CleaningReport) {
    let mut report = CleaningReport {
        input_rows: table.row_count(),
        input_columns: table.column_count(),
        ..CleaningReport::default()
    };

    let (table, removed) = deduplicate(table);
    report.duplicates_removed = removed;
    info!("Removed {removed} duplicate row(s)");

    let (table, trimmed) = trim_text(table);
    report.cells_trimmed = trimmed;
    info!("Trimmed whitespace from {trimmed} text cell(s)");

    let (table, decisions) = coerce_types(table, &options.inference());
    report.decisions = decisions;
    for decision in report.coerced_columns() {
        info!(
            "  • {}: converted to {} ({}/{} row(s) parsed)",
            decision.column, decision.datatype, decision.parsed, decision.rows
        );
    }
    let textual = report
        .decisions
        .iter()
        .filter(|decision| decision.datatype.is_textual())
        .map(|decision| decision.column.as_str())
        .join(", ");
    if !textual.is_empty() {
        debug!("Columns kept as text: {textual}");
    }

    let (table, standardized) = standardize_text(table);
    report.cells_standardized = standardized;
    info!("Standardized {standardized} text cell(s) (title case, collapsed spaces)");

    let (table, pruning) = prune_null_rows(table, options.null_row_threshold);
    if pruning.empty_rows_removed > 0 {
        info!("Removed {} fully empty row(s)", pruning.empty_rows_removed);
    }
    info!(
        "Rows with null values: {} ({:.2}%)",
        pruning.null_rows,
        pruning.null_row_fraction * 100.0
    );
    if pruning.null_rows_removed > 0 {
        info!(
            "Removed {} row(s) with null values (below {:.0}% threshold)",
            pruning.null_rows_removed,
            options.null_row_threshold * 100.0
        );
    } else if pruning.retained_null_rows() {
        info!(
            "Keeping rows with null values (at or above {:.0}% threshold)",
            options.null_row_threshold * 100.0
        );
    }
    report.pruning = pruning;

    report.output_rows = table.row_count();
    report.output_columns = table.column_count();
    (table, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColumnType, Value};
    use crate::table::Column;

    fn options() -> CleanOptions {
        CleanOptions::default()
    }

    #[test]
    fn cleans_a_messy_table_end_to_end() {
        let table = Table::new(vec![
            Column::text(
                "name",
                [
                    Some("  alice   smith "),
                    Some("bob"),
                    Some("  alice   smith "),
                    Some("carol"),
                    Some("dave"),
                    Some("erin"),
                ],
            ),
            Column::text(
                "price",
                [
                    Some("$1,200.50"),
                    Some("$3"),
                    Some("$1,200.50"),
                    Some("€4.25"),
                    Some("£10"),
                    Some("11"),
                ],
            ),
            Column::text(
                "active",
                [Some("yes"), Some("No"), Some("yes"), Some("y"), Some("n"), Some("Y")],
            ),
        ])
        .unwrap();

        let (table, report) = clean(table, &options());
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(table.row_count(), 5);
        assert_eq!(table.column_count(), 3);

        let name = table.column("name").unwrap();
        assert_eq!(name.text_values().next(), Some(Some("Alice Smith")));

        let price = table.column("price").unwrap();
        assert_eq!(price.datatype(), ColumnType::Float);
        assert_eq!(price.cells()[0], Some(Value::Float(1200.5)));

        let active = table.column("active").unwrap();
        assert_eq!(active.datatype(), ColumnType::Boolean);
        assert_eq!(active.cells()[1], Some(Value::Boolean(false)));

        assert_eq!(report.coerced_columns().count(), 2);
    }

    #[test]
    fn padded_numbers_are_trimmed_before_inference() {
        let table = Table::new(vec![Column::text(
            "qty",
            [Some(" 1 "), Some("2  "), Some("\t3")],
        )])
        .unwrap();
        let (table, report) = clean(table, &options());
        assert_eq!(report.cells_trimmed, 3);
        assert_eq!(table.columns()[0].datatype(), ColumnType::Integer);
    }

    #[test]
    fn boolean_column_with_unknown_token_is_title_cased() {
        let table =
            Table::new(vec![Column::text("flag", [Some("yes"), Some("no"), Some("maybe")])])
                .unwrap();
        let (table, _) = clean(table, &options());
        let values = table.columns()[0].text_values().collect::<Vec<_>>();
        assert_eq!(values, vec![Some("Yes"), Some("No"), Some("Maybe")]);
    }

    #[test]
    fn mixed_year_column_falls_back_to_text_unchanged() {
        let table = Table::new(vec![Column::text(
            "year",
            [Some("2020"), Some("2021"), Some("2022"), Some("x")],
        )])
        .unwrap();
        let (table, report) = clean(table, &options());
        assert!(table.columns()[0].is_textual());
        assert_eq!(
            table.columns()[0].text_values().collect::<Vec<_>>(),
            vec![Some("2020"), Some("2021"), Some("2022"), Some("X")]
        );
        assert_eq!(report.coerced_columns().count(), 0);
    }

    #[test]
    fn coercion_failures_feed_the_null_pruner() {
        // 9 numeric cells and 1 failure: numeric wins, the failure becomes null,
        // and 10% null-bearing rows are under the threshold.
        let mut values = (1..=9).map(|i| Some(i.to_string())).collect::<Vec<_>>();
        values.push(Some("oops".to_string()));
        let table = Table::new(vec![Column::text("n", values)]).unwrap();
        let (table, report) = clean(table, &options());
        assert_eq!(report.pruning.null_rows_removed, 1);
        assert_eq!(table.row_count(), 9);
    }

    #[test]
    fn empty_table_passes_through() {
        let table = Table::from_rows(vec!["a".to_string()], Vec::new()).unwrap();
        let (table, report) = clean(table, &options());
        assert!(table.is_empty());
        assert_eq!(report.output_columns, 1);
    }
}
