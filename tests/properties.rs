use csv_tidy::config::CleanOptions;
use csv_tidy::data::{ColumnType, Value};
use csv_tidy::pipeline::clean;
use csv_tidy::table::{Column, Table};
use csv_tidy::transform::{
    dedup::deduplicate,
    infer::{InferenceOptions, coerce_types},
    prune::prune_null_rows,
    standardize::standardize_text,
    trim::trim_text,
};
use proptest::prelude::*;

fn cell_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(String::new())),
        2 => prop::sample::select(vec!["yes", "no", "y", "n", "maybe"]).prop_map(|s| Some(s.to_string())),
        3 => (-500i64..500).prop_map(|n| Some(n.to_string())),
        2 => "[ ]{0,2}[a-z]{1,5}( [a-z]{1,4})?[ ]{0,2}".prop_map(Some),
        1 => (1u32..=12, 1u32..=28).prop_map(|(m, d)| Some(format!("2024-{m:02}-{d:02}"))),
    ]
}

fn table_strategy() -> impl Strategy<Value = Table> {
    (1usize..4, 0usize..25).prop_flat_map(|(width, rows)| {
        prop::collection::vec(prop::collection::vec(cell_strategy(), rows), width).prop_map(
            |columns| {
                let columns = columns
                    .into_iter()
                    .enumerate()
                    .map(|(idx, cells)| Column::text(format!("c{idx}"), cells))
                    .collect();
                Table::new(columns).expect("valid table")
            },
        )
    })
}

proptest! {
    #[test]
    fn deduplication_is_idempotent(table in table_strategy()) {
        let (once, _) = deduplicate(table);
        let (twice, removed) = deduplicate(once.clone());
        prop_assert_eq!(removed, 0);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn stages_never_add_rows_or_change_columns(table in table_strategy()) {
        let columns = table.headers();
        let mut rows = table.row_count();

        let (table, _) = deduplicate(table);
        prop_assert!(table.row_count() <= rows);
        rows = table.row_count();

        let (table, _) = trim_text(table);
        prop_assert_eq!(table.row_count(), rows);

        let (table, _) = coerce_types(table, &InferenceOptions::default());
        prop_assert_eq!(table.row_count(), rows);

        let (table, _) = standardize_text(table);
        prop_assert_eq!(table.row_count(), rows);

        let (table, _) = prune_null_rows(table, 0.2);
        prop_assert!(table.row_count() <= rows);
        prop_assert_eq!(table.headers(), columns);
    }

    #[test]
    fn columns_stay_homogeneous(table in table_strategy()) {
        let (table, _) = clean(table, &CleanOptions::default());
        for column in table.columns() {
            let datatype = column.datatype();
            for value in column.cells().iter().flatten() {
                prop_assert_eq!(value.column_type(), datatype);
            }
        }
    }
}

#[test]
fn clean_input_round_trips_unchanged() {
    let table = Table::new(vec![
        Column::text("id", [Some("1"), Some("2"), Some("3")]),
        Column::text("city", [Some("Paris"), Some("New York"), Some("Oslo")]),
        Column::text("seen", [Some("2024-01-01"), Some("2024-02-01"), Some("2024-03-01")]),
    ])
    .unwrap();

    let (cleaned, report) = clean(table, &CleanOptions::default());
    assert_eq!(cleaned.row_count(), 3);
    assert_eq!(cleaned.column_count(), 3);
    assert_eq!(report.duplicates_removed, 0);
    assert_eq!(report.cells_trimmed, 0);
    assert_eq!(report.cells_standardized, 0);
    assert_eq!(report.pruning.null_rows, 0);

    let ids = cleaned.column("id").unwrap();
    assert_eq!(ids.datatype(), ColumnType::Integer);
    assert_eq!(ids.cells()[2], Some(Value::Integer(3)));
    assert_eq!(
        cleaned.column("city").unwrap().text_values().collect::<Vec<_>>(),
        vec![Some("Paris"), Some("New York"), Some("Oslo")]
    );
    assert_eq!(cleaned.column("seen").unwrap().datatype(), ColumnType::Date);
}

#[test]
fn null_threshold_boundary_on_full_pipeline() {
    fn build(null_rows: usize) -> Table {
        let ids = (0..100).map(|i| Some(i.to_string()));
        let labels = (0..100).map(|i| (i >= null_rows).then(|| format!("label {i}")));
        Table::new(vec![Column::text("id", ids), Column::text("label", labels)]).unwrap()
    }

    let (kept, _) = clean(build(20), &CleanOptions::default());
    assert_eq!(kept.row_count(), 100);

    let (pruned, report) = clean(build(19), &CleanOptions::default());
    assert_eq!(pruned.row_count(), 81);
    assert_eq!(report.pruning.null_rows_removed, 19);
}
