use std::collections::HashSet;

use crate::table::Table;

/// Keeps the first occurrence of each distinct row, in original order.
/// Returns the table and the number of rows removed.
pub fn deduplicate(table: Table) -> (Table, usize) {
    let keep = {
        let mut seen = HashSet::with_capacity(table.row_count());
        table.rows().map(|row| seen.insert(row)).collect::<Vec<_>>()
    };
    let before = table.row_count();
    let table = table.retain_rows(&keep);
    let removed = before - table.row_count();
    (table, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn table(rows: &[[Option<&str>; 2]]) -> Table {
        Table::from_rows(
            vec!["a".to_string(), "b".to_string()],
            rows.iter()
                .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn removes_later_duplicates_preserving_order() {
        let input = table(&[
            [Some("1"), Some("x")],
            [Some("2"), Some("y")],
            [Some("1"), Some("x")],
            [Some("3"), Some("z")],
            [Some("2"), Some("y")],
        ]);
        let (output, removed) = deduplicate(input);
        assert_eq!(removed, 2);
        let firsts = output
            .column("a")
            .unwrap()
            .text_values()
            .collect::<Vec<_>>();
        assert_eq!(firsts, vec![Some("1"), Some("2"), Some("3")]);
    }

    #[test]
    fn nulls_compare_equal() {
        let input = table(&[[None, Some("x")], [None, Some("x")], [Some(""), Some("x")]]);
        let (output, removed) = deduplicate(input);
        assert_eq!(removed, 1);
        assert_eq!(output.row_count(), 2);
        assert_eq!(output.row(1)[0], Some(&Value::String(String::new())));
    }

    #[test]
    fn whitespace_differences_are_distinct_rows() {
        let input = table(&[[Some("a"), Some("x")], [Some(" a"), Some("x")]]);
        let (_, removed) = deduplicate(input);
        assert_eq!(removed, 0);
    }

    #[test]
    fn empty_table_stays_empty() {
        let (output, removed) = deduplicate(table(&[]));
        assert_eq!(removed, 0);
        assert!(output.is_empty());
    }
}
