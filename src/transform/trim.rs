use crate::{table::Table, transform::string_ops};

/// Strips leading/trailing whitespace from every text cell. Returns the table
/// and the number of cells that changed.
pub fn trim_text(table: Table) -> (Table, usize) {
    let mut changed = 0usize;
    let table = table.map_columns(|column| {
        let (column, count) = column.map_text(string_ops::trim);
        changed += count;
        column
    });
    (table, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn trims_text_and_keeps_nulls() {
        let table = Table::new(vec![Column::text(
            "name",
            [Some("  Alice "), None, Some("\tBob"), Some("   ")],
        )])
        .unwrap();
        let (table, changed) = trim_text(table);
        assert_eq!(changed, 3);
        let values = table
            .column("name")
            .unwrap()
            .text_values()
            .collect::<Vec<_>>();
        assert_eq!(values, vec![Some("Alice"), None, Some("Bob"), Some("")]);
    }

    #[test]
    fn internal_whitespace_is_untouched() {
        let table = Table::new(vec![Column::text("c", [Some(" a  b ")])]).unwrap();
        let (table, _) = trim_text(table);
        assert_eq!(
            table.column("c").unwrap().text_values().next(),
            Some(Some("a  b"))
        );
    }
}
