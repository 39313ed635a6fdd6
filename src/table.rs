//! In-memory table flowing through the cleaning pipeline.
//!
//! A [`Table`] is an ordered list of named [`Column`]s that all hold the same
//! number of cells. Construction checks both properties; the transforms in
//! [`crate::transform`] only ever rebuild columns cell-for-cell or drop whole
//! rows, so the invariants hold at every stage boundary.

use std::borrow::Cow;
use std::collections::HashSet;

use thiserror::Error;

use crate::data::{ColumnType, Value};

pub type Cell = Option<Value>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("Column '{column}' holds {actual} cell(s) but the table has {expected} row(s)")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Row {row} holds {actual} field(s) but the table has {expected} column(s)")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    datatype: ColumnType,
    cells: Vec<Cell>,
}

impl Column {
    /// Builds a raw text column; every non-null cell becomes [`Value::String`].
    pub fn text<I, S>(name: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            datatype: ColumnType::String,
            cells: cells
                .into_iter()
                .map(|cell| cell.map(|s| Value::String(s.into())))
                .collect(),
        }
    }

    /// Builds a typed column. Callers guarantee every non-null cell matches `datatype`.
    pub(crate) fn typed(name: String, datatype: ColumnType, cells: Vec<Cell>) -> Self {
        debug_assert!(
            cells
                .iter()
                .flatten()
                .all(|value| value.column_type() == datatype),
            "column '{name}' mixes value types"
        );
        Self {
            name,
            datatype,
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datatype(&self) -> ColumnType {
        self.datatype
    }

    pub fn is_textual(&self) -> bool {
        self.datatype.is_textual()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Raw text of each cell; `None` for nulls and for non-text values.
    pub fn text_values(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.cells
            .iter()
            .map(|cell| cell.as_ref().and_then(Value::as_str))
    }

    pub fn into_parts(self) -> (String, ColumnType, Vec<Cell>) {
        (self.name, self.datatype, self.cells)
    }

    /// Rewrites every non-null text cell with `f`, returning the column and the
    /// number of cells whose content changed. Non-text columns are returned as-is.
    pub fn map_text<F>(self, mut f: F) -> (Self, usize)
    where
        F: FnMut(&str) -> Cow<'_, str>,
    {
        if !self.is_textual() {
            return (self, 0);
        }
        let mut changed = 0usize;
        let cells = self
            .cells
            .into_iter()
            .map(|cell| match cell {
                Some(Value::String(raw)) => {
                    let rewritten = match f(&raw) {
                        Cow::Borrowed(same) if same.len() == raw.len() => None,
                        other => Some(other.into_owned()),
                    };
                    match rewritten {
                        Some(value) if value != raw => {
                            changed += 1;
                            Some(Value::String(value))
                        }
                        _ => Some(Value::String(raw)),
                    }
                }
                other => other,
            })
            .collect();
        (
            Self {
                name: self.name,
                datatype: self.datatype,
                cells,
            },
            changed,
        )
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.cells
            .retain(|_| flags.next().copied().unwrap_or(false));
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TableError::DuplicateColumn(column.name().to_string()));
            }
        }
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        if let Some(ragged) = columns.iter().find(|column| column.len() != row_count) {
            return Err(TableError::RaggedColumn {
                column: ragged.name().to_string(),
                expected: row_count,
                actual: ragged.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    /// Builds a text table from row-major data.
    pub fn from_rows(
        headers: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, TableError> {
        let width = headers.len();
        let mut columns_data: Vec<Vec<Option<String>>> =
            (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(TableError::RowWidth {
                    row: idx + 1,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (column, cell) in columns_data.iter_mut().zip(row) {
                column.push(cell);
            }
        }
        let columns = headers
            .into_iter()
            .zip(columns_data)
            .map(|(name, cells)| Column::text(name, cells))
            .collect();
        Self::new(columns)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.name().to_string())
            .collect()
    }

    /// Cells of row `index` in column order.
    pub fn row(&self, index: usize) -> Vec<Option<&Value>> {
        self.columns
            .iter()
            .map(|column| column.cells()[index].as_ref())
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<&Value>>> + '_ {
        (0..self.row_count).map(|idx| self.row(idx))
    }

    /// Keeps row `i` when `keep[i]` is true. Rows beyond `keep` are dropped.
    pub fn retain_rows(mut self, keep: &[bool]) -> Self {
        for column in &mut self.columns {
            column.retain_rows(keep);
        }
        self.row_count = keep
            .iter()
            .take(self.row_count)
            .filter(|flag| **flag)
            .count();
        self
    }

    /// Applies a cell-for-cell column transform to every column in order.
    pub fn map_columns<F>(self, f: F) -> Self
    where
        F: FnMut(Column) -> Column,
    {
        let row_count = self.row_count;
        let columns = self.columns.into_iter().map(f).collect::<Vec<_>>();
        debug_assert!(columns.iter().all(|column| column.len() == row_count));
        Self { columns, row_count }
    }
}
