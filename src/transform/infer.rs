//! Per-column type inference and coercion.
//!
//! Each text column is tested against a fixed, ordered list of hypotheses:
//! numeric, then temporal, then boolean. The first hypothesis whose
//! acceptance rule holds replaces the column with parsed values; if none
//! holds the column stays text. Numeric must precede temporal because plain
//! integers such as `2021` are also valid year-only dates.
//!
//! Numeric and temporal acceptance is a ratio of parsed cells over the full
//! row count (nulls count against the column). Boolean acceptance requires
//! every non-null cell to be a recognised token.

use log::debug;
use serde::Serialize;

use crate::{
    data::{ColumnType, Number, Temporal, Value, parse_boolean_token, parse_number, parse_temporal},
    table::{Cell, Column, Table},
};

pub const DEFAULT_NUMERIC_THRESHOLD: f64 = 0.8;
pub const DEFAULT_TEMPORAL_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hypothesis {
    Numeric,
    Temporal,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Acceptance {
    /// Parsed cells / total rows must reach the ratio.
    Ratio(f64),
    /// Every non-null cell must parse, and at least one must exist.
    AllNonNull,
}

impl Acceptance {
    fn accepts(self, parsed: usize, non_null: usize, rows: usize) -> bool {
        match self {
            Acceptance::Ratio(threshold) => rows > 0 && ratio(parsed, rows) >= threshold,
            Acceptance::AllNonNull => non_null > 0 && parsed == non_null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceOptions {
    pub numeric_threshold: f64,
    pub temporal_threshold: f64,
    pub day_first: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
            temporal_threshold: DEFAULT_TEMPORAL_THRESHOLD,
            day_first: false,
        }
    }
}

impl InferenceOptions {
    fn hypotheses(&self) -> [(Hypothesis, Acceptance); 3] {
        [
            (Hypothesis::Numeric, Acceptance::Ratio(self.numeric_threshold)),
            (
                Hypothesis::Temporal,
                Acceptance::Ratio(self.temporal_threshold),
            ),
            (Hypothesis::Boolean, Acceptance::AllNonNull),
        ]
    }
}

/// Outcome of inference for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDecision {
    pub column: String,
    pub datatype: ColumnType,
    pub hypothesis: Option<Hypothesis>,
    /// Cells parsed by the accepted hypothesis (0 when the column stays text).
    pub parsed: usize,
    pub rows: usize,
}

impl ColumnDecision {
    pub fn coerced(&self) -> bool {
        self.hypothesis.is_some()
    }
}

/// Cells produced by one hypothesis, before the acceptance rule is applied.
struct Attempt {
    datatype: ColumnType,
    cells: Vec<Cell>,
    parsed: usize,
}

pub fn coerce_types(table: Table, options: &InferenceOptions) -> (Table, Vec<ColumnDecision>) {
    let mut decisions = Vec::with_capacity(table.column_count());
    let table = table.map_columns(|column| {
        let (column, decision) = infer_column(column, options);
        decisions.push(decision);
        column
    });
    (table, decisions)
}

/// Runs the hypotheses against a single column. Columns that are already typed
/// are returned unchanged.
pub fn infer_column(column: Column, options: &InferenceOptions) -> (Column, ColumnDecision) {
    let rows = column.len();
    if !column.is_textual() {
        let decision = ColumnDecision {
            column: column.name().to_string(),
            datatype: column.datatype(),
            hypothesis: None,
            parsed: 0,
            rows,
        };
        return (column, decision);
    }

    let non_null = rows - column.null_count();
    for (hypothesis, acceptance) in options.hypotheses() {
        let Some(attempt) = run_hypothesis(hypothesis, &column, options) else {
            debug!("Column '{}': {hypothesis:?} not applicable", column.name());
            continue;
        };
        if !acceptance.accepts(attempt.parsed, non_null, rows) {
            debug!(
                "Column '{}': {hypothesis:?} parsed {}/{} row(s), rejected",
                column.name(),
                attempt.parsed,
                rows
            );
            continue;
        }
        let (name, _, _) = column.into_parts();
        let decision = ColumnDecision {
            column: name.clone(),
            datatype: attempt.datatype,
            hypothesis: Some(hypothesis),
            parsed: attempt.parsed,
            rows,
        };
        return (Column::typed(name, attempt.datatype, attempt.cells), decision);
    }

    let decision = ColumnDecision {
        column: column.name().to_string(),
        datatype: ColumnType::String,
        hypothesis: None,
        parsed: 0,
        rows,
    };
    (column, decision)
}

fn run_hypothesis(
    hypothesis: Hypothesis,
    column: &Column,
    options: &InferenceOptions,
) -> Option<Attempt> {
    match hypothesis {
        Hypothesis::Numeric => Some(numeric_attempt(column)),
        Hypothesis::Temporal => Some(temporal_attempt(column, options.day_first)),
        Hypothesis::Boolean => boolean_attempt(column),
    }
}

fn numeric_attempt(column: &Column) -> Attempt {
    let parsed = column
        .text_values()
        .map(|value| value.and_then(parse_number))
        .collect::<Vec<_>>();
    let count = parsed.iter().flatten().count();
    let all_integer = parsed
        .iter()
        .flatten()
        .all(|number| matches!(number, Number::Integer(_)));
    let (datatype, cells) = if all_integer {
        let cells = parsed
            .into_iter()
            .map(|number| match number {
                Some(Number::Integer(i)) => Some(Value::Integer(i)),
                _ => None,
            })
            .collect();
        (ColumnType::Integer, cells)
    } else {
        let cells = parsed
            .into_iter()
            .map(|number| number.map(|n| Value::Float(n.as_f64())))
            .collect();
        (ColumnType::Float, cells)
    };
    Attempt {
        datatype,
        cells,
        parsed: count,
    }
}

fn temporal_attempt(column: &Column, day_first: bool) -> Attempt {
    let parsed = column
        .text_values()
        .map(|value| value.and_then(|v| parse_temporal(v, day_first)))
        .collect::<Vec<_>>();
    let count = parsed.iter().flatten().count();
    let has_time = parsed
        .iter()
        .flatten()
        .any(|temporal| matches!(temporal, Temporal::DateTime(_)));
    let (datatype, cells) = if has_time {
        let cells = parsed
            .into_iter()
            .map(|temporal| temporal.map(|t| Value::DateTime(t.to_datetime())))
            .collect();
        (ColumnType::DateTime, cells)
    } else {
        let cells = parsed
            .into_iter()
            .map(|temporal| match temporal {
                Some(Temporal::Date(d)) => Some(Value::Date(d)),
                _ => None,
            })
            .collect();
        (ColumnType::Date, cells)
    };
    Attempt {
        datatype,
        cells,
        parsed: count,
    }
}

/// `None` as soon as a non-null cell is not a boolean token.
fn boolean_attempt(column: &Column) -> Option<Attempt> {
    let mut parsed = 0usize;
    let mut cells = Vec::with_capacity(column.len());
    for value in column.text_values() {
        match value {
            Some(raw) => {
                let flag = parse_boolean_token(raw)?;
                parsed += 1;
                cells.push(Some(Value::Boolean(flag)));
            }
            None => cells.push(None),
        }
    }
    Some(Attempt {
        datatype: ColumnType::Boolean,
        cells,
        parsed,
    })
}

fn ratio(count: usize, total: usize) -> f64 {
    count as f64 / total as f64
}
