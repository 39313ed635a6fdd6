//! Cell values, column types, and the per-cell parsers used by type inference.
//!
//! Every parser here is total: a cell that does not fit a type yields `None`
//! rather than an error, so callers can count successes and fall through to
//! the next candidate type without unwinding.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::LazyLock,
};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters removed from a cell before it is parsed as a number.
pub const NUMERIC_NOISE: &[char] = &[',', '$', '€', '£'];

/// Literal tokens accepted by the boolean hypothesis, lower-case.
pub const TRUE_TOKENS: &[&str] = &["true", "yes", "1", "t", "y"];
pub const FALSE_TOKENS: &[&str] = &["false", "no", "0", "f", "n"];

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid number pattern")
});

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid year pattern"));

/// `%Y` also matches one to three digits; parses below this year are
/// discarded so the `%y` layouts get their turn.
const MIN_PARSED_YEAR: i32 = 1000;

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const MONTH_FIRST_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y", "%m/%d/%y", "%m-%d-%y", "%m.%d.%y",
];
const DAY_FIRST_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y", "%d-%m-%y", "%d.%m.%y",
];
const NAMED_MONTH_DATE_FORMATS: &[&str] = &[
    "%d %b %Y",
    "%d-%b-%Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%d %b %y",
    "%d-%b-%y",
    "%b %d %y",
    "%b %d, %y",
];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

static MONTH_FIRST_ORDER: LazyLock<FormatOrder> =
    LazyLock::new(|| FormatOrder::new(MONTH_FIRST_DATE_FORMATS, DAY_FIRST_DATE_FORMATS));
static DAY_FIRST_ORDER: LazyLock<FormatOrder> =
    LazyLock::new(|| FormatOrder::new(DAY_FIRST_DATE_FORMATS, MONTH_FIRST_DATE_FORMATS));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnType::String)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

// Floats compare and hash by bit pattern so row keys stay reflexive and
// `0.0`/`-0.0` stay distinct in both.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::DateTime(dt) => dt.hash(state),
        }
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::String(_) => ColumnType::String,
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
            Value::Boolean(_) => ColumnType::Boolean,
            Value::Date(_) => ColumnType::Date,
            Value::DateTime(_) => ColumnType::DateTime,
        }
    }

    /// Stable textual rendering used when writing the cleaned table.
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Boolean(true) => "True".to_string(),
            Value::Boolean(false) => "False".to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Parses a signed decimal number after removing thousands separators and
/// currency symbols. `inf`/`nan` spellings are not numbers here.
pub fn parse_number(value: &str) -> Option<Number> {
    let stripped = value
        .chars()
        .filter(|c| !NUMERIC_NOISE.contains(c))
        .collect::<String>();
    let stripped = stripped.trim();
    if !NUMBER_PATTERN.is_match(stripped) {
        return None;
    }
    if !stripped.contains(['.', 'e', 'E']) {
        if let Ok(integer) = stripped.parse::<i64>() {
            return Some(Number::Integer(integer));
        }
    }
    stripped
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Number::Float)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Temporal {
    pub fn to_datetime(self) -> NaiveDateTime {
        match self {
            Temporal::Date(d) => d.and_time(NaiveTime::MIN),
            Temporal::DateTime(dt) => dt,
        }
    }
}

struct FormatOrder {
    dates: Vec<&'static str>,
    datetimes: Vec<String>,
}

impl FormatOrder {
    fn new(preferred: &[&'static str], fallback: &[&'static str]) -> Self {
        let dates = ISO_DATE_FORMATS
            .iter()
            .chain(preferred)
            .chain(fallback)
            .chain(NAMED_MONTH_DATE_FORMATS)
            .copied()
            .collect::<Vec<_>>();
        let mut datetimes = Vec::with_capacity(dates.len() * TIME_FORMATS.len() * 2);
        for date in &dates {
            for separator in [" ", "T"] {
                for time in TIME_FORMATS {
                    datetimes.push(format!("{date}{separator}{time}"));
                }
            }
        }
        Self { dates, datetimes }
    }
}

/// Best-effort calendar parse. Month-first wins for ambiguous slash/dash/dot
/// dates unless `day_first` is set; the other order is still tried afterwards.
/// Two-digit years go through `%y` (1970-2069), never a truncated `%Y`.
pub fn parse_temporal(value: &str, day_first: bool) -> Option<Temporal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if YEAR_PATTERN.is_match(trimmed) {
        let year = trimmed.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1).map(Temporal::Date);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(Temporal::DateTime(parsed.naive_utc()));
    }
    let order = if day_first {
        &*DAY_FIRST_ORDER
    } else {
        &*MONTH_FIRST_ORDER
    };
    let date = order.dates.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(trimmed, fmt)
            .ok()
            .filter(|parsed| parsed.year() >= MIN_PARSED_YEAR)
    });
    if let Some(parsed) = date {
        return Some(Temporal::Date(parsed));
    }
    order
        .datetimes
        .iter()
        .find_map(|fmt| {
            NaiveDateTime::parse_from_str(trimmed, fmt)
                .ok()
                .filter(|parsed| parsed.year() >= MIN_PARSED_YEAR)
        })
        .map(Temporal::DateTime)
}

pub fn parse_boolean_token(value: &str) -> Option<bool> {
    let lowered = value.trim().to_lowercase();
    if TRUE_TOKENS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}
