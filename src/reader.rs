//! Loads a delimited file into a text [`Table`].

use std::{collections::HashSet, io::Read, path::Path};

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};
use thiserror::Error;

use crate::{io_utils, table::Table};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input contains no header row")]
    EmptyInput,
    #[error("Row {row} has {actual} field(s) but the header declares {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone)]
pub struct LoadOptions<'a> {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub null_tokens: &'a [String],
}

impl Default for LoadOptions<'_> {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
            null_tokens: &[],
        }
    }
}

pub fn load_table(path: &Path, options: &LoadOptions<'_>) -> Result<Table> {
    let reader = io_utils::open_csv_reader_from_path(path, options.delimiter)?;
    let table =
        read_table(reader, options).with_context(|| format!("Loading table from {path:?}"))?;
    info!(
        "Read {:?}: {} row(s), {} column(s)",
        path,
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Reads headers plus records. Short records are padded with nulls; long
/// records are rejected.
pub fn read_table<R: Read>(mut reader: csv::Reader<R>, options: &LoadOptions<'_>) -> Result<Table> {
    let header_record = reader.byte_headers().context("Reading header row")?.clone();
    let raw_headers = io_utils::decode_record(&header_record, options.encoding)
        .context("Decoding header row")?;
    if raw_headers.is_empty() || raw_headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::EmptyInput.into());
    }
    let headers = unique_headers(&raw_headers);
    let width = headers.len();

    let null_tokens = options
        .null_tokens
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>();
    let mut rows = Vec::new();
    let mut padded = 0usize;
    for (idx, record) in reader.byte_records().enumerate() {
        let line = idx + 2;
        let record = record.with_context(|| format!("Reading row {line}"))?;
        if record.len() > width {
            return Err(LoadError::RowWidth {
                row: line,
                expected: width,
                actual: record.len(),
            }
            .into());
        }
        let fields = io_utils::decode_record(&record, options.encoding)
            .with_context(|| format!("Decoding row {line}"))?;
        let mut row = fields
            .into_iter()
            .map(|field| {
                if field.is_empty() || null_tokens.contains(field.as_str()) {
                    None
                } else {
                    Some(field)
                }
            })
            .collect::<Vec<_>>();
        if row.len() < width {
            padded += 1;
            row.resize(width, None);
        }
        rows.push(row);
    }
    if padded > 0 {
        debug!("Padded {padded} short row(s) with nulls");
    }
    Ok(Table::from_rows(headers, rows)?)
}

/// Blank headers become `Unnamed: <idx>`; repeats get `.1`, `.2`, ... suffixes.
fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                header.clone()
            };
            let mut candidate = base.clone();
            let mut counter = 1usize;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}.{counter}");
                counter += 1;
            }
            candidate
        })
        .collect()
}
