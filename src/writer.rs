//! Serializes a cleaned [`Table`] back to delimited text.

use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use log::info;

use crate::{data::Value, io_utils, table::Table};

/// Text written for a cell: the value's stable rendering, or an empty field for null.
pub fn render_cell(cell: Option<&Value>) -> String {
    cell.map(Value::as_display).unwrap_or_default()
}

pub fn write_table<W: Write>(table: &Table, writer: &mut csv::Writer<W>) -> Result<()> {
    writer
        .write_record(table.headers())
        .context("Writing output headers")?;
    for (idx, row) in table.rows().enumerate() {
        let rendered = row.into_iter().map(render_cell);
        writer
            .write_record(rendered)
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    writer.flush().context("Flushing output writer")?;
    Ok(())
}

pub fn save_table(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = io_utils::open_csv_writer_to_path(path, delimiter)?;
    write_table(table, &mut writer)?;
    info!(
        "Cleaned data saved to {:?}: {} row(s), {} column(s)",
        path,
        table.row_count(),
        table.column_count()
    );
    Ok(())
}
