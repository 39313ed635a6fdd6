pub mod cli;
pub mod config;
pub mod data;
pub mod io_utils;
pub mod pipeline;
pub mod preview;
pub mod reader;
pub mod table;
pub mod transform;
pub mod writer;

use std::{env, fs, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::Cli,
    config::CleanOptions,
    reader::LoadOptions,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging(level: LevelFilter) {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_tidy", level);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

fn log_level(cli: &Cli) -> LevelFilter {
    if cli.quiet {
        return LevelFilter::Warn;
    }
    match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(log_level(&cli));
    execute(&cli)
}

pub fn execute(cli: &Cli) -> Result<()> {
    let options = CleanOptions::resolve(cli)?;
    debug!("Effective options:\n{}", options.to_yaml_string()?);

    let delimiter = io_utils::resolve_input_delimiter(&cli.input, cli.delimiter);
    let encoding = io_utils::resolve_encoding(cli.input_encoding.as_deref())?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| io_utils::derive_output_path(&cli.input, &options.output_suffix));
    let output_delimiter =
        io_utils::resolve_output_delimiter(&output, cli.output_delimiter, delimiter);
    info!(
        "Cleaning '{}' -> '{}' (delimiter '{}', output '{}')",
        cli.input.display(),
        output.display(),
        printable_delimiter(delimiter),
        printable_delimiter(output_delimiter)
    );

    let load_options = LoadOptions {
        delimiter,
        encoding,
        null_tokens: &options.null_tokens,
    };
    let table = reader::load_table(&cli.input, &load_options)?;
    let (table, report) = pipeline::clean(table, &options);

    writer::save_table(&table, &output, output_delimiter)?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report).context("Serializing cleaning report")?;
        fs::write(path, json).with_context(|| format!("Writing report to {path:?}"))?;
        info!("Cleaning report written to {path:?}");
    }
    if let Some(rows) = cli.preview {
        print!("{}", preview::render_preview(&table, rows));
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
