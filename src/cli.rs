use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Clean a CSV file: deduplicate, trim, infer column types, standardize text, prune null rows",
    long_about = None
)]
pub struct Cli {
    /// Input CSV file to clean
    pub input: PathBuf,
    /// Output CSV file (defaults to `<input stem>_cleaned.<ext>` beside the input)
    pub output: Option<PathBuf>,
    /// YAML file with cleaning options; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Write a JSON report of every stage's counts and column decisions
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Fraction of rows that must parse as numbers for a column to become numeric
    #[arg(long, value_parser = parse_ratio)]
    pub numeric_threshold: Option<f64>,
    /// Fraction of rows that must parse as dates for a column to become temporal
    #[arg(long, value_parser = parse_ratio)]
    pub temporal_threshold: Option<f64>,
    /// Null-bearing rows are dropped only when their fraction is below this value
    #[arg(long, value_parser = parse_ratio)]
    pub null_row_threshold: Option<f64>,
    /// Read ambiguous dates such as 02/03/2024 as day/month/year
    #[arg(long)]
    pub day_first: bool,
    /// Suffix appended to the input file stem when no output path is given
    #[arg(long)]
    pub suffix: Option<String>,
    /// Print the first ROWS cleaned rows as a table on stdout
    #[arg(long, value_name = "ROWS")]
    pub preview: Option<usize>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" | "\\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub fn parse_ratio(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if (0.0..=1.0).contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!("{parsed} must lie between 0 and 1"))
    }
}
