//! Cleaning options: built-in defaults, an optional YAML file, then CLI flags.

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::{
    cli::Cli,
    transform::{
        infer::{DEFAULT_NUMERIC_THRESHOLD, DEFAULT_TEMPORAL_THRESHOLD, InferenceOptions},
        prune::DEFAULT_NULL_ROW_THRESHOLD,
    },
};

pub const DEFAULT_OUTPUT_SUFFIX: &str = "_cleaned";

/// Field values read as null by the loader, in addition to empty fields.
pub const DEFAULT_NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
    "nan", "null",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanOptions {
    pub numeric_threshold: f64,
    pub temporal_threshold: f64,
    pub null_row_threshold: f64,
    pub day_first: bool,
    pub null_tokens: Vec<String>,
    pub output_suffix: String,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
            temporal_threshold: DEFAULT_TEMPORAL_THRESHOLD,
            null_row_threshold: DEFAULT_NULL_ROW_THRESHOLD,
            day_first: false,
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl CleanOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        let options: CleanOptions = serde_yaml::from_str(&raw)
            .with_context(|| format!("Parsing config file {path:?}"))?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Defaults, overlaid by `--config`, overlaid by individual flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut options = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(value) = cli.numeric_threshold {
            options.numeric_threshold = value;
        }
        if let Some(value) = cli.temporal_threshold {
            options.temporal_threshold = value;
        }
        if let Some(value) = cli.null_row_threshold {
            options.null_row_threshold = value;
        }
        if cli.day_first {
            options.day_first = true;
        }
        if let Some(suffix) = &cli.suffix {
            options.output_suffix = suffix.clone();
        }
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("numeric_threshold", self.numeric_threshold),
            ("temporal_threshold", self.temporal_threshold),
            ("null_row_threshold", self.null_row_threshold),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                "{name} must lie between 0 and 1 (got {value})"
            );
        }
        Ok(())
    }

    pub fn inference(&self) -> InferenceOptions {
        InferenceOptions {
            numeric_threshold: self.numeric_threshold,
            temporal_threshold: self.temporal_threshold,
            day_first: self.day_first,
        }
    }
}
