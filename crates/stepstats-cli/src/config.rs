//! Optional TOML config file and settings resolution.
//!
//! ```toml
//! input_dir = "2026-2-14 animefest data"
//! output = "parsed.csv"
//! format = "csv"
//! keep_going = false
//! preview_rows = 5
//! ```
//!
//! Command-line flags win over the file, the file wins over built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use stepstats_core::{BatchOptions, OutputFormat};
use tracing::debug;

use crate::cli::{ConvertArgs, PreviewArgs};

pub const DEFAULT_OUTPUT: &str = "parsed.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub input_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub keep_going: Option<bool>,
    pub preview_rows: Option<usize>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stepstats").join("config.toml"))
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Load the explicit config, else the default one if it exists
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!("Using config {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

fn require_input(arg: Option<&PathBuf>, config: &FileConfig) -> Result<PathBuf> {
    match arg.or(config.input_dir.as_ref()) {
        Some(dir) => Ok(dir.clone()),
        None => bail!("No input directory given (pass INPUT or set input_dir in the config file)"),
    }
}

fn batch_options(keep_going: Option<bool>, config: &FileConfig) -> BatchOptions {
    BatchOptions::builder()
        .keep_going(keep_going.or(config.keep_going).unwrap_or(false))
        .build()
}

/// Fully resolved settings for `convert`
#[derive(Debug)]
pub struct ConvertSettings {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub batch: BatchOptions,
    pub preview_rows: usize,
}

impl ConvertSettings {
    pub fn resolve(args: &ConvertArgs, config: &FileConfig) -> Result<Self> {
        let input_dir = require_input(args.input.as_ref(), config)?;
        let output = args
            .output
            .clone()
            .or_else(|| config.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        // An explicit -o extension outranks the config's format
        let format = args
            .format
            .map(OutputFormat::from)
            .or_else(|| args.output.as_ref().and_then(OutputFormat::from_path))
            .or(config.format)
            .or_else(|| OutputFormat::from_path(&output))
            .unwrap_or_default();

        Ok(Self {
            input_dir,
            output,
            format,
            batch: batch_options(args.keep_going.value(), config),
            preview_rows: args
                .preview_rows
                .or(config.preview_rows)
                .unwrap_or(DEFAULT_PREVIEW_ROWS),
        })
    }
}

/// Fully resolved settings for `preview`
#[derive(Debug)]
pub struct PreviewSettings {
    pub input_dir: PathBuf,
    pub batch: BatchOptions,
    pub rows: usize,
}

impl PreviewSettings {
    pub fn resolve(args: &PreviewArgs, config: &FileConfig) -> Result<Self> {
        Ok(Self {
            input_dir: require_input(args.input.as_ref(), config)?,
            batch: batch_options(args.keep_going.value(), config),
            rows: args
                .rows
                .or(config.preview_rows)
                .unwrap_or(DEFAULT_PREVIEW_ROWS),
        })
    }
}
