use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    bail,
    Context,
};
use clap::{
    Args,
    ValueEnum,
};
use console::style;
use log::LevelFilter;
use slabread::prelude::*;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(short, long, help = "Log progress to stderr")]
    pub verbose: bool,
}

impl UtilsArgs {
    /// Initialises logging. `RUST_LOG` overrides the level chosen here.
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = if self.verbose {
            LevelFilter::Debug
        }
        else {
            LevelFilter::Warn
        };
        pretty_env_logger::formatted_builder()
            .filter_level(level)
            .parse_default_env()
            .try_init()
            .context("failed to initialise logging")?;
        Ok(())
    }
}

/// Selection flags shared by `plan` and `read`.
#[derive(Args, Debug, Clone)]
pub(crate) struct SpecArgs {
    #[arg(
        short,
        long,
        allow_hyphen_values = true,
        help = "1-based starts: axes separated by ';', entries by ','"
    )]
    pub starts: String,

    #[arg(
        short,
        long,
        allow_hyphen_values = true,
        help = "Counts, same layout as --starts [default: 1 for every entry]"
    )]
    pub counts: Option<String>,
}

impl SpecArgs {
    pub fn to_spec(&self) -> anyhow::Result<SelectionSpec> {
        SelectionSpec::parse(&self.starts, self.counts.as_deref())
            .with_context(|| format!("invalid selection '{}'", self.starts))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum CliElementType {
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl From<CliElementType> for ElementType {
    fn from(value: CliElementType) -> Self {
        match value {
            CliElementType::U8 => ElementType::U8,
            CliElementType::I16 => ElementType::I16,
            CliElementType::I32 => ElementType::I32,
            CliElementType::I64 => ElementType::I64,
            CliElementType::F32 => ElementType::F32,
            CliElementType::F64 => ElementType::F64,
        }
    }
}

pub(crate) fn validate_input(path: &Path) -> anyhow::Result<PathBuf> {
    if !path.exists() {
        bail!("Path {} does not exist.", style(path.display()).red());
    }
    if !path.is_file() {
        bail!("Path {} is not a file.", style(path.display()).red());
    }
    Ok(path.to_path_buf())
}

pub(crate) fn validate_output(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_dir() {
        bail!("Path {} is a directory.", style(path.display()).red());
    }
    Ok(path.to_path_buf())
}

/// Parses a comma-separated list of extents.
pub(crate) fn parse_dims(s: &str) -> anyhow::Result<Vec<u64>> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|d| {
            d.trim()
                .parse::<u64>()
                .with_context(|| format!("invalid extent '{}'", d))
        })
        .collect()
}
