use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "ratio-mix")]
#[command(about = "Edit per-role category ratios that always sum to 100%")]
pub struct CliConfig {
    /// Path to TOML configuration file (built-in sex/gender editor if omitted)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to JSON settings file, overrides storage.settings_path
    #[arg(short, long, global = true)]
    pub settings: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// Print the current ratios of every target
    Show,
    /// Move one category slider and rebalance the others
    Set {
        #[arg(short, long)]
        target: String,
        #[arg(long)]
        category: String,
        /// Slider position, clamped to 0..=100 and snapped to the slider step
        #[arg(short, long, allow_negative_numbers = true)]
        percent: f64,
    },
    /// Apply a named preset to every target
    Preset { name: String },
    /// List the available presets
    Presets,
    /// Export raw ratios as CSV or TSV
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(config) = &self.config {
            validation::validate_path("config", config)?;
        }
        if let Some(settings) = &self.settings {
            validation::validate_path("settings", settings)?;
        }
        if let Command::Export {
            output: Some(output),
            ..
        } = &self.command
        {
            validation::validate_path("output", output)?;
        }
        Ok(())
    }
}
