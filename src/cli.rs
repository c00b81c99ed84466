use crate::error::{ConversionError, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show failures
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// Report format for conversion results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Per-file lines followed by a summary
    #[default]
    Human,
    /// Machine-readable JSON report
    Json,
    /// Summary only
    Summary,
}

/// How output markdown files are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Naming {
    /// `mirror` for a single input file, `entity` for a directory
    #[default]
    Auto,
    /// `data-model-context-<record type slug>.md`
    Entity,
    /// Input file name with a `.md` extension
    Mirror,
}

/// Convert record type XML exports into markdown context references
#[derive(Parser, Debug, Clone)]
#[command(name = "recordtype-md")]
#[command(
    about = "Convert recordTypeHaul XML exports into markdown record type context references"
)]
#[command(version)]
#[command(after_help = "EXAMPLES:
  recordtype-md Invoice.xml
  recordtype-md Invoice.xml -o docs/invoice.md --title \"Invoice Reference\"
  recordtype-md exports/ -o docs/ --naming entity")]
pub struct Cli {
    /// Export file or directory of exports
    #[arg(help = "XML export file or directory of exports")]
    pub path: PathBuf,

    /// Output file (single input) or directory
    #[arg(short = 'o', long = "output", help = "Output file or directory")]
    pub output: Option<PathBuf>,

    /// Document title; `{name}` is replaced by the record type name
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Output file naming scheme [default: auto]
    #[arg(long = "naming", value_enum)]
    pub naming: Option<Naming>,

    /// File extensions to process (comma-separated)
    #[arg(
        short = 'e',
        long = "extensions",
        help = "File extensions to process (e.g., 'xml') [default: xml]"
    )]
    pub extensions: Option<String>,

    /// Number of concurrent conversions
    #[arg(short = 't', long = "threads", help = "Number of concurrent conversions")]
    pub threads: Option<usize>,

    /// Enable verbose output; repeat for debug output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose output (-vv for debug)"
    )]
    pub verbose: u8,

    /// Enable quiet mode (failures only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Include file patterns (glob syntax)
    #[arg(long = "include", action = clap::ArgAction::Append)]
    pub include_patterns: Vec<String>,

    /// Exclude file patterns (glob syntax)
    #[arg(long = "exclude", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth to search
    #[arg(long = "max-depth")]
    pub max_depth: Option<usize>,

    /// Configuration file (TOML or JSON)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Report format [default: human]
    #[arg(long = "format", value_enum)]
    pub output_format: Option<OutputFormat>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Extensions given on the command line, if any
    pub fn get_extensions(&self) -> Option<Vec<String>> {
        self.extensions.as_ref().map(|extensions| {
            extensions
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.path.exists() {
            return Err(ConversionError::InvalidArgument(format!(
                "Path does not exist: {}",
                self.path.display()
            )));
        }
        if let Some(threads) = self.threads
            && threads == 0
        {
            return Err(ConversionError::InvalidArgument(
                "Number of threads must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose >= 2 {
            VerbosityLevel::Debug
        } else if self.verbose == 1 {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}
