//! # recordtype-md Library
//!
//! Converts Appian `recordTypeHaul` XML exports into markdown record type
//! context references, one document per export, with concurrent batch
//! conversion of whole export directories.

pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod error_reporter;
pub mod extractor;
pub mod file_discovery;
pub mod model;
pub mod normalize;
pub mod output;
pub mod reference;
pub mod renderer;

pub use cli::{Cli, Naming, OutputFormat, VerbosityLevel};
pub use config::{Config, ConfigError, ConfigManager, expand_title};
pub use converter::{
    ConversionConfig, ConversionEngine, ConversionPhase, ConversionProgress, ConversionResults,
    ConversionStatus, FileConversionResult, ProgressCallback, convert_file,
};
pub use error::{ConversionError, Result};
pub use error_reporter::ErrorReporter;
pub use extractor::{extract_file, extract_str};
pub use file_discovery::FileDiscovery;
pub use model::{Action, Field, RecordType, Relationship};
pub use normalize::{normalize_relationship_kind, normalize_type, slug};
pub use output::Output;
pub use reference::{Category, ReferenceBuilder};
pub use renderer::render_markdown;
