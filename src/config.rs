use crate::cli::{Cli, Naming, OutputFormat, VerbosityLevel};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder replaced by the record type name in title templates
pub const TITLE_NAME_PLACEHOLDER: &str = "{name}";

/// Title template used when none is configured
pub const DEFAULT_TITLE_TEMPLATE: &str = "{name} Record Type Context Reference";

/// File names searched in the working directory, then in the user config directory
const CONFIG_FILE_NAMES: [&str; 4] = [
    "recordtype-md.toml",
    "recordtype-md.json",
    ".recordtype-md.toml",
    ".recordtype-md.json",
];

/// Expand a title template for one record type
pub fn expand_title(template: &str, record_type_name: &str) -> String {
    template.replace(TITLE_NAME_PLACEHOLDER, record_type_name)
}

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings for a conversion run, assembled from file, environment, and flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub conversion: ConversionSettings,
    pub output: OutputConfig,
    pub files: FileConfig,
}

/// What goes into each document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ConversionSettings {
    /// Number of concurrent conversions
    pub threads: Option<usize>,
    /// Title template; `{name}` is replaced by the record type name
    pub title: Option<String>,
}

/// Where documents go and how the run is reported
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file or directory
    pub directory: Option<PathBuf>,
    pub naming: Naming,
    pub format: OutputFormat,
    pub verbose: bool,
    /// Failures only
    pub quiet: bool,
}

/// Which exports a directory run picks up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// Extensions without the dot, matched case-insensitively
    pub extensions: Vec<String>,
    /// Include patterns (glob syntax)
    pub include_patterns: Vec<String>,
    /// Exclude patterns (glob syntax)
    pub exclude_patterns: Vec<String>,
    /// Maximum directory depth; `Some(0)` keeps a run to the top level
    pub max_depth: Option<usize>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            include_patterns: vec![],
            exclude_patterns: vec![],
            max_depth: Some(0),
        }
    }
}

impl Config {
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.output.quiet {
            VerbosityLevel::Quiet
        } else if self.output.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Title template in effect; a blank title means the default
    pub fn title_template(&self) -> &str {
        self.conversion
            .title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(DEFAULT_TITLE_TEMPLATE)
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let file_config = match &cli.config {
            Some(config_path) => Some(Self::load_from_file(config_path).await?),
            None => Self::find_config_file().await?,
        };

        let mut config = file_config.unwrap_or_default();
        config = Self::apply_environment_overrides(config)?;
        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => match toml::from_str::<Config>(&content) {
                Ok(config) => Ok(config),
                Err(_) => Ok(serde_json::from_str(&content)?),
            },
        }
    }

    /// First configuration file found in the working directory or the user config directory
    pub async fn find_config_file() -> Result<Option<Config>> {
        let search_dirs = std::iter::once(PathBuf::new())
            .chain(dirs::config_dir().map(|dir| dir.join("recordtype-md")));

        for dir in search_dirs {
            for name in CONFIG_FILE_NAMES {
                let path = dir.join(name);
                if path.is_file() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply `RECORDTYPE_MD_*` overrides read through `env`
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(threads) = env.get("RECORDTYPE_MD_THREADS") {
            config.conversion.threads = Some(parse_env("RECORDTYPE_MD_THREADS", &threads)?);
        }
        if let Some(title) = env.get("RECORDTYPE_MD_TITLE") {
            config.conversion.title = Some(title);
        }
        if let Some(output_dir) = env.get("RECORDTYPE_MD_OUTPUT_DIR") {
            config.output.directory = Some(PathBuf::from(output_dir));
        }
        if let Some(naming) = env.get("RECORDTYPE_MD_NAMING") {
            config.output.naming = parse_env_choice("RECORDTYPE_MD_NAMING", &naming)?;
        }
        if let Some(format) = env.get("RECORDTYPE_MD_FORMAT") {
            config.output.format = parse_env_choice("RECORDTYPE_MD_FORMAT", &format)?;
        }
        if let Some(verbose) = env.get("RECORDTYPE_MD_VERBOSE") {
            config.output.verbose = parse_env("RECORDTYPE_MD_VERBOSE", &verbose)?;
        }
        if let Some(quiet) = env.get("RECORDTYPE_MD_QUIET") {
            config.output.quiet = parse_env("RECORDTYPE_MD_QUIET", &quiet)?;
        }
        if let Some(extensions) = env.get("RECORDTYPE_MD_EXTENSIONS") {
            config.files.extensions = split_list(&extensions);
        }

        Ok(config)
    }

    /// Overlay the flags that were actually given on the command line
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if cli.threads.is_some() {
            config.conversion.threads = cli.threads;
        }
        if let Some(title) = &cli.title {
            config.conversion.title = Some(title.clone());
        }
        if let Some(output) = &cli.output {
            config.output.directory = Some(output.clone());
        }
        if let Some(naming) = cli.naming {
            config.output.naming = naming;
        }
        if let Some(format) = cli.output_format {
            config.output.format = format;
        }
        // The flags conflict on the command line, so one replaces the other here
        if cli.verbose > 0 {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
        }
        if let Some(extensions) = cli.get_extensions() {
            config.files.extensions = extensions;
        }
        if !cli.include_patterns.is_empty() {
            config.files.include_patterns = cli.include_patterns.clone();
        }
        if !cli.exclude_patterns.is_empty() {
            config.files.exclude_patterns = cli.exclude_patterns.clone();
        }
        if cli.max_depth.is_some() {
            config.files.max_depth = cli.max_depth;
        }

        config
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        match config.conversion.threads {
            Some(0) => {
                return Err(ConfigError::Validation(
                    "Number of threads must be greater than 0".to_string(),
                ));
            }
            Some(threads) if threads > 1000 => {
                return Err(ConfigError::Validation(
                    "Number of threads cannot exceed 1000".to_string(),
                ));
            }
            _ => {}
        }

        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        if config.files.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "At least one file extension must be specified".to_string(),
            ));
        }
        if let Some(ext) = config
            .files
            .extensions
            .iter()
            .find(|ext| ext.contains(['/', '\\', '.']))
        {
            return Err(ConfigError::Validation(format!(
                "Invalid file extension: {}",
                ext
            )));
        }

        Ok(())
    }

    /// Get the effective thread count
    pub fn get_thread_count(config: &Config) -> usize {
        config.conversion.threads.unwrap_or_else(num_cpus::get)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, value)))
}

fn parse_env_choice<T: ValueEnum>(key: &str, value: &str) -> Result<T> {
    T::from_str(value.trim(), true)
        .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, value)))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
