use crate::cli::VerbosityLevel;
use crate::config::ConfigError;
use crate::error::ConversionError;
use std::path::PathBuf;

/// Error reporter with configurable verbosity
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    show_timestamps: bool,
}

impl ErrorReporter {
    /// Create a new error reporter with specified verbosity
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: false,
        }
    }

    /// Create a new error reporter with timestamps
    pub fn with_options(verbosity: VerbosityLevel, show_timestamps: bool) -> Self {
        Self {
            verbosity,
            show_timestamps,
        }
    }

    /// Report a conversion error with appropriate verbosity
    pub fn report_conversion_error(&self, error: &ConversionError) {
        eprintln!("{}", self.format_conversion_error(error));
    }

    pub fn format_conversion_error(&self, error: &ConversionError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => self.format_error_brief(error),
            VerbosityLevel::Normal => self.format_error_normal(error),
            VerbosityLevel::Verbose => self.format_error_verbose(error),
            VerbosityLevel::Debug => self.format_error_debug(error),
        }
    }

    /// Report a configuration error
    pub fn report_config_error(&self, error: &ConfigError) {
        eprintln!("{}", self.format_config_error(error));
    }

    pub fn format_config_error(&self, error: &ConfigError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("Config error: {}", error),
            VerbosityLevel::Normal | VerbosityLevel::Verbose => {
                format!(
                    "Configuration Error: {}\n{}",
                    error,
                    self.get_config_help(error)
                )
            }
            VerbosityLevel::Debug => {
                format!(
                    "Configuration Error: {}\nDebug: {:?}\n{}",
                    error,
                    error,
                    self.get_config_help(error)
                )
            }
        }
    }

    /// Report progress for long-running batches
    pub fn report_progress(&self, current: usize, total: usize, current_file: Option<&PathBuf>) {
        if self.verbosity < VerbosityLevel::Verbose || total == 0 {
            return;
        }

        let percentage = (current as f64 / total as f64 * 100.0) as u32;

        if let Some(file) = current_file {
            eprint!(
                "\rProgress: {}/{} ({}%) - Converted: {}",
                current,
                total,
                percentage,
                file.display()
            );
        } else {
            eprint!("\rProgress: {}/{} ({}%)", current, total, percentage);
        }

        if current == total {
            eprintln!();
        }
    }

    fn format_error_brief(&self, error: &ConversionError) -> String {
        match error {
            ConversionError::MalformedDocument { file, .. }
            | ConversionError::MissingEntityElement { file } => {
                format!("FAIL: {}", file.display())
            }
            _ => format!("ERROR: {}", error),
        }
    }

    fn format_error_normal(&self, error: &ConversionError) -> String {
        let timestamp = if self.show_timestamps {
            format!("[{}] ", chrono::Utc::now().format("%H:%M:%S"))
        } else {
            String::new()
        };

        format!("{}{}", timestamp, error)
    }

    fn format_error_verbose(&self, error: &ConversionError) -> String {
        let mut output = self.format_error_normal(error);

        match error {
            ConversionError::MalformedDocument { .. } => {
                output.push_str("\nSuggestion: Check that the file is a complete XML export");
            }
            ConversionError::MissingEntityElement { .. } => {
                output.push_str(
                    "\nSuggestion: Only recordTypeHaul exports contain a <recordType> element",
                );
            }
            ConversionError::OutputWrite { file, .. } => {
                output.push_str(&format!(
                    "\nSuggestion: Check that {} is writable",
                    file.display()
                ));
            }
            ConversionError::FileSystemTraversal { path, .. } => {
                output.push_str(&format!(
                    "\nSuggestion: Check permissions on {}",
                    path.display()
                ));
            }
            ConversionError::Config(_) => {
                output.push_str("\nSuggestion: Review the configuration file, environment, and flags");
            }
            ConversionError::InvalidArgument(_) => {
                output.push_str("\nSuggestion: Run with --help for usage");
            }
            _ => {}
        }

        output
    }

    fn format_error_debug(&self, error: &ConversionError) -> String {
        let mut output = self.format_error_verbose(error);
        output.push_str(&format!("\nDebug Info: {:?}", error));

        output.push_str("\nError Chain:");
        let mut current_error: &dyn std::error::Error = error;
        let mut level = 0;
        while let Some(source) = current_error.source() {
            output.push_str(&format!("\n  {}: {}", level + 1, source));
            current_error = source;
            level += 1;
        }

        output
    }

    fn get_config_help(&self, error: &ConfigError) -> String {
        match error {
            ConfigError::Io(_) => "Check that the configuration file exists and is readable".to_string(),
            ConfigError::TomlParsing(_) | ConfigError::JsonParsing(_) => {
                "Check the configuration file syntax (TOML/JSON format expected)".to_string()
            }
            ConfigError::UnsupportedFormat(_) => {
                "Use a configuration file ending in .toml or .json".to_string()
            }
            ConfigError::Environment(_) => {
                "Check the RECORDTYPE_MD_* environment variables".to_string()
            }
            ConfigError::Validation(_) => {
                "Fix the conflicting or out-of-range configuration value".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_brief_format_for_document_errors() {
        let reporter = ErrorReporter::new(VerbosityLevel::Quiet);
        let error = ConversionError::MissingEntityElement {
            file: PathBuf::from("haul.xml"),
        };
        assert_eq!(reporter.format_conversion_error(&error), "FAIL: haul.xml");

        let config = ConversionError::Config("bad glob".to_string());
        assert_eq!(
            reporter.format_conversion_error(&config),
            "ERROR: Configuration error: bad glob"
        );
    }

    #[test]
    fn test_verbose_format_adds_suggestion() {
        let reporter = ErrorReporter::new(VerbosityLevel::Verbose);
        let error = ConversionError::OutputWrite {
            file: PathBuf::from("docs/a.md"),
            details: "Permission denied".to_string(),
        };
        let formatted = reporter.format_conversion_error(&error);

        assert!(formatted.starts_with("Failed to write output: docs/a.md - Permission denied"));
        assert!(formatted.contains("Suggestion: Check that docs/a.md is writable"));
    }

    #[test]
    fn test_invalid_argument_formats() {
        let error = ConversionError::InvalidArgument("Path does not exist: exports".to_string());

        let normal = ErrorReporter::new(VerbosityLevel::Normal).format_conversion_error(&error);
        assert_eq!(normal, "Invalid argument: Path does not exist: exports");

        let verbose = ErrorReporter::new(VerbosityLevel::Verbose).format_conversion_error(&error);
        assert!(verbose.ends_with("\nSuggestion: Run with --help for usage"));
    }

    #[test]
    fn test_debug_format_includes_error_chain() {
        let reporter = ErrorReporter::new(VerbosityLevel::Debug);
        let error = ConversionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let formatted = reporter.format_conversion_error(&error);

        assert!(formatted.contains("Debug Info:"));
        assert!(formatted.contains("Error Chain:\n  1: missing"));
    }

    #[test]
    fn test_timestamps() {
        let reporter = ErrorReporter::with_options(VerbosityLevel::Normal, true);
        let error = ConversionError::Config("x".to_string());
        let formatted = reporter.format_conversion_error(&error);

        assert!(formatted.starts_with('['));
        assert!(formatted.contains("] Configuration error: x"));
    }

    #[test]
    fn test_config_error_help() {
        let reporter = ErrorReporter::new(VerbosityLevel::Normal);
        let error = ConfigError::UnsupportedFormat("yaml".to_string());
        let formatted = reporter.format_config_error(&error);

        assert!(formatted.contains("Unsupported configuration file format: yaml"));
        assert!(formatted.contains(".toml or .json"));
    }
}
