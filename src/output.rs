//! Simple Output and Reporting
//!
//! This module provides output formatting for conversion results.

use atty;
use std::time::Duration;

use crate::cli::{OutputFormat, VerbosityLevel};
use crate::converter::{ConversionResults, ConversionStatus, FileConversionResult};

/// Output formatter for conversion results
pub struct Output {
    verbosity: VerbosityLevel,
    format: OutputFormat,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            format: OutputFormat::Human,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_colors(mut self, show_colors: bool) -> Self {
        self.show_colors = show_colors;
        self
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_results(&self, results: &ConversionResults) -> String {
        match self.format {
            OutputFormat::Json => self.format_json(results),
            OutputFormat::Summary => self.format_summary(results),
            OutputFormat::Human => self.format_human(results),
        }
    }

    fn format_human(&self, results: &ConversionResults) -> String {
        let mut output = String::new();

        for file_result in &results.file_results {
            if self.verbosity == VerbosityLevel::Quiet && !file_result.status.is_failed() {
                continue;
            }
            output.push_str(&self.format_file_result(file_result));
            output.push('\n');
        }

        if self.verbosity > VerbosityLevel::Quiet {
            output.push_str(&self.format_summary(results));
        }

        output
    }

    pub fn format_file_result(&self, result: &FileConversionResult) -> String {
        let mut line = match &result.status {
            ConversionStatus::Converted { output, .. } => format!(
                "{} {} -> {}",
                self.colorize("OK:", "32"),
                result.input.display(),
                output.display()
            ),
            ConversionStatus::Failed { message } => format!(
                "{} {}: {}",
                self.colorize("FAIL:", "31"),
                result.input.display(),
                message
            ),
        };

        if self.verbosity >= VerbosityLevel::Verbose {
            if let ConversionStatus::Converted {
                fields,
                relationships,
                actions,
                ..
            } = &result.status
            {
                line.push_str(&format!(
                    " [{} field{}, {} relationship{}, {} action{}]",
                    fields,
                    plural(*fields),
                    relationships,
                    plural(*relationships),
                    actions,
                    plural(*actions)
                ));
            }
            line.push_str(&format!(" ({})", format_duration(result.duration)));
        }

        line
    }

    fn format_summary(&self, results: &ConversionResults) -> String {
        // Counts successful conversions only
        let mut output = format!("Processed: {} file(s)\n", results.converted_files);

        if self.verbosity >= VerbosityLevel::Verbose || results.has_failures() {
            output.push_str(&format!("  Total files: {}\n", results.total_files));
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Failed:", "31"),
                results.failed_files
            ));
        }

        if self.verbosity >= VerbosityLevel::Verbose {
            output.push_str(&format!(
                "  Duration: {}\n",
                format_duration(results.total_duration)
            ));
        }

        output
    }

    fn format_json(&self, results: &ConversionResults) -> String {
        match serde_json::to_string_pretty(results) {
            Ok(json) => format!("{}\n", json),
            Err(e) => format!("{{\"error\": \"{}\"}}\n", e),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
