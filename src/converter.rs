//! Batch Conversion Engine
//!
//! Fans out one task per export file on the tokio runtime:
//! - **Async orchestration**: file discovery and semaphore-bounded `tokio::spawn` tasks
//! - **Blocking work**: extraction, rendering, and the output write run in `spawn_blocking`
//! - **Per-file results**: every task yields a [`FileConversionResult`]; a failing
//!   export never aborts the batch
//!
//! Results are collected with `try_join_all`, so they keep discovery order.

use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::cli::Naming;
use crate::config::{Config, ConfigManager, DEFAULT_TITLE_TEMPLATE, expand_title};
use crate::error::{ConversionError, Result};
use crate::extractor::extract_file;
use crate::file_discovery::FileDiscovery;
use crate::model::RecordType;
use crate::normalize::slug;
use crate::renderer::render_markdown;

/// Prefix of entity-named output files
pub const ENTITY_FILE_PREFIX: &str = "data-model-context-";

/// Conversion configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Number of concurrent conversions
    pub max_concurrent_conversions: usize,
    /// Title template; `{name}` is replaced by the record type name
    pub title_template: String,
    /// Output file naming scheme
    pub naming: Naming,
    /// Output file (single input) or directory
    pub output: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_conversions: num_cpus::get(),
            title_template: DEFAULT_TITLE_TEMPLATE.to_string(),
            naming: Naming::Auto,
            output: None,
        }
    }
}

impl ConversionConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrent_conversions: ConfigManager::get_thread_count(config),
            title_template: config.title_template().to_string(),
            naming: config.output.naming,
            output: config.output.directory.clone(),
        }
    }

    /// Where the markdown for `input` goes.
    ///
    /// `single_input` is true when the user named the export file directly;
    /// only then may `output` name the markdown file itself.
    pub fn output_path(&self, input: &Path, record_type: &RecordType, single_input: bool) -> PathBuf {
        if single_input
            && let Some(output) = &self.output
            && is_markdown_path(output)
        {
            return output.clone();
        }

        let naming = match self.naming {
            Naming::Auto if single_input => Naming::Mirror,
            Naming::Auto => Naming::Entity,
            naming => naming,
        };

        let file_name = match naming {
            Naming::Entity | Naming::Auto => {
                PathBuf::from(format!("{}{}.md", ENTITY_FILE_PREFIX, slug(&record_type.name)))
            }
            Naming::Mirror => input
                .file_name()
                .map(|name| Path::new(name).with_extension("md"))
                .unwrap_or_else(|| PathBuf::from(format!("{}.md", slug(&record_type.name)))),
        };

        match &self.output {
            Some(directory) => directory.join(file_name),
            None => input
                .parent()
                .map(|parent| parent.join(&file_name))
                .unwrap_or(file_name),
        }
    }
}

fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Status of a single file conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionStatus {
    /// Markdown written to `output`
    Converted {
        output: PathBuf,
        fields: usize,
        relationships: usize,
        actions: usize,
    },
    /// Extraction or writing failed
    Failed { message: String },
}

impl ConversionStatus {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionStatus::Converted { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ConversionStatus::Failed { .. })
    }
}

/// Result of converting a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConversionResult {
    /// Export file
    pub input: PathBuf,
    /// Record type name, when extraction succeeded
    pub record_type: Option<String>,
    /// Conversion status
    pub status: ConversionStatus,
    /// Duration of the conversion
    pub duration: Duration,
}

impl FileConversionResult {
    pub fn converted(input: PathBuf, record_type: &RecordType, output: PathBuf, duration: Duration) -> Self {
        Self {
            input,
            record_type: Some(record_type.name.clone()),
            status: ConversionStatus::Converted {
                output,
                fields: record_type.fields.len(),
                relationships: record_type.relationships.len(),
                actions: record_type.actions.len(),
            },
            duration,
        }
    }

    pub fn failed(input: PathBuf, error: ConversionError, duration: Duration) -> Self {
        Self {
            input,
            record_type: None,
            status: ConversionStatus::Failed {
                message: error.to_string(),
            },
            duration,
        }
    }

    /// Output path of a converted file
    pub fn output(&self) -> Option<&Path> {
        match &self.status {
            ConversionStatus::Converted { output, .. } => Some(output),
            ConversionStatus::Failed { .. } => None,
        }
    }
}

/// Progress update for a conversion run
#[derive(Debug, Clone)]
pub struct ConversionProgress {
    /// File that just finished
    pub current_file: Option<PathBuf>,
    /// Number of files completed
    pub completed: usize,
    /// Total number of files to process
    pub total: usize,
    /// Current phase
    pub phase: ConversionPhase,
}

/// Phase of a conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPhase {
    Discovery,
    Conversion,
    Complete,
}

/// Progress callback type for conversion updates
pub type ProgressCallback = Arc<dyn Fn(ConversionProgress) + Send + Sync>;

/// Aggregated results of converting multiple files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResults {
    /// Total number of files processed
    pub total_files: usize,
    /// Number of files converted
    pub converted_files: usize,
    /// Number of files that failed
    pub failed_files: usize,
    /// Wall-clock duration of the run
    pub total_duration: Duration,
    /// Individual file results, in discovery order
    pub file_results: Vec<FileConversionResult>,
}

impl ConversionResults {
    /// Aggregate individual file results into a summary
    pub fn aggregate(file_results: Vec<FileConversionResult>, total_duration: Duration) -> Self {
        let converted_files = file_results
            .iter()
            .filter(|result| result.status.is_converted())
            .count();

        Self {
            total_files: file_results.len(),
            converted_files,
            failed_files: file_results.len() - converted_files,
            total_duration,
            file_results,
        }
    }

    /// Check if every discovered file converted
    pub fn all_converted(&self) -> bool {
        self.failed_files == 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed_files > 0
    }
}

/// Extract, render, and write one export
pub fn convert_file(
    input: &Path,
    config: &ConversionConfig,
    single_input: bool,
) -> Result<(RecordType, PathBuf)> {
    let record_type = extract_file(input)?;
    let title = expand_title(&config.title_template, &record_type.name);
    let markdown = render_markdown(&record_type, &title);

    let output = config.output_path(input, &record_type, single_input);
    write_output(&output, &markdown)?;

    Ok((record_type, output))
}

fn write_output(output: &Path, markdown: &str) -> Result<()> {
    let to_write_error = |e: std::io::Error| ConversionError::OutputWrite {
        file: output.to_path_buf(),
        details: e.to_string(),
    };

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(to_write_error)?;
    }
    std::fs::write(output, markdown).map_err(to_write_error)
}

/// Batch converter for record type exports
pub struct ConversionEngine {
    config: Arc<ConversionConfig>,
}

impl ConversionEngine {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Convert every export found at `path`
    pub async fn convert_path(
        &self,
        path: &Path,
        file_discovery: &FileDiscovery,
    ) -> Result<ConversionResults> {
        self.convert_path_with_progress(path, file_discovery, None)
            .await
    }

    /// Convert every export found at `path` (file or directory) with progress tracking
    pub async fn convert_path_with_progress(
        &self,
        path: &Path,
        file_discovery: &FileDiscovery,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<ConversionResults> {
        let start = Instant::now();

        if let Some(ref callback) = progress_callback {
            callback(ConversionProgress {
                current_file: None,
                completed: 0,
                total: 0,
                phase: ConversionPhase::Discovery,
            });
        }

        let single_input = tokio::fs::metadata(path).await?.is_file();
        let files = file_discovery.discover_files(path).await?;

        let file_results = self
            .convert_files_with_progress(files, single_input, progress_callback.clone())
            .await?;
        let results = ConversionResults::aggregate(file_results, start.elapsed());

        if let Some(ref callback) = progress_callback {
            callback(ConversionProgress {
                current_file: None,
                completed: results.total_files,
                total: results.total_files,
                phase: ConversionPhase::Complete,
            });
        }

        Ok(results)
    }

    /// Convert a list of files concurrently with progress tracking
    async fn convert_files_with_progress(
        &self,
        files: Vec<PathBuf>,
        single_input: bool,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<Vec<FileConversionResult>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let total_files = files.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(tokio::sync::Semaphore::new(
            self.config.max_concurrent_conversions.max(1),
        ));

        let conversion_tasks: Vec<_> = files
            .into_iter()
            .map(|input| {
                let config = Arc::clone(&self.config);
                let semaphore = Arc::clone(&semaphore);
                let progress_callback = progress_callback.clone();
                let completed = Arc::clone(&completed);

                tokio::spawn(async move {
                    let _permit = semaphore.acquire().await.map_err(|_| {
                        ConversionError::Concurrency {
                            details: "Failed to acquire conversion semaphore".to_string(),
                        }
                    })?;

                    let result =
                        Self::convert_single_file_internal(input.clone(), config, single_input)
                            .await;

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = progress_callback {
                        callback(ConversionProgress {
                            current_file: Some(input),
                            completed: done,
                            total: total_files,
                            phase: ConversionPhase::Conversion,
                        });
                    }

                    Ok::<FileConversionResult, ConversionError>(result)
                })
            })
            .collect();

        let task_results = try_join_all(conversion_tasks)
            .await
            .map_err(|e| ConversionError::Concurrency {
                details: format!("Task join error: {}", e),
            })?;

        task_results.into_iter().collect()
    }

    async fn convert_single_file_internal(
        input: PathBuf,
        config: Arc<ConversionConfig>,
        single_input: bool,
    ) -> FileConversionResult {
        let start_time = Instant::now();
        let task_input = input.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            convert_file(&task_input, &config, single_input)
        })
        .await;

        let duration = start_time.elapsed();
        match outcome {
            Ok(Ok((record_type, output))) => {
                FileConversionResult::converted(input, &record_type, output, duration)
            }
            Ok(Err(e)) => FileConversionResult::failed(input, e, duration),
            Err(e) => FileConversionResult::failed(
                input,
                ConversionError::Concurrency {
                    details: format!("Join error: {}", e),
                },
                duration,
            ),
        }
    }
}
