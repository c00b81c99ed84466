use std::process::ExitCode;
use std::sync::Arc;

use recordtype_md::{
    Cli, Config, ConfigManager, ConversionConfig, ConversionEngine, ConversionPhase,
    ConversionProgress, ErrorReporter, FileDiscovery, Output, ProgressCallback, Result,
    VerbosityLevel,
};

const EXIT_FAILURES: u8 = 1;
const EXIT_FATAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let verbosity = cli.verbosity();
    let reporter = ErrorReporter::with_options(verbosity, verbosity == VerbosityLevel::Debug);

    if let Err(e) = cli.validate() {
        reporter.report_conversion_error(&e);
        return ExitCode::from(EXIT_FATAL);
    }

    let config = match ConfigManager::load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            reporter.report_config_error(&e);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    match run(&cli, config, verbosity).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILURES),
        Err(e) => {
            reporter.report_conversion_error(&e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Convert everything under the input path; `Ok(false)` when any file failed
async fn run(cli: &Cli, config: Config, cli_verbosity: VerbosityLevel) -> Result<bool> {
    // -vv survives the config merge, which only knows verbose and quiet
    let verbosity = if cli_verbosity == VerbosityLevel::Debug {
        VerbosityLevel::Debug
    } else {
        config.verbosity()
    };
    let file_discovery = FileDiscovery::from_config(&config.files)?;
    let engine = ConversionEngine::new(ConversionConfig::from_config(&config));

    let progress_reporter = Arc::new(ErrorReporter::new(verbosity));
    let progress: ProgressCallback = Arc::new(move |progress: ConversionProgress| {
        if progress.phase == ConversionPhase::Conversion {
            progress_reporter.report_progress(
                progress.completed,
                progress.total,
                progress.current_file.as_ref(),
            );
        }
    });

    let results = engine
        .convert_path_with_progress(&cli.path, &file_discovery, Some(progress))
        .await?;

    let output = Output::new(verbosity).with_format(config.output.format);
    print!("{}", output.format_results(&results));

    Ok(results.all_converted())
}
