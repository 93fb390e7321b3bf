use clap::Parser;
use feature_extractor::{DisabledDecoder, IdentityDecoder, Pipeline};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod config;
mod identity;
mod logging;
mod metrics_defs;
mod run;

use config::{Config, ConfigError};
use identity::{IdentityError, UaParserDecoder};
use run::{RunError, Summary};

/// Turns auction requests into flat numeric feature maps.
#[derive(Parser)]
#[command(version)]
enum CliCommand {
    /// Extract one feature row per impression from line-delimited JSON
    Extract {
        /// YAML configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Input file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Load and validate a configuration file
    ValidateConfig {
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Metrics(#[from] shared::metrics::MetricsError),
    #[error("could not open input: {0}")]
    Input(#[from] io::Error),
    #[error(transparent)]
    Run(#[from] RunError),
}

fn main() -> ExitCode {
    let cli = CliCommand::parse();

    let result = match &cli {
        CliCommand::Extract { config, input } => {
            extract(config.as_deref(), input.as_deref()).map(|summary| {
                tracing::info!(
                    records = summary.records,
                    rows = summary.rows,
                    invalid_lines = summary.invalid_lines,
                    malformed_records = summary.malformed_records,
                    failed_impressions = summary.failed_impressions,
                    "Extraction finished"
                );
            })
        }
        CliCommand::ValidateConfig { config } => validate_config(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

fn validate_config(path: &Path) -> Result<(), CliError> {
    let config = load_config(Some(path))?;
    if let Some(identity) = &config.identity {
        UaParserDecoder::from_file(&identity.regexes_path)?;
    }
    println!("{}: ok", path.display());
    Ok(())
}

fn extract(config_path: Option<&Path>, input: Option<&Path>) -> Result<Summary, CliError> {
    let config = load_config(config_path)?;

    let _sentry_guard = logging::init(config.common.logging.as_ref());

    if let Some(metrics) = &config.common.metrics {
        shared::metrics::init_statsd(&metrics.statsd_host, metrics.statsd_port, &metrics.prefix)?;
    }
    shared::metrics_defs::describe_all(feature_extractor::metrics_defs::ALL_METRICS);
    shared::metrics_defs::describe_all(metrics_defs::ALL_METRICS);

    let decoder: Box<dyn IdentityDecoder> = match &config.identity {
        Some(identity) => Box::new(UaParserDecoder::from_file(&identity.regexes_path)?),
        None => {
            tracing::info!("No identity decoder configured, client signatures stay undecoded");
            Box::new(DisabledDecoder)
        }
    };
    let pipeline = Pipeline::new(&config.extractor, decoder);

    let writer = BufWriter::new(io::stdout().lock());
    let summary = match input {
        Some(path) => {
            let reader = BufReader::new(File::open(path)?);
            run::extract(&pipeline, config.input.format, reader, writer)?
        }
        None => run::extract(&pipeline, config.input.format, io::stdin().lock(), writer)?,
    };

    Ok(summary)
}
