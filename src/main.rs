// src/main.rs

use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_digest::executor::cancel_on_ctrl_c;
use notion_digest::output::DeliveryTarget;
use notion_digest::{run_jobs, AppConfig, CommandLineInput, JobOutcome, NotionHttpClient};
use std::fs;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join(notion_digest::LOG_FILE_NAME);
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {M} - {m}{n}",
        )))
        .build(&log_file_path)
        .with_context(|| format!("cannot open log file {}", log_file_path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Prints one line per database and returns how many failed.
fn report_outcomes(config: &AppConfig, outcomes: &[JobOutcome]) -> usize {
    let mut failed = 0;

    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => {
                for completed in &report.completed {
                    match &completed.operation {
                        DeliveryTarget::SendMail { mail, .. } => {
                            println!("✓ {}: mailed to {}", outcome.name, mail.to.join(", "));
                        }
                        DeliveryTarget::WriteFile { path, .. } => {
                            println!("✓ {}: saved to {}", outcome.name, path.display());
                        }
                        DeliveryTarget::PrintToStdout { .. } => {}
                    }
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("✗ {}: {}", outcome.name, e);
            }
        }
    }

    // A panicked job leaves no outcome behind.
    failed + config.jobs.len().saturating_sub(outcomes.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).context("failed to initialize logging")?;

    let config_path = cli.config.clone();
    let config = AppConfig::load(cli)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    log::info!(
        "Loaded {} database(s) from {}",
        config.jobs.len(),
        config_path.display()
    );

    let client = Arc::new(NotionHttpClient::with_base_url(
        &config.api_key,
        &config.api_base_url,
    )?);

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let config = Arc::new(config);
    let outcomes = run_jobs(Arc::clone(&config), client, cancel).await;

    let failed = report_outcomes(&config, &outcomes);
    if failed > 0 {
        bail!("{} of {} digest(s) failed", failed, config.jobs.len());
    }
    Ok(())
}
