use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use lexo_config::Config;
use lexo_core::{Pipeline, RunReport, read_word_list};
use lexo_enricher::{BackoffPolicy, Enricher, PerplexityEnricher, RetryingFetcher};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

mod cli;
mod logging;

use self::cli::Args;

/// Run finished but some input words are stored as failed
const EXIT_FAILED_WORDS: u8 = 1;
/// Bad config, unreadable word list or dataset, save failure
const EXIT_RUN_ERROR: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = match args.build_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lexophile: {e:#}");
            return ExitCode::from(EXIT_RUN_ERROR);
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("lexophile: {e:#}");
        return ExitCode::from(EXIT_RUN_ERROR);
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                tracing::warn!("Shutdown requested, stopping after the current word");
                cancel.cancel();
            }
        }
    });

    let span = tracing::info_span!("run", run_id = %Uuid::new_v4());
    match run(config, cancel).instrument(span).await {
        Ok(report) => ExitCode::from(exit_status(&report)),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_RUN_ERROR)
        }
    }
}

async fn run(config: Config, cancel: CancellationToken) -> anyhow::Result<RunReport> {
    let words = read_word_list(&config.pipeline.word_list)?;

    let enricher = PerplexityEnricher::new(&config.api)?;
    let provider = enricher.metadata();
    tracing::info!(provider = %provider.name, model = %provider.model, "Using enrichment provider");
    if config.api.api_key.is_empty() {
        tracing::warn!("PERPLEXITY_API_KEY is not set, every new word will be recorded as failed");
    }

    let fetcher = RetryingFetcher::new(enricher, BackoffPolicy::from_config(&config.retry));
    let mut pipeline = Pipeline::open(&config.pipeline, fetcher).with_context(|| {
        format!(
            "Refusing to start: existing dataset {} could not be loaded",
            config.pipeline.output.display()
        )
    })?;

    let report = pipeline.run(&words, &cancel).await?;

    if report.has_failures() {
        tracing::warn!(
            count = report.failed_words.len(),
            words = ?report.failed_words,
            "Some words are stored as failed, rerun to retry them"
        );
    }

    Ok(report)
}

/// Interrupted wins over failed words
fn exit_status(report: &RunReport) -> u8 {
    if report.interrupted {
        EXIT_INTERRUPTED
    } else if report.has_failures() {
        EXIT_FAILED_WORDS
    } else {
        0
    }
}
