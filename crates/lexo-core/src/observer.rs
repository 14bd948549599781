use std::path::Path;
use std::time::Duration;

use lexo_enricher::EnrichError;

use crate::classify::Action;
use crate::stats::RunStats;

/// Something the orchestrator reports while it runs
#[derive(Debug)]
pub enum PipelineEvent<'a> {
    RunStarted {
        total: usize,
        stored: usize,
    },
    WordClassified {
        index: usize,
        total: usize,
        word: &'a str,
        action: Action,
    },
    RetryScheduled {
        word: &'a str,
        attempt: u32,
        delay: Duration,
        error: &'a EnrichError,
    },
    WordSucceeded {
        word: &'a str,
        action: Action,
    },
    WordFailed {
        word: &'a str,
        kind: &'static str,
        reason: &'a str,
    },
    DatasetSaved {
        path: &'a Path,
        total_words: usize,
    },
    RunFinished {
        stats: &'a RunStats,
    },
    RunInterrupted {
        stats: &'a RunStats,
        in_flight: Option<&'a str>,
    },
}

/// Receives pipeline events, e.g. for logging or progress display
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent<'_>);
}

/// Turns events into `tracing` records
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent<'_>) {
        match event {
            PipelineEvent::RunStarted { total, stored } => {
                tracing::info!(total, stored, "Starting enrichment run");
            }
            PipelineEvent::WordClassified {
                index,
                total,
                word,
                action,
            } => match action {
                Action::Skip => {
                    tracing::info!("[{index}/{total}] Skipping '{word}' - already complete")
                }
                Action::Process => tracing::info!("[{index}/{total}] Processing new word: '{word}'"),
                Action::Reprocess => {
                    tracing::info!("[{index}/{total}] Reprocessing '{word}' - missing/incomplete data")
                }
            },
            PipelineEvent::RetryScheduled {
                word,
                attempt,
                delay,
                error,
            } => {
                tracing::warn!(
                    word,
                    attempt,
                    kind = error.kind(),
                    "{error}. Waiting {:.1} seconds before retry {}",
                    delay.as_secs_f64(),
                    attempt + 1
                );
            }
            PipelineEvent::WordSucceeded { word, action } => {
                tracing::info!(word, action = action.as_str(), "Successfully enriched '{word}'");
            }
            PipelineEvent::WordFailed { word, kind, reason } => {
                tracing::error!(word, kind, "Recording '{word}' as failed: {reason}");
            }
            PipelineEvent::DatasetSaved { path, total_words } => {
                tracing::debug!(path = %path.display(), total_words, "Data saved");
            }
            PipelineEvent::RunFinished { stats } => {
                tracing::info!(
                    new = stats.new,
                    reprocessed = stats.reprocessed,
                    skipped = stats.skipped,
                    failed = stats.failed,
                    "Processing complete"
                );
            }
            PipelineEvent::RunInterrupted { stats, in_flight } => {
                tracing::warn!(
                    new = stats.new,
                    reprocessed = stats.reprocessed,
                    skipped = stats.skipped,
                    failed = stats.failed,
                    in_flight = in_flight.unwrap_or("-"),
                    "Run interrupted, progress so far is saved"
                );
            }
        }
    }
}
