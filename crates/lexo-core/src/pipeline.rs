//! Pipeline orchestrator.
//!
//! Words are handled strictly one at a time. Each word is either skipped or
//! goes through exactly one fetch, parse and save cycle, so a crash or an
//! interrupt loses at most the word that was in flight.

use std::time::Duration;

use lexo_config::pipeline::PipelineConfig;
use lexo_enricher::{Enricher, FetchError, RetryingFetcher};
use lexo_types::{Dataset, WordEntry};
use tokio_util::sync::CancellationToken;

use crate::classify::{Action, classify};
use crate::error::PipelineError;
use crate::observer::{PipelineEvent, PipelineObserver, TracingObserver};
use crate::parser::parse;
use crate::stats::RunStats;
use crate::store::DatasetStore;

/// Raw replies longer than this are logged as head and tail only
const PREVIEW_THRESHOLD: usize = 400;
const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: RunStats,
    pub interrupted: bool,
    /// Input words whose stored entry is `failed` when the run ends
    pub failed_words: Vec<String>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        !self.failed_words.is_empty()
    }
}

pub struct Pipeline<E> {
    store: DatasetStore,
    dataset: Dataset,
    fetcher: RetryingFetcher<E>,
    observer: Box<dyn PipelineObserver>,
    request_delay: Duration,
}

impl<E: Enricher> Pipeline<E> {
    /// Load the stored dataset (or start an empty one) and get ready to run.
    /// Fails with `CorruptState` rather than discarding an unreadable file.
    pub fn open(
        config: &PipelineConfig,
        fetcher: RetryingFetcher<E>,
    ) -> Result<Self, PipelineError> {
        let store = DatasetStore::new(&config.output);
        let dataset = store.load(&config.source, &config.word_list_file_name())?;

        Ok(Self {
            store,
            dataset,
            fetcher,
            observer: Box::new(TracingObserver),
            request_delay: Duration::from_millis(config.request_delay_ms),
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Visit every word in order. Stops early only when `cancel` fires or
    /// the dataset can no longer be saved.
    pub async fn run(
        &mut self,
        words: &[String],
        cancel: &CancellationToken,
    ) -> Result<RunReport, PipelineError> {
        let total = words.len();
        let mut stats = RunStats::default();
        let mut interrupted_at: Option<Option<&str>> = None;

        self.observer.on_event(&PipelineEvent::RunStarted {
            total,
            stored: self.dataset.words.len(),
        });

        for (i, word) in words.iter().enumerate() {
            if cancel.is_cancelled() {
                interrupted_at = Some(None);
                break;
            }

            let action = classify(self.dataset.get(word));
            self.observer.on_event(&PipelineEvent::WordClassified {
                index: i + 1,
                total,
                word,
                action,
            });

            if action == Action::Skip {
                stats.record_skip();
                continue;
            }

            let fetched = {
                let observer = &self.observer;
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    result = self.fetcher.fetch(word, |notice| {
                        observer.on_event(&PipelineEvent::RetryScheduled {
                            word: notice.word,
                            attempt: notice.attempt,
                            delay: notice.delay,
                            error: notice.error,
                        });
                    }) => Some(result),
                }
            };
            let Some(fetched) = fetched else {
                interrupted_at = Some(Some(word.as_str()));
                break;
            };

            let api_responded = fetched.is_ok();
            self.record_outcome(word, action, fetched, &mut stats);

            self.store.save(&mut self.dataset)?;
            self.observer.on_event(&PipelineEvent::DatasetSaved {
                path: self.store.path(),
                total_words: self.dataset.metadata.total_words,
            });

            let more_to_do = i + 1 < total;
            if api_responded && more_to_do && !self.request_delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        interrupted_at = Some(None);
                        break;
                    }
                    _ = tokio::time::sleep(self.request_delay) => {}
                }
            }
        }

        match interrupted_at {
            Some(in_flight) => self
                .observer
                .on_event(&PipelineEvent::RunInterrupted {
                    stats: &stats,
                    in_flight,
                }),
            None => self.observer.on_event(&PipelineEvent::RunFinished { stats: &stats }),
        }

        let failed_words = words
            .iter()
            .filter(|word| self.dataset.get(word).is_some_and(|entry| !entry.is_success()))
            .cloned()
            .collect();

        Ok(RunReport {
            stats,
            interrupted: interrupted_at.is_some(),
            failed_words,
        })
    }

    /// Store the success or failure entry for `word`. Never leaves it absent.
    fn record_outcome(
        &mut self,
        word: &str,
        action: Action,
        fetched: Result<String, FetchError>,
        stats: &mut RunStats,
    ) {
        let outcome = match fetched {
            Ok(raw) => {
                log_raw_response(word, &raw);
                parse(&raw).map_err(|e| (e.kind(), e.reason()))
            }
            Err(FetchError::Fatal(error)) => {
                Err(("fatal", format!("API request failed: {error}")))
            }
            Err(error @ FetchError::GaveUp { .. }) => {
                Err(("gave_up", format!("API request {error}")))
            }
        };

        match outcome {
            Ok(mut entry) => {
                if entry.word.as_deref() != Some(word) {
                    tracing::warn!(
                        word,
                        returned = entry.word.as_deref().unwrap_or_default(),
                        "Model answered for a different word, keeping the requested one"
                    );
                    entry.word = Some(word.to_string());
                }
                self.dataset.upsert(word, entry);
                stats.record_success(action);
                self.observer
                    .on_event(&PipelineEvent::WordSucceeded { word, action });
            }
            Err((kind, reason)) => {
                self.dataset.upsert(word, WordEntry::failed(word, reason.as_str()));
                stats.record_failure();
                self.observer.on_event(&PipelineEvent::WordFailed {
                    word,
                    kind,
                    reason: &reason,
                });
            }
        }
    }
}

fn log_raw_response(word: &str, raw: &str) {
    let len = raw.chars().count();
    tracing::debug!(word, len, "Raw response length");

    if len > PREVIEW_THRESHOLD {
        let head: String = raw.chars().take(PREVIEW_CHARS).collect();
        let tail: String = raw.chars().skip(len - PREVIEW_CHARS).collect();
        tracing::debug!(word, "Response preview: START[{head}] ... END[{tail}]");
    } else {
        tracing::debug!(word, "Full response: {raw}");
    }
}
