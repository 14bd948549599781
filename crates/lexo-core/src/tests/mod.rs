use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lexo_config::pipeline::PipelineConfig;
use lexo_enricher::{BackoffPolicy, EnrichError, Enricher, ProviderMetadata, RetryingFetcher};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::observer::{PipelineEvent, PipelineObserver};
use crate::pipeline::Pipeline;


/// Well-formed model reply for `word`
pub fn reply_for(word: &str) -> String {
    format!(
        r#"{{"word": "{word}", "definition": "meaning of {word}", "part_of_speech": "noun", "synonyms": ["a"], "antonyms": [], "phonetic_spelling": "{word}-ish", "first_known_usage": null, "example_sentence": "They used {word} in a sentence."}}"#
    )
}

/// Enricher that answers from a per-word script, defaulting to a good reply
#[derive(Default)]
pub struct ScriptedEnricher {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, EnrichError>>>>,
    always: HashMap<String, EnrichError>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue replies for `word`; once used up the default reply is returned
    pub fn script(self, word: &str, replies: Vec<Result<String, EnrichError>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(word.to_string(), replies.into());
        self
    }

    /// `word` fails with `error` on every call
    pub fn always_fail(mut self, word: &str, error: EnrichError) -> Self {
        self.always.insert(word.to_string(), error);
        self
    }

    pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Enricher for ScriptedEnricher {
    async fn enrich(&self, word: &str) -> Result<String, EnrichError> {
        self.calls.lock().unwrap().push(word.to_string());

        if let Some(error) = self.always.get(word) {
            return Err(error.clone());
        }

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(word)
            .and_then(|queue| queue.pop_front());
        scripted.unwrap_or_else(|| Ok(reply_for(word)))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "scripted".to_string(),
            model: "test".to_string(),
        }
    }
}

/// Records every event as a short string
#[derive(Default, Clone)]
pub struct RecordingObserver {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent<'_>) {
        let line = match event {
            PipelineEvent::RunStarted { total, .. } => format!("started:{total}"),
            PipelineEvent::WordClassified { word, action, .. } => {
                format!("classified:{word}:{}", action.as_str())
            }
            PipelineEvent::RetryScheduled { word, attempt, .. } => format!("retry:{word}:{attempt}"),
            PipelineEvent::WordSucceeded { word, .. } => format!("ok:{word}"),
            PipelineEvent::WordFailed { word, kind, .. } => format!("failed:{word}:{kind}"),
            PipelineEvent::DatasetSaved { total_words, .. } => format!("saved:{total_words}"),
            PipelineEvent::RunFinished { .. } => "finished".to_string(),
            PipelineEvent::RunInterrupted { .. } => "interrupted".to_string(),
        };
        self.events.lock().unwrap().push(line);
    }
}

pub fn config_for(output: &Path) -> PipelineConfig {
    PipelineConfig {
        word_list: "word_list_main.txt".into(),
        output: output.to_path_buf(),
        request_delay_ms: 0,
        ..PipelineConfig::default()
    }
}

pub fn fast_fetcher(enricher: ScriptedEnricher) -> RetryingFetcher<ScriptedEnricher> {
    let policy = BackoffPolicy::new(
        Duration::from_millis(1),
        Duration::from_millis(4),
        (1.10, 1.30),
        Duration::from_millis(50),
    );
    RetryingFetcher::with_rng(enricher, policy, StdRng::seed_from_u64(11))
}

pub fn open_pipeline(output: &Path, enricher: ScriptedEnricher) -> Pipeline<ScriptedEnricher> {
    Pipeline::open(&config_for(output), fast_fetcher(enricher)).unwrap()
}

pub fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}
