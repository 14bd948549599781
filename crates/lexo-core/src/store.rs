use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use lexo_types::{Dataset, Metadata};
use tempfile::NamedTempFile;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Corrupt dataset file {path}: {source}")]
    CorruptState {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize dataset: {0}")]
    Serialize(serde_json::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
    },
}

/// JSON file holding the dataset. Every save replaces the file in one rename.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored dataset, or start an empty one when no file exists.
    /// A file that exists but does not match the schema is `CorruptState`.
    pub fn load(&self, source: &str, word_list_file: &str) -> Result<Dataset, StoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "No existing dataset, starting empty");
            return Ok(Dataset::new(Metadata::new(source, word_list_file)));
        }

        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let mut dataset: Dataset =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                StoreError::CorruptState {
                    path: self.path.clone(),
                    source,
                }
            })?;

        if dataset.metadata.word_list_file.is_empty() {
            dataset.metadata.word_list_file = word_list_file.to_string();
        }

        tracing::info!(
            path = %self.path.display(),
            words = dataset.words.len(),
            "Loaded existing dataset"
        );
        Ok(dataset)
    }

    /// Refresh `lastUpdated` and the derived metadata, then write through a
    /// temporary file in the same directory and rename it over the target.
    pub fn save(&self, dataset: &mut Dataset) -> Result<(), StoreError> {
        dataset.refresh_metadata();
        dataset.metadata.last_updated = Utc::now();

        let parent_dir = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir).map_err(|source| self.io_error(source))?;

        let temp_file = NamedTempFile::new_in(parent_dir).map_err(|source| self.io_error(source))?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer_pretty(&mut writer, dataset).map_err(StoreError::Serialize)?;
            writer.write_all(b"\n").map_err(|source| self.io_error(source))?;
            writer.flush().map_err(|source| self.io_error(source))?;
        }
        temp_file
            .as_file()
            .sync_all()
            .map_err(|source| self.io_error(source))?;

        temp_file.persist(&self.path).map_err(|source| StoreError::Persist {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            total_words = dataset.metadata.total_words,
            "Dataset saved"
        );
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use lexo_types::{DEFAULT_SOURCE, WordEntry};

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> DatasetStore {
        DatasetStore::new(dir.path().join("words.json"))
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = store_in(&dir).load(DEFAULT_SOURCE, "word_list_main.txt").unwrap();

        assert!(dataset.words.is_empty());
        assert_eq!(dataset.metadata.total_words, 0);
        assert_eq!(dataset.metadata.source, DEFAULT_SOURCE);
        assert_eq!(dataset.metadata.word_list_file, "word_list_main.txt");
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut dataset = store.load(DEFAULT_SOURCE, "list.txt").unwrap();
        let created = dataset.metadata.created_date;

        let mut entry = WordEntry::success("abase");
        entry.definition = Some("to lower in rank".into());
        dataset.upsert("abase", entry);
        dataset.upsert("zeal", WordEntry::failed("zeal", "API returned empty response"));
        store.save(&mut dataset).unwrap();

        let loaded = store.load(DEFAULT_SOURCE, "other.txt").unwrap();
        assert_eq!(loaded, dataset);
        assert_eq!(loaded.metadata.total_words, 2);
        assert_eq!(loaded.metadata.created_date, created);
        assert!(loaded.metadata.last_updated > created);
        assert_eq!(loaded.metadata.word_list_file, "list.txt");
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut dataset = store.load(DEFAULT_SOURCE, "list.txt").unwrap();

        store.save(&mut dataset).unwrap();
        store.save(&mut dataset).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("words.json")]);
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("nested/out/words.json"));
        let mut dataset = store.load(DEFAULT_SOURCE, "list.txt").unwrap();

        store.save(&mut dataset).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupt_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for content in ["not json at all", "", r#"{"metadata": {}}"#, r#"{"words": []}"#, r#"{"words": {"abase": 3}}"#] {
            fs::write(store.path(), content).unwrap();
            let result = store.load(DEFAULT_SOURCE, "list.txt");
            assert!(
                matches!(result, Err(StoreError::CorruptState { .. })),
                "content {content:?} should be corrupt"
            );
        }
    }

    #[test]
    fn test_legacy_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{
  "metadata": {
    "total_words": 2,
    "created_date": "2025-06-01T09:00:00.000001",
    "last_updated": "2025-06-02T09:00:00.000001",
    "source": "Perplexity AI via lexophile word processor",
    "word_list_file": "word_list_main.txt",
    "longest_definition": "abase",
    "longest_example_sentence": null
  },
  "words": {
    "abase": {
      "word": "abase",
      "definition": "to lower in rank",
      "part_of_speech": "verb",
      "synonyms": [],
      "antonyms": [],
      "phonetic_spelling": "uh-beys",
      "first_known_usage": null,
      "example_sentence": null,
      "processing_status": "success",
      "error_reason": null,
      "processed_date": "2025-06-01T09:00:01.5"
    },
    "quixotic": {
      "word": "quixotic",
      "definition": "exceedingly idealistic",
      "part_of_speech": "adjective",
      "synonyms": null,
      "antonyms": null,
      "processing_status": "success",
      "processed_date": "2025-06-01T09:00:02.25"
    }
  }
}"#,
        )
        .unwrap();

        let dataset = store.load(DEFAULT_SOURCE, "word_list_main.txt").unwrap();
        assert_eq!(dataset.metadata.total_words, 2);
        assert_eq!(dataset.metadata.longest_definition.as_deref(), Some("abase"));
        assert!(dataset.get("abase").unwrap().is_success());

        let quixotic = dataset.get("quixotic").unwrap();
        assert!(quixotic.is_success());
        assert!(quixotic.synonyms.is_empty());
        assert!(quixotic.antonyms.is_empty());
    }
}
