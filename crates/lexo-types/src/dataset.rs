use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::WordEntry;

pub const DEFAULT_SOURCE: &str = "Perplexity AI via lexophile word processor";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// Run metadata stored alongside the entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, alias = "total_words")]
    pub total_words: usize,
    /// Set once when the dataset is first created
    #[serde(default = "Utc::now", alias = "created_date", with = "crate::timestamp")]
    pub created_date: DateTime<Utc>,
    #[serde(default = "Utc::now", alias = "last_updated", with = "crate::timestamp")]
    pub last_updated: DateTime<Utc>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default, alias = "word_list_file")]
    pub word_list_file: String,
    #[serde(default, alias = "longest_definition")]
    pub longest_definition: Option<String>,
    #[serde(default, alias = "longest_example_sentence")]
    pub longest_example_sentence: Option<String>,
}

impl Metadata {
    pub fn new(source: impl Into<String>, word_list_file: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            total_words: 0,
            created_date: now,
            last_updated: now,
            source: source.into(),
            word_list_file: word_list_file.into(),
            longest_definition: None,
            longest_example_sentence: None,
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE, String::new())
    }
}

/// The full collection of entries plus metadata, as persisted on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub metadata: Metadata,
    pub words: WordTable,
}

impl Dataset {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            words: WordTable::new(),
        }
    }

    pub fn get(&self, word: &str) -> Option<&WordEntry> {
        self.words.get(word)
    }

    /// Insert or replace the entry stored under `word`
    pub fn upsert(&mut self, word: &str, entry: WordEntry) {
        self.words.insert(word.to_string(), entry);
    }

    /// Recompute the derived metadata fields from the current entries
    pub fn refresh_metadata(&mut self) {
        self.metadata.total_words = self.words.len();
        self.metadata.longest_definition =
            self.longest_success_field(|entry| entry.definition.as_deref());
        self.metadata.longest_example_sentence =
            self.longest_success_field(|entry| entry.example_sentence.as_deref());
    }

    /// Key of the success entry whose selected field is longest.
    /// Ties go to the entry stored first.
    fn longest_success_field<F>(&self, field: F) -> Option<String>
    where
        F: Fn(&WordEntry) -> Option<&str>,
    {
        let mut best: Option<(&str, usize)> = None;

        for (word, entry) in self.words.iter() {
            if !entry.is_success() {
                continue;
            }
            let Some(len) = field(entry).map(|text| text.chars().count()) else {
                continue;
            };
            if len > 0 && best.is_none_or(|(_, best_len)| len > best_len) {
                best = Some((word, len));
            }
        }

        best.map(|(word, _)| word.to_string())
    }
}

/// Word → entry map that keeps first-insertion order for readable output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordTable {
    order: Vec<String>,
    entries: HashMap<String, WordEntry>,
}

impl WordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&WordEntry> {
        self.entries.get(word)
    }

    /// Replacing an existing key keeps its original position
    pub fn insert(&mut self, word: String, entry: WordEntry) -> Option<WordEntry> {
        if !self.entries.contains_key(&word) {
            self.order.push(word.clone());
        }
        self.entries.insert(word, entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WordEntry)> {
        self.order
            .iter()
            .filter_map(|word| self.entries.get(word).map(|entry| (word.as_str(), entry)))
    }
}

impl Serialize for WordTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (word, entry) in self.iter() {
            map.serialize_entry(word, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WordTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = WordTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping words to entries")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = WordTable::new();
                while let Some((word, entry)) = access.next_entry::<String, WordEntry>()? {
                    table.insert(word, entry);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
