use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Success,
    /// Also assumed when a stored entry carries no status at all
    #[default]
    Failed,
}

/// One word's enrichment record, success or failure.
///
/// Optional string fields are written as `null`, never as an empty string.
/// Keys written by older snake_case files are accepted on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default, alias = "part_of_speech")]
    pub part_of_speech: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub antonyms: Vec<String>,
    #[serde(default, alias = "phonetic_spelling")]
    pub phonetic_spelling: Option<String>,
    #[serde(default, alias = "first_known_usage")]
    pub first_known_usage: Option<String>,
    #[serde(default, alias = "example_sentence")]
    pub example_sentence: Option<String>,
    #[serde(default, alias = "processing_status")]
    pub processing_status: ProcessingStatus,
    #[serde(
        default,
        alias = "error_reason",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_reason: Option<String>,
    #[serde(
        default = "Utc::now",
        alias = "processed_date",
        with = "crate::timestamp"
    )]
    pub processed_date: DateTime<Utc>,
}

/// Older files stored the model's arrays as-is, `null` included.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl WordEntry {
    /// Empty success entry for `word`; callers fill in the linguistic fields
    pub fn success(word: impl Into<String>) -> Self {
        Self {
            word: Some(word.into()),
            definition: None,
            part_of_speech: None,
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            phonetic_spelling: None,
            first_known_usage: None,
            example_sentence: None,
            processing_status: ProcessingStatus::Success,
            error_reason: None,
            processed_date: Utc::now(),
        }
    }

    /// Failure record: every linguistic field empty, reason attached
    pub fn failed(word: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            processing_status: ProcessingStatus::Failed,
            error_reason: Some(reason.into()),
            ..Self::success(word)
        }
    }

    pub fn is_success(&self) -> bool {
        self.processing_status == ProcessingStatus::Success
    }

    /// `word` and `definition` are both present and not blank
    pub fn has_required_fields(&self) -> bool {
        let present = |field: &Option<String>| {
            field.as_deref().is_some_and(|value| !value.trim().is_empty())
        };

        present(&self.word) && present(&self.definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_entry_serializes_nulls_and_reason() {
        let entry = WordEntry::failed("abase", "API returned empty response");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["word"], "abase");
        assert!(json["definition"].is_null());
        assert!(json["partOfSpeech"].is_null());
        assert_eq!(json["synonyms"], serde_json::json!([]));
        assert_eq!(json["processingStatus"], "failed");
        assert_eq!(json["errorReason"], "API returned empty response");
    }

    #[test]
    fn test_success_entry_omits_error_reason() {
        let mut entry = WordEntry::success("abase");
        entry.definition = Some("to lower in rank".into());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["processingStatus"], "success");
        assert!(json.get("errorReason").is_none());
        assert!(entry.has_required_fields());
    }

    #[test]
    fn test_blank_definition_is_not_required_field() {
        let mut entry = WordEntry::success("abase");
        entry.definition = Some("   ".into());
        assert!(!entry.has_required_fields());
    }

    #[test]
    fn test_legacy_snake_case_entry_loads() {
        let raw = r#"{
            "word": "quixotic",
            "definition": "exceedingly idealistic",
            "part_of_speech": "adjective",
            "synonyms": ["idealistic"],
            "phonetic_spelling": "kwik-sot-ik",
            "processing_status": "success",
            "error_reason": null,
            "processed_date": "2025-06-01T12:30:00.123456"
        }"#;

        let entry: WordEntry = serde_json::from_str(raw).unwrap();
        assert!(entry.is_success());
        assert_eq!(entry.part_of_speech.as_deref(), Some("adjective"));
        assert_eq!(entry.phonetic_spelling.as_deref(), Some("kwik-sot-ik"));
        assert!(entry.antonyms.is_empty());
        assert_eq!(entry.processed_date.to_rfc3339(), "2025-06-01T12:30:00.123456+00:00");
    }

    #[test]
    fn test_null_arrays_load_as_empty() {
        let raw = r#"{"word": "abase", "definition": "to lower", "synonyms": null, "antonyms": null}"#;

        let entry: WordEntry = serde_json::from_str(raw).unwrap();
        assert!(entry.synonyms.is_empty());
        assert!(entry.antonyms.is_empty());

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["synonyms"], serde_json::json!([]));
    }

    #[test]
    fn test_missing_status_defaults_to_failed() {
        let entry: WordEntry =
            serde_json::from_str(r#"{"word": "abase", "definition": "to lower"}"#).unwrap();
        assert_eq!(entry.processing_status, ProcessingStatus::Failed);
    }
}
