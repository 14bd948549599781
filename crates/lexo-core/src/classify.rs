use lexo_types::WordEntry;

/// What the pipeline should do with one input word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Complete success entry already stored
    Skip,
    /// Never seen before
    Process,
    /// Stored entry failed or is missing `word`/`definition`
    Reprocess,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Skip => "skip",
            Action::Process => "process",
            Action::Reprocess => "reprocess",
        }
    }
}

pub fn classify(existing: Option<&WordEntry>) -> Action {
    match existing {
        None => Action::Process,
        Some(entry) if entry.is_success() && entry.has_required_fields() => Action::Skip,
        Some(_) => Action::Reprocess,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(word: &str) -> WordEntry {
        let mut entry = WordEntry::success(word);
        entry.definition = Some("to lower in rank or esteem".into());
        entry
    }

    #[test]
    fn test_absent_entry_is_processed() {
        assert_eq!(classify(None), Action::Process);
    }

    #[test]
    fn test_complete_success_is_skipped() {
        assert_eq!(classify(Some(&complete("abase"))), Action::Skip);
    }

    #[test]
    fn test_success_without_optional_fields_is_still_skipped() {
        let entry = complete("abase");
        assert!(entry.part_of_speech.is_none());
        assert!(entry.synonyms.is_empty());
        assert_eq!(classify(Some(&entry)), Action::Skip);
    }

    #[test]
    fn test_success_missing_required_field_is_reprocessed() {
        let mut no_definition = complete("abase");
        no_definition.definition = None;
        assert_eq!(classify(Some(&no_definition)), Action::Reprocess);

        let mut no_word = complete("abase");
        no_word.word = None;
        assert_eq!(classify(Some(&no_word)), Action::Reprocess);
    }

    #[test]
    fn test_failed_entry_is_reprocessed() {
        let mut failed = complete("abase");
        failed.processing_status = lexo_types::ProcessingStatus::Failed;
        assert_eq!(classify(Some(&failed)), Action::Reprocess);
        assert_eq!(classify(Some(&WordEntry::failed("abase", "boom"))), Action::Reprocess);
    }
}
