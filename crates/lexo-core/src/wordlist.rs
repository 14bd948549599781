use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("Failed to read word list {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read one word per line
pub fn read_word_list(path: &Path) -> Result<Vec<String>, WordListError> {
    let content = std::fs::read_to_string(path).map_err(|source| WordListError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let words = parse_word_list(&content);
    tracing::info!(path = %path.display(), count = words.len(), "Loaded word list");
    Ok(words)
}

/// Trimmed, non-blank lines in order. Repeats of a word are dropped.
pub fn parse_word_list(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();

    for line in content.lines() {
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        if !seen.insert(word) {
            tracing::warn!(word, "Duplicate word in list, ignoring");
            continue;
        }
        words.push(word.to_string());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word_list_trims_and_dedupes() {
        let words = parse_word_list("abase\n\n  quixotic \r\nAbase\nabase\n\t\n");
        assert_eq!(words, vec!["abase", "quixotic", "Abase"]);
    }

    #[test]
    fn test_read_missing_list_fails() {
        let err = read_word_list(Path::new("/no/such/word_list.txt")).unwrap_err();
        assert!(matches!(err, WordListError::Read { .. }));
    }
}
