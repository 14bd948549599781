//! Turns a raw model reply into a [`WordEntry`] or a classified failure.

use lexo_types::WordEntry;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty response")]
    EmptyResponse,

    /// `line` and `column` point into the raw reply, prose and fences included
    #[error("Malformed JSON: {message}")]
    MalformedJson {
        line: usize,
        column: usize,
        message: String,
        kind: ReplyKind,
    },

    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingRequiredField(Vec<&'static str>),
}

/// What a reply that is not JSON looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Refusal,
    ErrorMessage,
    Other,
}

impl ReplyKind {
    fn detect(text: &str) -> Self {
        let text = text.trim();
        let refusal = ["I'm sorry", "I\u{2019}m sorry", "I cannot", "I can't"];

        if refusal.iter().any(|prefix| text.starts_with(prefix)) {
            ReplyKind::Refusal
        } else if text.starts_with("Error") || text.to_lowercase().contains("error") {
            ReplyKind::ErrorMessage
        } else {
            ReplyKind::Other
        }
    }
}

impl ParseError {
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::EmptyResponse => "empty_response",
            ParseError::MalformedJson { .. } => "malformed_json",
            ParseError::MissingRequiredField(_) => "missing_required_field",
        }
    }

    /// Human-readable reason stored in a failed entry
    pub fn reason(&self) -> String {
        match self {
            ParseError::EmptyResponse => "API returned empty response".to_string(),
            ParseError::MalformedJson { message, kind, .. } => {
                let label = match kind {
                    ReplyKind::Refusal => "API refused to process word",
                    ReplyKind::ErrorMessage => "API returned error message",
                    ReplyKind::Other => "API returned non-JSON response",
                };
                format!("{label} ({message})")
            }
            ParseError::MissingRequiredField(_) => self.to_string(),
        }
    }
}

/// Shape the model is asked to produce. Both snake_case and camelCase keys
/// are accepted.
#[derive(Debug, Deserialize)]
struct ModelPayload {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default, alias = "partOfSpeech")]
    part_of_speech: Option<String>,
    #[serde(default)]
    synonyms: Option<Vec<String>>,
    #[serde(default)]
    antonyms: Option<Vec<String>>,
    #[serde(default, alias = "phoneticSpelling")]
    phonetic_spelling: Option<String>,
    #[serde(default, alias = "firstKnownUsage")]
    first_known_usage: Option<String>,
    #[serde(default, alias = "exampleSentence")]
    example_sentence: Option<String>,
}

pub fn parse(raw: &str) -> Result<WordEntry, ParseError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let (start, json) = extract_payload(text);
    let offset = raw.len() - raw.trim_start().len() + start;

    let payload: ModelPayload = serde_json::from_str(json).map_err(|e| {
        let (line, column) = position_in_reply(raw, offset, e.line(), e.column());
        let detail = e.to_string();
        let detail = detail
            .strip_suffix(&format!(" at line {} column {}", e.line(), e.column()))
            .unwrap_or(&detail);

        ParseError::MalformedJson {
            line,
            column,
            message: format!("{detail} at line {line} column {column}"),
            kind: ReplyKind::detect(text),
        }
    })?;

    let word = clean(payload.word);
    let definition = clean(payload.definition);

    let missing: Vec<&'static str> = [("word", word.is_none()), ("definition", definition.is_none())]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();
    let (Some(word), Some(definition)) = (word, definition) else {
        return Err(ParseError::MissingRequiredField(missing));
    };

    let mut entry = WordEntry::success(word);
    entry.definition = Some(definition);
    entry.part_of_speech = clean(payload.part_of_speech);
    entry.synonyms = clean_list(payload.synonyms);
    entry.antonyms = clean_list(payload.antonyms);
    entry.phonetic_spelling = clean(payload.phonetic_spelling);
    entry.first_known_usage = clean(payload.first_known_usage);
    entry.example_sentence = clean(payload.example_sentence);

    Ok(entry)
}

/// Slice from the first `{` to the last `}`, which drops code fences and
/// any prose around the object. Text without braces is returned as is.
/// Also returns the byte offset of the slice within `text`.
fn extract_payload(text: &str) -> (usize, &str) {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, &text[start..=end]),
        _ => (0, text),
    }
}

/// Shift a 1-based position inside the payload starting at byte `offset`
/// of `raw` so it points into `raw` itself.
fn position_in_reply(raw: &str, offset: usize, line: usize, column: usize) -> (usize, usize) {
    let before = &raw[..offset];
    let lines_before = before.matches('\n').count();

    if line == 1 {
        let lead = before.rsplit('\n').next().map_or(0, str::len);
        (line + lines_before, column + lead)
    } else {
        (line + lines_before, column)
    }
}

/// Blank strings count as absent
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(values: Option<Vec<String>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| clean(Some(v)))
        .collect()
}
