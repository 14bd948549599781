const PROMPT_TEMPLATE: &str = r#"Provide information about the English word "{word}" as STRICT JSON.

Reply with ONLY the JSON object: no explanation, no markdown, no code fences, nothing before or after it.

Use exactly this structure:
{
  "word": "{word}",
  "definition": "clear definition of the word",
  "part_of_speech": "primary part of speech (noun, verb, adjective, ...)",
  "synonyms": ["at most two synonyms, [] if none"],
  "antonyms": ["at most two antonyms, [] if none"],
  "phonetic_spelling": "simple respelling, e.g. 'uh-beys' for 'abase'",
  "first_known_usage": "century of first use, e.g. '14th century', or null if unknown",
  "example_sentence": "a sentence that shows the meaning of the word clearly in context"
}

Rules:
- The example sentence must make the meaning of the word unambiguous
- Phonetic spelling uses simple respelling (like 'nooz-pey-per' for 'newspaper')
- Use null for unknown fields and [] for missing synonyms or antonyms
- The reply must parse as JSON without errors

Generate the JSON for "{word}" now:"#;

/// Instruction prompt asking the model for one word's structured entry
pub fn build_prompt(word: &str) -> String {
    PROMPT_TEMPLATE.replace("{word}", word)
}
