//! JSON Extraction
//!
//! Models rarely return bare JSON: answers arrive wrapped in markdown fences
//! or surrounded by prose. These helpers pull the first JSON object out of
//! free-form text so callers can parse it with serde.

use serde_json::Value;

use crate::types::{LlmError, LlmResult};

/// Extract the first JSON object from text that may contain markdown fences
/// or surrounding prose. Returns `None` when no object-shaped region exists.
pub fn extract_json_object(text: &str) -> Option<String> {
    let trimmed = text.trim();

    // Fenced block with explicit json tag
    if let Some(start) = trimmed.find("```json") {
        let after_fence = &trimmed[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return Some(after_fence[..end].trim().to_string());
        }
    }

    // Any fenced block whose body starts with an object
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let body = match after_fence.find('\n') {
            Some(nl) => &after_fence[nl + 1..],
            None => after_fence,
        };
        if let Some(end) = body.find("```") {
            let content = body[..end].trim();
            if content.starts_with('{') {
                return Some(content.to_string());
            }
        }
    }

    // Raw object: first '{' to last '}'
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return Some(trimmed[start..=end].to_string());
        }
    }

    None
}

/// Extract and parse the first JSON object in the text.
pub fn extract_json_value(text: &str) -> LlmResult<Value> {
    let json_str = extract_json_object(text).ok_or_else(|| {
        LlmError::invalid(format!(
            "no JSON object found (starts with: {:?})",
            text.chars().take(80).collect::<String>()
        ))
    })?;

    serde_json::from_str(&json_str).map_err(|e| {
        LlmError::invalid(format!(
            "malformed JSON: {e}. Content: {:?}",
            json_str.chars().take(200).collect::<String>()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_json_fence() {
        let text = "Here you go:\n```json\n{\"verified\": true}\n```\nDone.";
        assert_eq!(
            extract_json_object(text),
            Some("{\"verified\": true}".to_string())
        );
    }

    #[test]
    fn test_extract_from_anonymous_fence() {
        let text = "```\n{\"confidence\": 80}\n```";
        assert_eq!(
            extract_json_object(text),
            Some("{\"confidence\": 80}".to_string())
        );
    }

    #[test]
    fn test_extract_from_surrounding_prose() {
        let text = "My judgment: {\"verified\": false, \"reason\": \"missing output\"} hope that helps";
        let extracted = extract_json_object(text).unwrap();
        assert!(extracted.starts_with('{'));
        assert!(extracted.ends_with('}'));
    }

    #[test]
    fn test_extract_none_when_absent() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn test_extract_value_parses() {
        let value = extract_json_value("```json\n{\"confidence\": 85}\n```").unwrap();
        assert_eq!(value["confidence"], 85);
    }

    #[test]
    fn test_extract_value_rejects_malformed() {
        assert!(extract_json_value("{broken json").is_err());
        assert!(extract_json_value("plain text").is_err());
    }
}
