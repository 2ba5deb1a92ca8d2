//! Template Resolver
//!
//! Substitutes `{{path.to.value}}` placeholders in strings and JSON values
//! against a context map. The executor uses this to chain one item's output
//! into another item's parameters.
//!
//! Resolution rules:
//! - a string that is exactly one placeholder substitutes the raw JSON value
//! - placeholders embedded in longer text stringify their value
//! - unresolved placeholders are left intact so missing upstream output
//!   degrades visibly instead of silently erasing parameters

use regex::Regex;
use serde_json::{Map, Value};

/// Resolver with a pre-compiled placeholder pattern.
pub struct TemplateResolver {
    pattern: Regex,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateResolver {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\{\{\s*([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)\s*\}\}").unwrap(),
        }
    }

    /// Resolve placeholders inside a string, stringifying non-string values.
    pub fn resolve_str(&self, input: &str, context: &Value) -> String {
        self.pattern
            .replace_all(input, |caps: &regex::Captures<'_>| {
                match lookup(context, &caps[1]) {
                    Some(value) => stringify(value),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Resolve placeholders recursively through a JSON value.
    ///
    /// A string that consists of exactly one placeholder is replaced by the
    /// raw looked-up value, preserving its JSON type.
    pub fn resolve_value(&self, input: &Value, context: &Value) -> Value {
        match input {
            Value::String(text) => {
                if let Some(path) = self.whole_placeholder(text) {
                    if let Some(value) = lookup(context, &path) {
                        return value.clone();
                    }
                }
                Value::String(self.resolve_str(text, context))
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_value(item, context))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(self.resolve_object(map, context)),
            other => other.clone(),
        }
    }

    /// Resolve placeholders through every entry of a JSON object.
    pub fn resolve_object(&self, map: &Map<String, Value>, context: &Value) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| (key.clone(), self.resolve_value(value, context)))
            .collect()
    }

    /// The placeholder path when the whole trimmed string is one placeholder.
    fn whole_placeholder(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        let caps = self.pattern.captures(trimmed)?;
        let whole = caps.get(0)?;
        if whole.start() == 0 && whole.end() == trimmed.len() {
            Some(caps[1].to_string())
        } else {
            None
        }
    }
}

/// Render a JSON value as plain text: strings keep their raw contents,
/// other values use their JSON representation.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Walk a dot-separated path through objects and arrays.
fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = context;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
