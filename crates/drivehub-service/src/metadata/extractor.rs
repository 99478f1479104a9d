//! Description metadata extraction.
//!
//! Drive descriptions are edited by hand, so the same key can arrive as a
//! proper JSON object (`{"formUrl":"https://..."}`), as a loose fragment
//! inside other text, or as an object body missing its braces
//! (`"copy":"hi"`). Each shape has its own strategy; strategies run in
//! order and the first hit wins.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use drivehub_entity::hierarchy::FileProperties;

/// Key holding an external form URL.
pub const FORM_URL_KEY: &str = "formUrl";

/// Key holding clipboard text.
pub const COPY_KEY: &str = "copy";

/// A single extraction strategy: `(description, key) -> value`.
type Strategy = fn(&str, &str) -> Option<String>;

/// Strategies in the order they are tried.
const STRATEGIES: [Strategy; 3] = [from_json_object, from_key_pattern, from_wrapped_fragment];

/// Extract one property from a description.
///
/// Returns `None` when the description is absent or no strategy finds a
/// non-empty value for `key`.
pub fn extract_property(description: Option<&str>, key: &str) -> Option<String> {
    let description = description?;
    if description.trim().is_empty() {
        return None;
    }
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(description, key))
}

/// The `formUrl` property.
pub fn extract_form_url(description: Option<&str>) -> Option<String> {
    extract_property(description, FORM_URL_KEY)
}

/// The `copy` property.
pub fn extract_copy_text(description: Option<&str>) -> Option<String> {
    extract_property(description, COPY_KEY)
}

/// Build the full property bag for a description.
///
/// `form_url` and `copy_text` use [`extract_property`]; every other scalar
/// key found by the object strategies lands in `extra`. Returns `None`
/// when nothing was found.
pub fn extract_properties(description: Option<&str>) -> Option<FileProperties> {
    let text = description?;
    let mut properties = FileProperties {
        form_url: extract_form_url(Some(text)),
        copy_text: extract_copy_text(Some(text)),
        extra: BTreeMap::new(),
    };

    if let Some(object) = parse_object(text).or_else(|| parse_wrapped(text)) {
        properties.extra = object
            .iter()
            .filter(|(k, _)| k.as_str() != FORM_URL_KEY && k.as_str() != COPY_KEY)
            .filter_map(|(k, v)| scalar(v).map(|s| (k.clone(), s)))
            .collect();
    }

    properties.non_empty()
}

/// Strategy 1: the whole description is a JSON object.
fn from_json_object(description: &str, key: &str) -> Option<String> {
    parse_object(description)?.get(key).and_then(scalar)
}

/// Strategy 2: a `"key":"value"` or `'key':'value'` pair anywhere in the text.
fn from_key_pattern(description: &str, key: &str) -> Option<String> {
    let compiled;
    let pattern = match known_pattern(key) {
        Some(pattern) => pattern,
        None => {
            compiled = key_regex(key).ok()?;
            &compiled
        }
    };
    let caps = pattern.captures(description)?;

    let value = if let Some(double) = caps.get(1) {
        let raw = double.as_str();
        serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
    } else {
        caps.get(2)?.as_str().replace("\\'", "'")
    };
    (!value.is_empty()).then_some(value)
}

/// Compiled pair patterns for the keys every file is checked for.
fn known_pattern(key: &str) -> Option<&'static Regex> {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            [FORM_URL_KEY, COPY_KEY]
                .into_iter()
                .filter_map(|k| key_regex(k).ok().map(|re| (k, re)))
                .collect()
        })
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, re)| re)
}

/// Groups: 1=double-quoted value, 2=single-quoted value.
fn key_regex(key: &str) -> Result<Regex, regex::Error> {
    let key = regex::escape(key);
    Regex::new(&format!(
        r#""{key}"\s*:\s*"((?:[^"\\]|\\.)*)"|'{key}'\s*:\s*'((?:[^'\\]|\\.)*)'"#
    ))
}

/// Strategy 3: the description is an object body without its braces.
fn from_wrapped_fragment(description: &str, key: &str) -> Option<String> {
    parse_wrapped(description)?.get(key).and_then(scalar)
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Wrap the trimmed text in braces, first as-is and then with one pair of
/// outer quotes removed.
fn parse_wrapped(text: &str) -> Option<Map<String, Value>> {
    let trimmed = text.trim();
    let unquoted = strip_outer_quotes(trimmed);
    [Some(trimmed), unquoted]
        .into_iter()
        .flatten()
        .find_map(|body| parse_object(&format!("{{{body}}}")))
}

fn strip_outer_quotes(text: &str) -> Option<&str> {
    ['\'', '"'].into_iter().find_map(|q| {
        text.strip_prefix(q)
            .and_then(|t| t.strip_suffix(q))
            .map(str::trim)
    })
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
