/*!
 * Per-language translation tables and placeholder substitution.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::client::models::TranslationItem;

/// `{name}` placeholders inside translated text
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("Invalid placeholder regex"));

/// Flat key -> value table for one language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    language: String,
    entries: HashMap<String, String>,
}

impl TranslationTable {
    pub fn new(language: impl Into<String>, entries: HashMap<String, String>) -> Self {
        Self {
            language: language.into(),
            entries,
        }
    }

    /// Build a table from the list the translations endpoint returns.
    /// A key listed twice keeps its last value.
    pub fn from_items(language: impl Into<String>, items: Vec<TranslationItem>) -> Self {
        let entries = items
            .into_iter()
            .map(|item| (item.key, item.value))
            .collect::<HashMap<_, _>>();
        Self::new(language, entries)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Display string for a key.
    ///
    /// Falls back to the key itself when it is missing or its value is empty,
    /// then substitutes the given replacements.
    pub fn lookup(&self, key: &str, replacements: Option<&HashMap<String, String>>) -> String {
        let text = self.get(key).filter(|value| !value.is_empty()).unwrap_or(key);
        apply_replacements(text, replacements)
    }
}

/// Replace every `{name}` whose name is in `replacements`.
///
/// Substitution is a single pass over the original text: inserted values are
/// never scanned for further placeholders, and unknown placeholders are kept.
pub fn apply_replacements(text: &str, replacements: Option<&HashMap<String, String>>) -> String {
    match replacements {
        Some(values) if !values.is_empty() => PLACEHOLDER
            .replace_all(text, |caps: &Captures| match values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned(),
        _ => text.to_string(),
    }
}
