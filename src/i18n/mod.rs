/*!
 * Client-side translation resolution.
 *
 * This module provides:
 * - `table`: per-language key -> value tables and `{name}` substitution
 * - `cache`: the per-language table cache
 * - `resolver`: the active language and its lookups
 */

pub mod cache;
pub mod resolver;
pub mod table;

pub use cache::{CacheStats, TableCache};
pub use resolver::TranslationResolver;
pub use table::{TranslationTable, apply_replacements};

use crate::client::models::CurrentUser;

/// Language used when nothing else names one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Anything that turns a translation key into display text
pub trait Translate: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Pick the active language.
///
/// The user's preference wins, then the stored preference, then the default.
/// Empty values count as absent.
pub fn resolve_language(
    user: Option<&CurrentUser>,
    stored: Option<&str>,
    default: &str,
) -> String {
    user.map(|u| u.preferred_language.trim())
        .filter(|language| !language.is_empty())
        .or_else(|| stored.map(str::trim).filter(|language| !language.is_empty()))
        .unwrap_or(default)
        .to_string()
}
