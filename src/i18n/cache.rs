/*!
 * Translation table caching.
 *
 * Tables are cached per language code for the lifetime of the process and
 * only leave the cache when explicitly invalidated or replaced by a reload.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use super::table::TranslationTable;

/// Hit/miss counters of a `TableCache`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
}

/// Cache of loaded translation tables keyed by language code
#[derive(Debug, Clone, Default)]
pub struct TableCache {
    /// Internal cache storage
    tables: Arc<RwLock<HashMap<String, Arc<TranslationTable>>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a table, counting the lookup as a hit or miss
    pub fn get(&self, language: &str) -> Option<Arc<TranslationTable>> {
        let tables = self.tables.read();

        match tables.get(language) {
            Some(table) => {
                *self.hits.write() += 1;
                debug!("Table cache hit for '{}'", language);
                Some(table.clone())
            }
            None => {
                *self.misses.write() += 1;
                debug!("Table cache miss for '{}'", language);
                None
            }
        }
    }

    /// Get a table without touching the counters
    pub fn peek(&self, language: &str) -> Option<Arc<TranslationTable>> {
        self.tables.read().get(language).cloned()
    }

    pub fn contains(&self, language: &str) -> bool {
        self.tables.read().contains_key(language)
    }

    /// Store a table under its language, replacing any previous one wholesale
    pub fn store(&self, table: TranslationTable) -> Arc<TranslationTable> {
        let language = table.language().to_string();
        let table = Arc::new(table);
        let replaced = self
            .tables
            .write()
            .insert(language.clone(), table.clone())
            .is_some();

        debug!(
            "{} table for '{}' ({} entries)",
            if replaced { "Replaced" } else { "Cached" },
            language,
            table.len()
        );
        table
    }

    /// Drop one language's table
    pub fn invalidate(&self, language: &str) -> bool {
        let removed = self.tables.write().remove(language).is_some();
        if removed {
            debug!("Invalidated table for '{}'", language);
        }
        removed
    }

    /// Drop every table but keep the counters
    pub fn invalidate_all(&self) {
        self.tables.write().clear();
        debug!("Invalidated all cached tables");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
        }
    }

    /// Clear the cache and reset the counters
    pub fn clear(&self) {
        self.tables.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;

        debug!("Table cache cleared");
    }

    /// Languages with a cached table, sorted
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.tables.read().keys().cloned().collect();
        languages.sort();
        languages
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}
