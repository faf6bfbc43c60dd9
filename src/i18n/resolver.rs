/*!
 * Translation resolver.
 *
 * Holds the active language, loads its table from the translations
 * collaborator on demand and answers key lookups from the cached table.
 */

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};
use parking_lot::RwLock;
use uuid::Uuid;

use super::cache::{CacheStats, TableCache};
use super::table::{TranslationTable, apply_replacements};
use super::Translate;
use crate::client::TranslationsApi;
use crate::client::models::{
    BulkTranslations, Message, TranslationCreate, TranslationPublic, TranslationResponse,
    TranslationUpdate,
};
use crate::errors::{ApiError, TranslationError};
use crate::language_utils::normalize_language_code;

/// Marks a language as in flight until dropped
struct LoadingGuard<'a> {
    loading: &'a RwLock<HashSet<String>>,
    language: String,
}

impl<'a> LoadingGuard<'a> {
    fn new(loading: &'a RwLock<HashSet<String>>, language: &str) -> Self {
        loading.write().insert(language.to_string());
        Self {
            loading,
            language: language.to_string(),
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.loading.write().remove(&self.language);
    }
}

/// Resolves display strings for the active language
pub struct TranslationResolver<T: TranslationsApi + ?Sized> {
    api: Arc<T>,
    cache: TableCache,
    active: RwLock<String>,
    loading: RwLock<HashSet<String>>,
}

impl<T: TranslationsApi + ?Sized> TranslationResolver<T> {
    /// Create a resolver whose active language is `default_language`.
    /// Nothing is fetched until `load` or `set_language` is called.
    pub fn new(api: Arc<T>, default_language: &str) -> Self {
        let active = normalize_language_code(default_language)
            .unwrap_or_else(|_| default_language.trim().to_string());
        Self {
            api,
            cache: TableCache::new(),
            active: RwLock::new(active),
            loading: RwLock::new(HashSet::new()),
        }
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The language lookups currently resolve against
    pub fn active_language(&self) -> String {
        self.active.read().clone()
    }

    /// Whether the active language's table is being fetched
    pub fn is_loading(&self) -> bool {
        self.loading.read().contains(&*self.active.read())
    }

    /// Whether the active language's table is available
    pub fn is_ready(&self) -> bool {
        self.cache.contains(&self.active.read())
    }

    /// The cached table of a language, if loaded
    pub fn table(&self, language: &str) -> Option<Arc<TranslationTable>> {
        self.cache.peek(language)
    }

    /// The active language's table, or `NotLoaded` when it is not available
    pub fn active_table(&self) -> Result<Arc<TranslationTable>, TranslationError> {
        let language = self.active.read().clone();
        self.cache
            .peek(&language)
            .ok_or(TranslationError::NotLoaded(language))
    }

    /// Display string for `key` in the active language.
    ///
    /// Returns the key itself when no table is loaded or the key is missing;
    /// replacements are applied either way.
    pub fn get_translation(&self, key: &str, replacements: Option<&HashMap<String, String>>) -> String {
        let language = self.active.read().clone();
        match self.cache.peek(&language) {
            Some(table) => table.lookup(key, replacements),
            None => apply_replacements(key, replacements),
        }
    }

    /// Switch the active language and make sure its table is loaded.
    ///
    /// The switch takes effect immediately; until the table arrives lookups
    /// return keys and `is_loading` is true.
    pub async fn set_language(&self, language: &str) -> Result<Arc<TranslationTable>, TranslationError> {
        let language = Self::language_key(language)?;
        let previous = std::mem::replace(&mut *self.active.write(), language.clone());
        if previous != language {
            info!("Switching language {} -> {}", previous, language);
        }
        self.load(&language).await
    }

    /// Load a language's table, using the cached one when present
    pub async fn load(&self, language: &str) -> Result<Arc<TranslationTable>, TranslationError> {
        let language = Self::language_key(language)?;
        if let Some(table) = self.cache.get(&language) {
            return Ok(table);
        }
        self.fetch(&language).await
    }

    /// Fetch a language's table again and replace the cached one
    pub async fn reload(&self, language: &str) -> Result<Arc<TranslationTable>, TranslationError> {
        let language = Self::language_key(language)?;
        self.fetch(&language).await
    }

    /// Load several languages concurrently; failures are logged and skipped
    pub async fn preload(&self, languages: &[String]) -> usize {
        let results = join_all(languages.iter().map(|language| self.load(language))).await;

        results
            .into_iter()
            .zip(languages)
            .filter(|(result, language)| match result {
                Ok(_) => true,
                Err(e) => {
                    warn!("Failed to preload translations for '{}': {}", language, e);
                    false
                }
            })
            .count()
    }

    async fn fetch(&self, language: &str) -> Result<Arc<TranslationTable>, TranslationError> {
        let _guard = LoadingGuard::new(&self.loading, language);
        debug!("Fetching translations for '{}'", language);

        let items = self.api.get_translations(language).await?;
        let table = TranslationTable::from_items(language, items);
        info!("Loaded {} translations for '{}'", table.len(), language);

        Ok(self.cache.store(table))
    }

    fn language_key(language: &str) -> Result<String, TranslationError> {
        normalize_language_code(language)
            .map_err(|e| TranslationError::InvalidLanguage(format!("{:#}", e)))
    }

    /// One entry of a language, fetched without touching the cache
    pub async fn entry(&self, language: &str, key: &str) -> Result<TranslationPublic, TranslationError> {
        let language = Self::language_key(language)?;
        Ok(self.api.get_translation(&language, key).await?)
    }

    // =========================================================================
    // Administration
    //
    // These take the caller's bearer token and return the raw API error so
    // the session layer can react to an expired token.
    // =========================================================================

    /// Tables of several languages at once, straight from the server
    pub async fn bulk(&self, bearer: &str, languages: &[String]) -> Result<BulkTranslations, ApiError> {
        self.api.get_bulk_translations(bearer, languages).await
    }

    /// Create an entry and drop the affected cached table
    pub async fn create_entry(
        &self,
        bearer: &str,
        translation: &TranslationCreate,
    ) -> Result<TranslationResponse, ApiError> {
        let response = self.api.create_translation(bearer, translation).await?;
        self.cache.invalidate(&response.translation.language_code);
        Ok(response)
    }

    /// Update an entry and drop the affected cached table.
    ///
    /// Moving an entry to another language drops every cached table since the
    /// language it came from is unknown.
    pub async fn update_entry(
        &self,
        bearer: &str,
        id: Uuid,
        update: &TranslationUpdate,
    ) -> Result<TranslationResponse, ApiError> {
        let response = self.api.update_translation(bearer, id, update).await?;
        if update.language_code.is_some() {
            self.cache.invalidate_all();
        } else {
            self.cache.invalidate(&response.translation.language_code);
        }
        Ok(response)
    }

    /// Delete an entry.
    ///
    /// The server does not say which language the entry belonged to, so every
    /// cached table is dropped.
    pub async fn delete_entry(&self, bearer: &str, id: Uuid) -> Result<Message, ApiError> {
        let message = self.api.delete_translation(bearer, id).await?;
        self.cache.invalidate_all();
        Ok(message)
    }

    /// Insert many entries and drop every affected cached table
    pub async fn bulk_insert(
        &self,
        bearer: &str,
        translations: &[TranslationCreate],
    ) -> Result<Message, ApiError> {
        let message = self.api.bulk_insert_translations(bearer, translations).await?;
        let languages: BTreeSet<&str> = translations
            .iter()
            .map(|t| t.language_code.as_str())
            .collect();
        for language in languages {
            self.cache.invalidate(language);
        }
        Ok(message)
    }
}

impl<T: TranslationsApi + ?Sized> Translate for TranslationResolver<T> {
    fn translate(&self, key: &str) -> String {
        self.get_translation(key, None)
    }
}
