use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use crate::app_config::Config;
use crate::client::models::{
    BulkTranslations, CurrentUser, LoginCredentials, Message, TranslationCreate, TranslationPublic,
    TranslationResponse, TranslationUpdate, UserCreate, UserPublic, UserUpdate, UserUpdateMe,
    UsersPublic,
};
use crate::client::{ApiClient, AuthApi, TranslationsApi, UsersApi};
use crate::errors::{ApiError, SessionError, TranslationError};
use crate::i18n::{self, TranslationResolver};
use crate::session::{LogPresenter, Presenter, SessionContext, SessionManager};
use crate::storage::{LocalStore, StoreConnection};

// @module: Application controller wiring session and translations

/// Snapshot of the session for display
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub logged_in: bool,
    pub expiry_epoch_ms: Option<i64>,
    pub email: Option<String>,
    pub language: String,
    pub translations_ready: bool,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    context: Arc<SessionContext>,
    session: SessionManager<dyn AuthApi>,
    resolver: Arc<TranslationResolver<dyn TranslationsApi>>,
    users: Arc<dyn UsersApi>,
}

impl Controller {
    // @method: Create a controller talking to the configured backend
    pub async fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let store = match &config.storage.path {
            Some(path) => LocalStore::new(StoreConnection::new(path)?),
            None => LocalStore::new_default()?,
        };
        let client = Arc::new(ApiClient::from_config(&config.api)?);

        Self::with_parts(config, store, client.clone(), client.clone(), client, None).await
    }

    /// Create a controller from explicit collaborators.
    ///
    /// Without a presenter, notifications go to the log, translated with the
    /// controller's own resolver.
    pub async fn with_parts(
        config: Config,
        store: LocalStore,
        auth: Arc<dyn AuthApi>,
        translations: Arc<dyn TranslationsApi>,
        users: Arc<dyn UsersApi>,
        presenter: Option<Arc<dyn Presenter>>,
    ) -> Result<Self> {
        let context = Arc::new(SessionContext::init(store).await?);
        let resolver = Arc::new(TranslationResolver::new(
            translations,
            &config.i18n.default_language,
        ));
        let presenter = presenter.unwrap_or_else(|| {
            Arc::new(LogPresenter::with_translator(resolver.clone())) as Arc<dyn Presenter>
        });
        let session = SessionManager::new(auth, context.clone(), presenter);

        Ok(Self {
            config,
            context,
            session,
            resolver,
            users,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionManager<dyn AuthApi> {
        &self.session
    }

    pub fn resolver(&self) -> &Arc<TranslationResolver<dyn TranslationsApi>> {
        &self.resolver
    }

    /// Restore a stored session and load the active language's table
    pub async fn start(&self) -> Result<String> {
        if let Err(e) = self.session.restore().await {
            warn!("Could not restore session: {}", e);
        }

        let language = self.sync_language().await?;

        if !self.config.i18n.preload_languages.is_empty() {
            let loaded = self
                .resolver
                .preload(&self.config.i18n.preload_languages)
                .await;
            debug!(
                "Preloaded {}/{} languages",
                loaded,
                self.config.i18n.preload_languages.len()
            );
        }

        Ok(language)
    }

    /// Make the resolver follow the user / stored / default language.
    ///
    /// A table that fails to load is logged; lookups then return keys.
    pub async fn sync_language(&self) -> Result<String> {
        let stored = self.context.stored_language().await?;
        let language = i18n::resolve_language(
            self.context.current_user().as_ref(),
            stored.as_deref(),
            &self.config.i18n.default_language,
        );

        if let Err(e) = self.resolver.set_language(&language).await {
            warn!("Translations for '{}' unavailable: {}", language, e);
        }
        Ok(self.resolver.active_language())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentUser, SessionError> {
        let user = self
            .session
            .login(&LoginCredentials::new(username, password))
            .await?;
        if let Err(e) = self.sync_language().await {
            warn!("Failed to apply language after login: {:#}", e);
        }
        Ok(user)
    }

    /// Log out and fall back to the stored or default language
    pub async fn logout(&self) {
        self.session.logout().await;
        self.resync_language().await;
    }

    async fn resync_language(&self) {
        if let Err(e) = self.sync_language().await {
            warn!("Failed to apply language after logout: {:#}", e);
        }
    }

    pub fn status(&self) -> SessionStatus {
        let session = self.context.session();
        SessionStatus {
            logged_in: self.session.is_logged_in(),
            expiry_epoch_ms: session.and_then(|s| s.expiry_epoch_ms),
            email: self.context.current_user().map(|u| u.email),
            language: self.resolver.active_language(),
            translations_ready: self.resolver.is_ready(),
        }
    }

    /// Change the display language.
    ///
    /// A logged-in user's profile is updated, which also persists the
    /// choice; otherwise only the local preference is stored.
    pub async fn set_language(&self, language: &str) -> Result<String> {
        let language = crate::language_utils::normalize_language_code(language)?;

        if self.session.is_logged_in() {
            let update = UserUpdateMe {
                preferred_language: Some(language.clone()),
                ..UserUpdateMe::default()
            };
            if let Err(e) = self.session.update_profile(&update).await {
                if !self.session.is_logged_in() {
                    self.resync_language().await;
                }
                return Err(e.into());
            }
        } else {
            self.context.set_stored_language(&language).await?;
        }

        self.resolver.set_language(&language).await?;
        info!("Language set to {}", language);
        Ok(language)
    }

    pub fn translate(&self, key: &str, replacements: Option<&HashMap<String, String>>) -> String {
        self.resolver.get_translation(key, replacements)
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Run an authenticated call; a call that ends the session also drops
    /// the user's language
    async fn authorized<T, F, Fut>(&self, call: F) -> Result<T, SessionError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let result = self.session.authorized(call).await;
        if result.is_err() && !self.session.is_logged_in() {
            self.resync_language().await;
        }
        result
    }

    pub async fn list_users(&self, skip: u32, limit: u32) -> Result<UsersPublic, SessionError> {
        let users = self.users.clone();
        self.authorized(|bearer| async move { users.list_users(&bearer, skip, limit).await })
            .await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserPublic, SessionError> {
        let users = self.users.clone();
        self.authorized(|bearer| async move { users.get_user(&bearer, id).await })
            .await
    }

    pub async fn create_user(&self, user: &UserCreate) -> Result<CurrentUser, SessionError> {
        let users = self.users.clone();
        let user = user.clone();
        self.authorized(|bearer| async move { users.create_user(&bearer, &user).await })
            .await
    }

    pub async fn update_user(&self, id: Uuid, update: &UserUpdate) -> Result<UserPublic, SessionError> {
        let users = self.users.clone();
        let update = update.clone();
        self.authorized(|bearer| async move { users.update_user(&bearer, id, &update).await })
            .await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<Message, SessionError> {
        let users = self.users.clone();
        self.authorized(|bearer| async move { users.delete_user(&bearer, id).await })
            .await
    }

    /// A single entry straight from the server
    pub async fn translation_entry(
        &self,
        language: &str,
        key: &str,
    ) -> Result<TranslationPublic, TranslationError> {
        self.resolver.entry(language, key).await
    }

    pub async fn bulk_translations(
        &self,
        languages: &[String],
    ) -> Result<BulkTranslations, SessionError> {
        let resolver = self.resolver.clone();
        let languages = languages.to_vec();
        self.authorized(|bearer| async move { resolver.bulk(&bearer, &languages).await })
            .await
    }

    pub async fn create_translation(
        &self,
        translation: &TranslationCreate,
    ) -> Result<TranslationResponse, SessionError> {
        let resolver = self.resolver.clone();
        let translation = translation.clone();
        self.authorized(|bearer| async move { resolver.create_entry(&bearer, &translation).await })
            .await
    }

    pub async fn update_translation(
        &self,
        id: Uuid,
        update: &TranslationUpdate,
    ) -> Result<TranslationResponse, SessionError> {
        let resolver = self.resolver.clone();
        let update = update.clone();
        self.authorized(|bearer| async move { resolver.update_entry(&bearer, id, &update).await })
            .await
    }

    pub async fn delete_translation(&self, id: Uuid) -> Result<Message, SessionError> {
        let resolver = self.resolver.clone();
        self.authorized(|bearer| async move { resolver.delete_entry(&bearer, id).await })
            .await
    }

    pub async fn bulk_insert_translations(
        &self,
        translations: &[TranslationCreate],
    ) -> Result<Message, SessionError> {
        let resolver = self.resolver.clone();
        let translations = translations.to_vec();
        self.authorized(|bearer| async move { resolver.bulk_insert(&bearer, &translations).await })
            .await
    }
}
