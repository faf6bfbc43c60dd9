/*!
 * Explicit session context.
 *
 * Owns the persisted tokens (through the local store) and the cached
 * current user. Created once with `init`, cleared with `teardown`, and
 * shared by reference with whatever needs auth state.
 */

use anyhow::{Context, Result};
use log::debug;
use parking_lot::RwLock;

use super::models::Session;
use crate::client::models::{CurrentUser, Token};
use crate::storage::{LocalStore, ACCESS_TOKEN_KEY, PREFERRED_LANGUAGE_KEY, REFRESH_TOKEN_KEY};

/// Session state shared between the session manager and its consumers
pub struct SessionContext {
    /// Persistent storage for tokens and the language preference
    store: LocalStore,
    /// In-memory mirror of the persisted tokens
    session: RwLock<Option<Session>>,
    /// Cached current user
    user: RwLock<Option<CurrentUser>>,
}

impl SessionContext {
    /// Load any persisted session from the store
    pub async fn init(store: LocalStore) -> Result<Self> {
        let access_token = store
            .get_item(ACCESS_TOKEN_KEY)
            .await
            .context("Failed to read access token")?;
        let refresh_token = store
            .get_item(REFRESH_TOKEN_KEY)
            .await
            .context("Failed to read refresh token")?;

        let session = access_token
            .filter(|t| !t.is_empty())
            .map(|access| Session::from_tokens(access, refresh_token));

        debug!(
            "Session context initialized ({})",
            if session.is_some() { "stored tokens found" } else { "no stored tokens" }
        );

        Ok(Self {
            store,
            session: RwLock::new(session),
            user: RwLock::new(None),
        })
    }

    /// The backing store
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Snapshot of the current tokens
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.session
            .read()
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
    }

    /// Whether a stored access token is live at `now_ms`
    pub fn is_logged_in_at(&self, now_ms: i64) -> bool {
        self.session
            .read()
            .as_ref()
            .is_some_and(|s| s.is_live_at(now_ms))
    }

    /// Persist a freshly issued token pair
    ///
    /// A missing refresh token is stored as an empty string.
    pub async fn store_tokens(&self, token: &Token) -> Result<()> {
        let refresh = token.refresh_token.clone().unwrap_or_default();
        self.store
            .set_items(&[
                (ACCESS_TOKEN_KEY, token.access_token.as_str()),
                (REFRESH_TOKEN_KEY, refresh.as_str()),
            ])
            .await
            .context("Failed to persist tokens")?;

        *self.session.write() = Some(Session::from_tokens(
            token.access_token.clone(),
            token.refresh_token.clone(),
        ));
        Ok(())
    }

    /// Drop both tokens and the cached user.
    ///
    /// Memory is cleared before storage so that a storage failure still
    /// leaves this process logged out.
    pub async fn teardown(&self) -> Result<()> {
        self.session.write().take();
        self.user.write().take();
        self.store
            .remove_items(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
            .await
            .context("Failed to remove stored tokens")
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.user.read().clone()
    }

    pub fn set_current_user(&self, user: CurrentUser) {
        *self.user.write() = Some(user);
    }

    /// Forget the cached user so the next read refetches it
    pub fn invalidate_user(&self) {
        self.user.write().take();
    }

    /// The last persisted language choice
    pub async fn stored_language(&self) -> Result<Option<String>> {
        let language = self
            .store
            .get_item(PREFERRED_LANGUAGE_KEY)
            .await
            .context("Failed to read preferred language")?;
        Ok(language.filter(|l| !l.is_empty()))
    }

    /// Persist a language choice
    pub async fn set_stored_language(&self, language: &str) -> Result<()> {
        self.store
            .set_item(PREFERRED_LANGUAGE_KEY, language)
            .await
            .context("Failed to persist preferred language")
    }
}
