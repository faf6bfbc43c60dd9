/*!
 * REST collaborators of the admin backend.
 *
 * This module contains:
 * - `models`: typed request/response bodies, one per endpoint
 * - `http`: the reqwest-backed `ApiClient`
 * - the collaborator traits the session and translation layers depend on,
 *   implemented by `ApiClient` in `auth`, `translations` and `users`
 */

use async_trait::async_trait;
use std::fmt::Debug;
use uuid::Uuid;

use crate::errors::ApiError;

pub mod auth;
pub mod http;
pub mod models;
pub mod translations;
pub mod users;

pub use http::ApiClient;
pub use models::*;

/// Authentication collaborator
///
/// Calls that act on the logged-in account take the access token as
/// `bearer`; an expired or revoked token yields `ApiError::Unauthorized`.
#[async_trait]
pub trait AuthApi: Send + Sync + Debug {
    /// Exchange credentials for an access/refresh token pair
    async fn login(&self, credentials: &LoginCredentials) -> Result<Token, ApiError>;

    /// Exchange a refresh token for a new token pair
    async fn refresh(&self, refresh_token: &str) -> Result<Token, ApiError>;

    /// Revoke a refresh token server-side
    async fn revoke(&self, refresh_token: &str) -> Result<Message, ApiError>;

    /// Register a new account
    async fn register(&self, registration: &UserRegister) -> Result<UserPublic, ApiError>;

    /// Fetch the account the token belongs to
    async fn current_user(&self, bearer: &str) -> Result<UserPublic, ApiError>;

    /// Update the logged-in account's profile
    async fn update_current_user(
        &self,
        bearer: &str,
        update: &UserUpdateMe,
    ) -> Result<UserPublic, ApiError>;

    /// Change the logged-in account's password
    async fn change_password(&self, bearer: &str, body: &UpdatePassword)
    -> Result<Message, ApiError>;

    /// Delete the logged-in account
    async fn delete_current_user(&self, bearer: &str) -> Result<Message, ApiError>;

    /// Send a password recovery email
    async fn recover_password(&self, email: &str) -> Result<Message, ApiError>;

    /// Set a new password using a recovery token
    async fn reset_password(&self, body: &NewPassword) -> Result<Message, ApiError>;

    /// Login URLs of the configured OAuth providers
    async fn oauth_urls(&self) -> Result<OAuthUrls, ApiError>;
}

/// Translations collaborator
#[async_trait]
pub trait TranslationsApi: Send + Sync + Debug {
    /// All entries of one language's table
    async fn get_translations(&self, language: &str) -> Result<Vec<TranslationItem>, ApiError>;

    /// A single entry
    async fn get_translation(&self, language: &str, key: &str)
    -> Result<TranslationPublic, ApiError>;

    /// Tables for several languages at once (admin only)
    async fn get_bulk_translations(
        &self,
        bearer: &str,
        languages: &[String],
    ) -> Result<BulkTranslations, ApiError>;

    /// Create an entry (admin only)
    async fn create_translation(
        &self,
        bearer: &str,
        translation: &TranslationCreate,
    ) -> Result<TranslationResponse, ApiError>;

    /// Update an entry (admin only)
    async fn update_translation(
        &self,
        bearer: &str,
        id: Uuid,
        update: &TranslationUpdate,
    ) -> Result<TranslationResponse, ApiError>;

    /// Delete an entry (admin only)
    async fn delete_translation(&self, bearer: &str, id: Uuid) -> Result<Message, ApiError>;

    /// Insert many entries (admin only)
    async fn bulk_insert_translations(
        &self,
        bearer: &str,
        translations: &[TranslationCreate],
    ) -> Result<Message, ApiError>;
}

/// Users/Admin collaborator
#[async_trait]
pub trait UsersApi: Send + Sync + Debug {
    /// One page of users
    async fn list_users(&self, bearer: &str, skip: u32, limit: u32)
    -> Result<UsersPublic, ApiError>;

    /// A single user
    async fn get_user(&self, bearer: &str, id: Uuid) -> Result<UserPublic, ApiError>;

    /// Create a user
    async fn create_user(&self, bearer: &str, user: &UserCreate) -> Result<UserPublic, ApiError>;

    /// Update a user
    async fn update_user(
        &self,
        bearer: &str,
        id: Uuid,
        update: &UserUpdate,
    ) -> Result<UserPublic, ApiError>;

    /// Delete a user
    async fn delete_user(&self, bearer: &str, id: Uuid) -> Result<Message, ApiError>;
}
