/*!
 * Typed request and response bodies for the REST collaborators.
 *
 * One struct per endpoint payload; optional fields are skipped when
 * serializing so that PATCH requests only carry what changed.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Username/password pair posted as an OAuth2 password form
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    /// Account email
    pub username: String,
    /// Plain-text password
    pub password: String,
}

impl LoginCredentials {
    /// Create credentials from an email and password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Token pair returned by login and refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Body of refresh and revoke requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh_token: String,
}

/// Generic `{ "message": ... }` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Public view of a user account; the cached "current user"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_language")]
    pub preferred_language: String,
    #[serde(default = "default_auth_provider")]
    pub auth_provider: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// The user the session belongs to
pub type CurrentUser = UserPublic;

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

fn default_auth_provider() -> String {
    "local".to_string()
}

/// Page of users returned by the admin listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersPublic {
    pub data: Vec<UserPublic>,
    pub count: i64,
}

/// Self-service registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Admin-side account creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub preferred_language: String,
}

impl UserCreate {
    /// Active, non-admin account with the default language
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Some(password.into()),
            full_name: None,
            is_active: true,
            is_superuser: false,
            preferred_language: default_language(),
        }
    }
}

/// Admin-side partial update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
}

/// Self-service profile update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdateMe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
}

/// Password change for the logged-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePassword {
    pub current_password: String,
    pub new_password: String,
}

/// Password reset with a recovery token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPassword {
    pub token: String,
    pub new_password: String,
}

/// Login URLs of the configured OAuth providers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthUrls {
    #[serde(default)]
    pub google: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

/// One row of a language's translation table as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationItem {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub language_code: Option<String>,
    pub key: String,
    pub value: String,
}

/// A stored translation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationPublic {
    pub id: Uuid,
    pub language_code: String,
    pub key: String,
    pub value: String,
}

/// New translation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationCreate {
    pub language_code: String,
    pub key: String,
    pub value: String,
}

/// Partial update of a translation entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Message plus the affected entry, returned by create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub message: String,
    pub translation: TranslationPublic,
}

/// Language code -> key -> value
pub type BulkTranslations = HashMap<String, HashMap<String, String>>;
