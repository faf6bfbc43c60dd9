/*!
 * Session-level models shared with the presentation layer.
 */

use serde::{Deserialize, Serialize};

use super::token;

/// Tokens of a logged-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Short-lived bearer credential
    pub access_token: String,
    /// Longer-lived credential for refresh and revocation
    pub refresh_token: Option<String>,
    /// Expiry derived from the access token payload
    pub expiry_epoch_ms: Option<i64>,
}

impl Session {
    /// Build a session from raw tokens; an empty refresh token counts as absent
    pub fn from_tokens(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        let access_token = access_token.into();
        Self {
            expiry_epoch_ms: token::expiry_epoch_ms(&access_token),
            refresh_token: refresh_token.filter(|t| !t.is_empty()),
            access_token,
        }
    }

    /// Whether the access token is still valid at `now_ms`
    pub fn is_live_at(&self, now_ms: i64) -> bool {
        self.expiry_epoch_ms.is_some_and(|exp| exp > now_ms)
    }
}

/// Views the session layer can send the user to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    /// Login view showing an error code (`?error=missing_tokens`)
    LoginWithError(String),
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Error,
    Warning,
    Info,
}

/// A user-facing message
///
/// `title` and `description` are translation keys, or literal text when the
/// server supplied it. Resolving both through a translation lookup is always
/// safe since unknown keys resolve to themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub status: NotificationStatus,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: NotificationStatus,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status,
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationStatus::Success)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationStatus::Error)
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationStatus::Info)
    }
}
