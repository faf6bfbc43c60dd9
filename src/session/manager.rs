/*!
 * Session manager for the authentication lifecycle.
 *
 * This module handles:
 * - Logging in and persisting the token pair
 * - Logging out with best-effort server-side revocation
 * - Registration, profile and password operations
 * - Implicit logout whenever an authenticated call comes back unauthorized
 *
 * Failures are turned into notifications for the presenter and also
 * returned to the caller; nothing here panics on a bad response.
 */

use std::future::Future;
use std::sync::Arc;

use log::{debug, error, info, warn};
use parking_lot::RwLock;

use super::context::SessionContext;
use super::models::{Notification, Route};
use super::presenter::Presenter;
use super::token;
use crate::client::AuthApi;
use crate::client::models::{
    CurrentUser, LoginCredentials, NewPassword, OAuthUrls, Token, UpdatePassword, UserRegister,
    UserUpdateMe,
};
use crate::errors::{ApiError, SessionError};

/// Fallback shown when a login failure carries no server message
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Translation key used when an error has no displayable detail
pub const GENERIC_ERROR_KEY: &str = "form_generic_error";

/// Auth providers whose accounts have a local password
const LOCAL_AUTH_PROVIDER: &str = "local";

/// Session manager
pub struct SessionManager<A: AuthApi + ?Sized> {
    /// Authentication collaborator
    api: Arc<A>,
    /// Tokens and cached user
    context: Arc<SessionContext>,
    /// Receiver of notifications and navigation
    presenter: Arc<dyn Presenter>,
    /// Message of the last failed login, for inline display
    last_error: RwLock<Option<String>>,
}

impl<A: AuthApi + ?Sized> SessionManager<A> {
    /// Create a session manager
    pub fn new(api: Arc<A>, context: Arc<SessionContext>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            api,
            context,
            presenter,
            last_error: RwLock::new(None),
        }
    }

    /// The shared session context
    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    /// The authentication collaborator
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Whether a live access token is stored. Never fails.
    pub fn is_logged_in(&self) -> bool {
        self.context.is_logged_in_at(token::now_epoch_ms())
    }

    /// The cached current user
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.context.current_user()
    }

    /// Message of the last failed login
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Clear the last login error
    pub fn reset_error(&self) {
        self.last_error.write().take();
    }

    /// Fetch the current user when a live session exists.
    ///
    /// Called at startup. An unauthorized answer logs the session out.
    pub async fn restore(&self) -> Result<Option<CurrentUser>, SessionError> {
        if !self.is_logged_in() {
            debug!("No live session to restore");
            return Ok(None);
        }

        let user = self.fetch_current_user().await?;
        info!("Restored session for {}", user.email);
        Ok(Some(user))
    }

    /// The cached user, fetching it when the cache is empty
    pub async fn ensure_current_user(&self) -> Result<CurrentUser, SessionError> {
        match self.context.current_user() {
            Some(user) => Ok(user),
            None => self.fetch_current_user().await,
        }
    }

    async fn fetch_current_user(&self) -> Result<CurrentUser, SessionError> {
        let api = self.api.clone();
        let user = self
            .authorized(|bearer| async move { api.current_user(&bearer).await })
            .await?;
        self.context.set_current_user(user.clone());
        Ok(user)
    }

    /// Run an authenticated call with the stored access token.
    ///
    /// An unauthorized answer triggers `logout` before the error is returned.
    pub async fn authorized<T, F, Fut>(&self, call: F) -> Result<T, SessionError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let bearer = self.context.access_token().ok_or(SessionError::NotLoggedIn)?;

        match call(bearer).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_unauthorized() => {
                warn!("Authenticated call was rejected ({}), logging out", e);
                self.logout().await;
                Err(SessionError::Api(e))
            }
            Err(e) => Err(SessionError::Api(e)),
        }
    }

    // =========================================================================
    // Login / logout
    // =========================================================================

    /// Exchange credentials for a session.
    ///
    /// The token pair is persisted only after the user profile has been
    /// fetched with it, so a failure at any step leaves storage unchanged.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<CurrentUser, SessionError> {
        match self.try_login(credentials).await {
            Ok(user) => {
                self.reset_error();
                info!("Logged in as {}", user.email);
                self.presenter.navigate(Route::Home);
                self.presenter
                    .notify(Notification::success("welcome", "login_success"));
                Ok(user)
            }
            Err(e) => {
                let detail = match &e {
                    SessionError::Api(api_error) => api_error.user_message(INVALID_CREDENTIALS),
                    other => other.to_string(),
                };
                warn!("Login failed: {}", e);
                *self.last_error.write() = Some(detail.clone());
                self.presenter
                    .notify(Notification::error("login_failed", detail));
                Err(e)
            }
        }
    }

    async fn try_login(&self, credentials: &LoginCredentials) -> Result<CurrentUser, SessionError> {
        let token = self.api.login(credentials).await?;
        let user = self.api.current_user(&token.access_token).await?;
        self.context.store_tokens(&token).await?;
        self.context.set_current_user(user.clone());
        Ok(user)
    }

    /// End the session.
    ///
    /// Revocation is best effort: a 401 means the token was already revoked,
    /// other failures are logged. Local state is cleared regardless.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.context.refresh_token() {
            match self.api.revoke(&refresh_token).await {
                Ok(_) => debug!("Refresh token revoked"),
                Err(e) if e.is_unauthorized() => {
                    warn!("Token already revoked or invalid; proceeding with logout.")
                }
                Err(e) => error!("Logout API call failed: {}", e),
            }
        }

        if let Err(e) = self.context.teardown().await {
            error!("Failed to clear stored session: {:#}", e);
        }

        self.presenter.navigate(Route::Login);
        self.presenter
            .notify(Notification::info("logged_out", "logged_out_successfully"));
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// A rejected refresh token means the session is exhausted; it is torn
    /// down and the user is sent to the login view.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let Some(refresh_token) = self.context.refresh_token() else {
            return Err(SessionError::NotLoggedIn);
        };

        match self.api.refresh(&refresh_token).await {
            Ok(token) => {
                self.context.store_tokens(&token).await?;
                debug!("Access token refreshed");
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Refresh token rejected, ending session");
                if let Err(teardown_error) = self.context.teardown().await {
                    error!("Failed to clear stored session: {:#}", teardown_error);
                }
                self.presenter.navigate(Route::Login);
                Err(SessionError::Api(e))
            }
            Err(e) => Err(SessionError::Api(e)),
        }
    }

    /// Store tokens delivered by an OAuth provider callback.
    ///
    /// Both tokens are required; otherwise the user is sent back to the
    /// login view with an error.
    pub async fn accept_oauth_tokens(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<(), SessionError> {
        let (Some(access), Some(refresh)) = (
            access_token.filter(|t| !t.is_empty()),
            refresh_token.filter(|t| !t.is_empty()),
        ) else {
            error!("oauth_tokens_missing_error");
            self.presenter
                .notify(Notification::error("error", "oauth_tokens_missing_error"));
            self.presenter
                .navigate(Route::LoginWithError("missing_tokens".to_string()));
            return Err(SessionError::MissingTokens);
        };

        let token = Token {
            access_token: access.to_string(),
            refresh_token: Some(refresh.to_string()),
            token_type: "bearer".to_string(),
        };
        self.context.store_tokens(&token).await?;
        self.context.invalidate_user();

        self.presenter.navigate(Route::Home);
        self.presenter
            .notify(Notification::success("welcome", "login_success"));
        Ok(())
    }

    /// Login URLs of the OAuth providers; empty when they cannot be fetched
    pub async fn oauth_urls(&self) -> OAuthUrls {
        match self.api.oauth_urls().await {
            Ok(urls) => urls,
            Err(e) => {
                error!("Failed to fetch OAuth URLs: {}", e);
                self.presenter
                    .notify(Notification::error("oauth_error", "oauth_error_message"));
                OAuthUrls::default()
            }
        }
    }

    // =========================================================================
    // Account operations
    // =========================================================================

    /// Register a new account and send the user to the login view
    pub async fn sign_up(&self, registration: &UserRegister) -> Result<CurrentUser, SessionError> {
        match self.api.register(registration).await {
            Ok(user) => {
                info!("Registered account {}", user.email);
                self.presenter.navigate(Route::Login);
                self.presenter.notify(Notification::success(
                    "account_created",
                    "account_created_message",
                ));
                Ok(user)
            }
            Err(e) => {
                warn!("Sign-up failed: {}", e);
                self.presenter.notify(Notification::error(
                    "signup_failed",
                    e.user_message("user_already_exists"),
                ));
                Err(SessionError::Api(e))
            }
        }
    }

    /// Update the logged-in user's profile.
    ///
    /// A new preferred language is persisted locally as well, and the cached
    /// user is replaced by the server's answer.
    pub async fn update_profile(&self, update: &UserUpdateMe) -> Result<CurrentUser, SessionError> {
        let api = self.api.clone();
        let body = update.clone();
        let result = self
            .authorized(|bearer| async move { api.update_current_user(&bearer, &body).await })
            .await;

        match result {
            Ok(user) => {
                if let Some(language) = &update.preferred_language {
                    self.context.set_stored_language(language).await?;
                }
                self.context.invalidate_user();
                self.context.set_current_user(user.clone());
                self.presenter.notify(Notification::success(
                    "success",
                    "user_information_update_success",
                ));
                Ok(user)
            }
            Err(e) => {
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    /// Change the logged-in user's password.
    ///
    /// Accounts created through an OAuth provider have no local password.
    pub async fn change_password(&self, body: &UpdatePassword) -> Result<(), SessionError> {
        let user = self.ensure_current_user().await?;
        if user.auth_provider != LOCAL_AUTH_PROVIDER {
            self.presenter.notify(Notification::error(
                "change_password_heading",
                "change_password_social_error",
            ));
            return Err(SessionError::Unsupported(
                "change_password_social_error".to_string(),
            ));
        }

        let api = self.api.clone();
        let body = body.clone();
        match self
            .authorized(|bearer| async move { api.change_password(&bearer, &body).await })
            .await
        {
            Ok(_) => {
                self.presenter.notify(Notification::success(
                    "change_password_success_title",
                    "change_password_success_message",
                ));
                Ok(())
            }
            Err(e) => {
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    /// Delete the logged-in account, then log out
    pub async fn delete_account(&self) -> Result<(), SessionError> {
        let api = self.api.clone();
        match self
            .authorized(|bearer| async move { api.delete_current_user(&bearer).await })
            .await
        {
            Ok(_) => {
                self.presenter.notify(Notification::success(
                    "delete_account_success_title",
                    "delete_account_success_message",
                ));
                self.logout().await;
                Ok(())
            }
            Err(e) => {
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    /// Request a password recovery email
    pub async fn recover_password(&self, email: &str) -> Result<(), SessionError> {
        match self.api.recover_password(email).await {
            Ok(_) => {
                self.presenter.notify(Notification::success(
                    "recover_email_sent_title",
                    "recover_email_sent_message",
                ));
                Ok(())
            }
            Err(e) => {
                let e = SessionError::Api(e);
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    /// Set a new password with a recovery token.
    ///
    /// The server revokes every session of the account, so local state is
    /// cleared and the user is sent to the login view.
    pub async fn reset_password(&self, body: &NewPassword) -> Result<(), SessionError> {
        match self.api.reset_password(body).await {
            Ok(_) => {
                if let Err(e) = self.context.teardown().await {
                    error!("Failed to clear stored session: {:#}", e);
                }
                self.presenter.notify(Notification::success(
                    "reset_success_title",
                    "reset_success_message",
                ));
                self.presenter.navigate(Route::Login);
                Ok(())
            }
            Err(e) => {
                let e = SessionError::Api(e);
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    /// Report an error to the presenter with its displayable message
    pub fn handle_error(&self, error: &SessionError) {
        self.presenter
            .notify(Notification::error("error", error_message(error)));
    }
}

/// The message a user should see for a session error
///
/// Server detail strings and the first validation message are shown as is;
/// everything else becomes the generic error key.
pub fn error_message(error: &SessionError) -> String {
    match error {
        SessionError::Api(api_error) => api_error.user_message(GENERIC_ERROR_KEY),
        SessionError::MissingTokens => "oauth_tokens_missing_error".to_string(),
        SessionError::Unsupported(key) => key.clone(),
        SessionError::NotLoggedIn | SessionError::Storage(_) => GENERIC_ERROR_KEY.to_string(),
    }
}
