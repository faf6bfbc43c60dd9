use async_trait::async_trait;
use reqwest::Method;

use super::http::{ApiClient, Body};
use super::models::*;
use super::AuthApi;
use crate::errors::ApiError;

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Token, ApiError> {
        self.request(Method::POST, &["auth", "login"], &[], None, Body::Form(credentials))
            .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Token, ApiError> {
        let body = TokenRefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.request(Method::POST, &["auth", "token", "refresh"], &[], None, Body::Json(&body))
            .await
    }

    async fn revoke(&self, refresh_token: &str) -> Result<Message, ApiError> {
        let body = TokenRefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.request(Method::POST, &["auth", "token", "revoke"], &[], None, Body::Json(&body))
            .await
    }

    async fn register(&self, registration: &UserRegister) -> Result<UserPublic, ApiError> {
        self.request(Method::POST, &["auth", "register"], &[], None, Body::Json(registration))
            .await
    }

    async fn current_user(&self, bearer: &str) -> Result<UserPublic, ApiError> {
        self.request(Method::GET, &["auth", "profile"], &[], Some(bearer), Body::<()>::None)
            .await
    }

    async fn update_current_user(
        &self,
        bearer: &str,
        update: &UserUpdateMe,
    ) -> Result<UserPublic, ApiError> {
        self.request(Method::PATCH, &["users", "me"], &[], Some(bearer), Body::Json(update))
            .await
    }

    async fn change_password(
        &self,
        bearer: &str,
        body: &UpdatePassword,
    ) -> Result<Message, ApiError> {
        self.request(
            Method::PATCH,
            &["auth", "password", "update"],
            &[],
            Some(bearer),
            Body::Json(body),
        )
        .await
    }

    async fn delete_current_user(&self, bearer: &str) -> Result<Message, ApiError> {
        self.request(
            Method::DELETE,
            &["auth", "profile", "delete"],
            &[],
            Some(bearer),
            Body::<()>::None,
        )
        .await
    }

    async fn recover_password(&self, email: &str) -> Result<Message, ApiError> {
        self.request(
            Method::POST,
            &["auth", "password", "recover", email],
            &[],
            None,
            Body::<()>::None,
        )
        .await
    }

    async fn reset_password(&self, body: &NewPassword) -> Result<Message, ApiError> {
        self.request(Method::POST, &["auth", "password", "reset"], &[], None, Body::Json(body))
            .await
    }

    async fn oauth_urls(&self) -> Result<OAuthUrls, ApiError> {
        self.request(Method::GET, &["oauth", "urls"], &[], None, Body::<()>::None)
            .await
    }
}
