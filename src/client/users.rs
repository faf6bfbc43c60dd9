use async_trait::async_trait;
use reqwest::Method;
use uuid::Uuid;

use super::http::{ApiClient, Body};
use super::models::*;
use super::UsersApi;
use crate::errors::ApiError;

#[async_trait]
impl UsersApi for ApiClient {
    async fn list_users(
        &self,
        bearer: &str,
        skip: u32,
        limit: u32,
    ) -> Result<UsersPublic, ApiError> {
        let query = [("skip", skip.to_string()), ("limit", limit.to_string())];
        self.request(Method::GET, &["admin", "users"], &query, Some(bearer), Body::<()>::None)
            .await
    }

    async fn get_user(&self, bearer: &str, id: Uuid) -> Result<UserPublic, ApiError> {
        let id = id.to_string();
        self.request(
            Method::GET,
            &["admin", "users", "detail", &id],
            &[],
            Some(bearer),
            Body::<()>::None,
        )
        .await
    }

    async fn create_user(&self, bearer: &str, user: &UserCreate) -> Result<UserPublic, ApiError> {
        self.request(Method::POST, &["admin", "users"], &[], Some(bearer), Body::Json(user))
            .await
    }

    async fn update_user(
        &self,
        bearer: &str,
        id: Uuid,
        update: &UserUpdate,
    ) -> Result<UserPublic, ApiError> {
        let id = id.to_string();
        self.request(Method::PATCH, &["admin", "users", &id], &[], Some(bearer), Body::Json(update))
            .await
    }

    async fn delete_user(&self, bearer: &str, id: Uuid) -> Result<Message, ApiError> {
        let id = id.to_string();
        self.request(Method::DELETE, &["admin", "users", &id], &[], Some(bearer), Body::<()>::None)
            .await
    }
}
