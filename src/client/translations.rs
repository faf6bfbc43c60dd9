use async_trait::async_trait;
use reqwest::Method;
use uuid::Uuid;

use super::http::{ApiClient, Body};
use super::models::*;
use super::TranslationsApi;
use crate::errors::ApiError;

#[async_trait]
impl TranslationsApi for ApiClient {
    async fn get_translations(&self, language: &str) -> Result<Vec<TranslationItem>, ApiError> {
        self.request(Method::GET, &["languages", language], &[], None, Body::<()>::None)
            .await
    }

    async fn get_translation(
        &self,
        language: &str,
        key: &str,
    ) -> Result<TranslationPublic, ApiError> {
        self.request(Method::GET, &["languages", language, key], &[], None, Body::<()>::None)
            .await
    }

    async fn get_bulk_translations(
        &self,
        bearer: &str,
        languages: &[String],
    ) -> Result<BulkTranslations, ApiError> {
        let query: Vec<(&str, String)> = languages
            .iter()
            .map(|language| ("languages", language.clone()))
            .collect();
        self.request(
            Method::GET,
            &["languages", "translations", "bulk", ""],
            &query,
            Some(bearer),
            Body::<()>::None,
        )
        .await
    }

    async fn create_translation(
        &self,
        bearer: &str,
        translation: &TranslationCreate,
    ) -> Result<TranslationResponse, ApiError> {
        self.request(Method::POST, &["languages", ""], &[], Some(bearer), Body::Json(translation))
            .await
    }

    async fn update_translation(
        &self,
        bearer: &str,
        id: Uuid,
        update: &TranslationUpdate,
    ) -> Result<TranslationResponse, ApiError> {
        let id = id.to_string();
        self.request(Method::PUT, &["languages", &id], &[], Some(bearer), Body::Json(update))
            .await
    }

    async fn delete_translation(&self, bearer: &str, id: Uuid) -> Result<Message, ApiError> {
        let id = id.to_string();
        self.request(Method::DELETE, &["languages", &id], &[], Some(bearer), Body::<()>::None)
            .await
    }

    async fn bulk_insert_translations(
        &self,
        bearer: &str,
        translations: &[TranslationCreate],
    ) -> Result<Message, ApiError> {
        self.request(
            Method::POST,
            &["languages", "bulk", ""],
            &[],
            Some(bearer),
            Body::Json(translations),
        )
        .await
    }
}
