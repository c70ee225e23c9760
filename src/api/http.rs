//! reqwest-backed implementation of [`SermonApi`]

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::model::{NewSermon, Sermon, Structure, TagRegistry, Thought};

use super::{ApiError, SermonApi};

const USER_AGENT: &str = concat!("homily/", env!("CARGO_PKG_VERSION"));

/// HTTP client against the sermon service
pub struct HttpSermonApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSermonApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpSermonApi {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to our error taxonomy; returns the response for
    /// callers that decode a body
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.as_u16() == 404 {
            let url = response.url().path().to_string();
            return Err(ApiError::NotFound(url));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Api(status.as_u16(), text));
        }
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl SermonApi for HttpSermonApi {
    async fn get_sermon(&self, id: &str) -> Result<Sermon, ApiError> {
        tracing::debug!(sermon_id = %id, "fetching sermon");
        let response = self
            .http
            .get(self.url(&format!("/api/sermons/{id}")))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn list_sermons(&self, user_id: &str) -> Result<Vec<Sermon>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/sermons"))
            .query(&[("userId", user_id)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn get_tags(&self, user_id: &str) -> Result<TagRegistry, ApiError> {
        let response = self
            .http
            .get(self.url("/api/tags"))
            .query(&[("userId", user_id)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn update_thought(
        &self,
        sermon_id: &str,
        thought: &Thought,
    ) -> Result<Thought, ApiError> {
        tracing::debug!(sermon_id = %sermon_id, thought_id = %thought.id, "saving thought");
        let response = self
            .http
            .put(self.url(&format!("/api/sermons/{sermon_id}/thoughts")))
            .json(thought)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn update_structure(
        &self,
        sermon_id: &str,
        structure: &Structure,
    ) -> Result<(), ApiError> {
        tracing::debug!(sermon_id = %sermon_id, "saving structure");
        let response = self
            .http
            .put(self.url(&format!("/api/sermons/{sermon_id}/structure")))
            .json(structure)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }

    async fn create_sermon(&self, input: &NewSermon) -> Result<Sermon, ApiError> {
        let response = self
            .http
            .post(self.url("/api/sermons"))
            .json(input)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn update_sermon(&self, sermon: &Sermon) -> Result<Sermon, ApiError> {
        let response = self
            .http
            .put(self.url(&format!("/api/sermons/{}", sermon.id)))
            .json(sermon)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn delete_sermon(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/sermons/{id}")))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }

    async fn update_preach_date_status(
        &self,
        sermon_id: &str,
        date_id: &str,
        preached: bool,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url(&format!(
                "/api/sermons/{sermon_id}/preach-dates/{date_id}"
            )))
            .json(&json!({ "preached": preached }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }

    async fn set_preached(&self, sermon_id: &str, preached: bool) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url(&format!("/api/sermons/{sermon_id}/preached")))
            .json(&json!({ "preached": preached }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }
}
