pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{NewSermon, Sermon, Structure, TagRegistry, Thought};

pub use http::HttpSermonApi;

/// API client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("api error {0}: {1}")]
    Api(u16, String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// The REST collaborators the engine depends on. Every save endpoint is
/// an idempotent overwrite keyed by stable ids, never a delta.
#[async_trait]
pub trait SermonApi: Send + Sync {
    async fn get_sermon(&self, id: &str) -> Result<Sermon, ApiError>;

    async fn list_sermons(&self, user_id: &str) -> Result<Vec<Sermon>, ApiError>;

    async fn get_tags(&self, user_id: &str) -> Result<TagRegistry, ApiError>;

    /// Persist a single thought (tags included). Returns the stored record,
    /// whose id may differ from the submitted one for local thoughts.
    async fn update_thought(&self, sermon_id: &str, thought: &Thought)
    -> Result<Thought, ApiError>;

    /// Fully overwrite the sermon's ordering document
    async fn update_structure(&self, sermon_id: &str, structure: &Structure)
    -> Result<(), ApiError>;

    async fn create_sermon(&self, input: &NewSermon) -> Result<Sermon, ApiError>;

    async fn update_sermon(&self, sermon: &Sermon) -> Result<Sermon, ApiError>;

    async fn delete_sermon(&self, id: &str) -> Result<(), ApiError>;

    /// Flip the preached flag of one preach-date record
    async fn update_preach_date_status(
        &self,
        sermon_id: &str,
        date_id: &str,
        preached: bool,
    ) -> Result<(), ApiError>;

    /// Flip the sermon's aggregate preached flag
    async fn set_preached(&self, sermon_id: &str, preached: bool) -> Result<(), ApiError>;
}

// ============================================================================
// Mock API for testing
// ============================================================================
