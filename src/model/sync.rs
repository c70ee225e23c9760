use serde::{Deserialize, Serialize};

/// Where an in-flight or failed mutation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Error,
}

/// Which mutation produced a sync state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
    PreachStatus,
}

/// Per-entity bookkeeping for optimistic mutations, keyed by sermon id
/// (temporary ids included). Cleared on success, kept with a message on
/// failure until retried or dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub status: SyncStatus,
    pub operation: SyncOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SyncState {
    pub fn pending(operation: SyncOperation) -> Self {
        SyncState {
            status: SyncStatus::Pending,
            operation,
            message: None,
        }
    }

    pub fn error(operation: SyncOperation, message: String) -> Self {
        SyncState {
            status: SyncStatus::Error,
            operation,
            message: Some(message),
        }
    }
}
