//! Optimistic sermon collection cache.
//!
//! Mutations apply to the in-memory collection immediately and sync to
//! the server in the background. Creates use a provisional `local-` id
//! that is swapped for the server id in place, so list position is
//! stable across the confirmation. Deletes are the one exception: the
//! record stays visible until the server confirms, because resurrecting
//! a deleted row is worse than a short delay. Failures leave a per-id
//! sync record behind with enough captured state to retry or dismiss.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use tokio::task::JoinHandle;

use crate::api::SermonApi;
use crate::model::thought::local_id;
use crate::model::{NewSermon, Sermon, SyncOperation, SyncState};

/// A failed mutation, captured as data so it can be re-dispatched
#[derive(Debug, Clone)]
enum RetryOp {
    Create(NewSermon),
    Update(Sermon),
    Delete(String),
    PreachStatus {
        date_id: String,
        preached: bool,
    },
}

struct SyncEntry {
    state: SyncState,
    retry: Option<RetryOp>,
}

struct CacheInner {
    api: Arc<dyn SermonApi>,
    entries: Mutex<IndexMap<String, Sermon>>,
    sync: Mutex<HashMap<String, SyncEntry>>,
}

impl CacheInner {
    fn set_pending(&self, id: &str, operation: SyncOperation) {
        self.sync.lock().unwrap().insert(
            id.to_string(),
            SyncEntry {
                state: SyncState::pending(operation),
                retry: None,
            },
        );
    }

    fn set_error(&self, id: &str, operation: SyncOperation, message: String, retry: RetryOp) {
        self.sync.lock().unwrap().insert(
            id.to_string(),
            SyncEntry {
                state: SyncState::error(operation, message),
                retry: Some(retry),
            },
        );
    }

    fn clear_sync(&self, id: &str) {
        self.sync.lock().unwrap().remove(id);
    }

    /// Swap a provisional key for the confirmed record without moving
    /// the entry's position in the collection
    fn confirm_create(&self, temp_id: &str, stored: Sermon) {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_index_of(temp_id) {
            Some(index) => {
                entries.shift_remove(temp_id);
                entries.shift_insert(index, stored.id.clone(), stored);
            }
            None => {
                // Dismissed while in flight; keep the confirmed record
                entries.insert(stored.id.clone(), stored);
            }
        }
    }
}

/// Shared handle to the cached sermon collection
#[derive(Clone)]
pub struct SermonCache {
    inner: Arc<CacheInner>,
}

impl SermonCache {
    pub fn new(api: Arc<dyn SermonApi>) -> Self {
        SermonCache {
            inner: Arc::new(CacheInner {
                api,
                entries: Mutex::new(IndexMap::new()),
                sync: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Replace the collection with the server's view
    pub async fn refresh(&self, user_id: &str) -> crate::Result<()> {
        let sermons = self.inner.api.list_sermons(user_id).await?;
        let mut entries = self.inner.entries.lock().unwrap();
        entries.clear();
        for sermon in sermons {
            entries.insert(sermon.id.clone(), sermon);
        }
        Ok(())
    }

    /// The collection in display order
    pub fn sermons(&self) -> Vec<Sermon> {
        self.inner.entries.lock().unwrap().values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<Sermon> {
        self.inner.entries.lock().unwrap().get(id).cloned()
    }

    pub fn sync_state(&self, id: &str) -> Option<SyncState> {
        self.inner.sync.lock().unwrap().get(id).map(|e| e.state.clone())
    }

    /// Insert a provisional record and create it on the server. Returns
    /// the provisional id; the returned handle resolves when the server
    /// round-trip finishes.
    pub fn create(&self, input: NewSermon) -> (String, JoinHandle<()>) {
        let temp_id = local_id();
        let handle = self.create_as(temp_id.clone(), input);
        (temp_id, handle)
    }

    fn create_as(&self, temp_id: String, input: NewSermon) -> JoinHandle<()> {
        {
            let mut entries = self.inner.entries.lock().unwrap();
            // Present already when this is a retry
            entries
                .entry(temp_id.clone())
                .or_insert_with(|| input.clone().into_sermon(temp_id.clone()));
        }
        self.inner.set_pending(&temp_id, SyncOperation::Create);

        let inner = self.inner.clone();
        tokio::spawn(async move {
            match inner.api.create_sermon(&input).await {
                Ok(stored) => {
                    tracing::debug!(temp_id = %temp_id, id = %stored.id, "sermon create confirmed");
                    inner.confirm_create(&temp_id, stored);
                    inner.clear_sync(&temp_id);
                }
                Err(e) => {
                    tracing::error!(temp_id = %temp_id, error = %e, "sermon create failed");
                    inner.set_error(
                        &temp_id,
                        SyncOperation::Create,
                        e.to_string(),
                        RetryOp::Create(input),
                    );
                }
            }
        })
    }

    /// Overwrite a sermon optimistically. Returns None while an earlier
    /// mutation of the same sermon is still pending.
    pub fn update(&self, sermon: Sermon) -> Option<JoinHandle<()>> {
        let id = sermon.id.clone();
        if self.is_pending(&id) {
            tracing::warn!(sermon_id = %id, "dropping update while an earlier sync is pending");
            return None;
        }
        let previous = self.inner.entries.lock().unwrap().insert(id.clone(), sermon.clone());
        self.inner.set_pending(&id, SyncOperation::Update);

        let inner = self.inner.clone();
        Some(tokio::spawn(async move {
            match inner.api.update_sermon(&sermon).await {
                Ok(stored) => {
                    inner.entries.lock().unwrap().insert(id.clone(), stored);
                    inner.clear_sync(&id);
                }
                Err(e) => {
                    tracing::error!(sermon_id = %id, error = %e, "sermon update failed, rolling back");
                    {
                        let mut entries = inner.entries.lock().unwrap();
                        match previous {
                            Some(previous) => {
                                entries.insert(id.clone(), previous);
                            }
                            None => {
                                entries.shift_remove(&id);
                            }
                        }
                    }
                    inner.set_error(&id, SyncOperation::Update, e.to_string(), RetryOp::Update(sermon));
                }
            }
        }))
    }

    /// Delete on the server first; the record leaves the collection only
    /// on confirmation.
    pub fn delete(&self, id: &str) -> Option<JoinHandle<()>> {
        if self.is_pending(id) {
            tracing::warn!(sermon_id = %id, "dropping delete while an earlier sync is pending");
            return None;
        }
        self.inner.set_pending(id, SyncOperation::Delete);

        let id = id.to_string();
        let inner = self.inner.clone();
        Some(tokio::spawn(async move {
            match inner.api.delete_sermon(&id).await {
                Ok(()) => {
                    inner.entries.lock().unwrap().shift_remove(&id);
                    inner.clear_sync(&id);
                }
                Err(e) => {
                    tracing::error!(sermon_id = %id, error = %e, "sermon delete failed");
                    inner.set_error(
                        &id,
                        SyncOperation::Delete,
                        e.to_string(),
                        RetryOp::Delete(id.clone()),
                    );
                }
            }
        }))
    }

    /// Flip one preach date and the derived aggregate flag together.
    /// Both fields roll back together if either server call fails.
    pub fn toggle_preached(
        &self,
        sermon_id: &str,
        date_id: &str,
        preached: bool,
    ) -> Option<JoinHandle<()>> {
        if self.is_pending(sermon_id) {
            tracing::warn!(sermon_id = %sermon_id, "dropping preach toggle while an earlier sync is pending");
            return None;
        }
        let previous = {
            let mut entries = self.inner.entries.lock().unwrap();
            let sermon = entries.get_mut(sermon_id)?;
            let previous = sermon.clone();
            let date = sermon.preach_dates.iter_mut().find(|d| d.id == date_id)?;
            date.preached = preached;
            sermon.is_preached = sermon.preach_dates.iter().any(|d| d.preached);
            previous
        };
        self.inner.set_pending(sermon_id, SyncOperation::PreachStatus);

        let sermon_id = sermon_id.to_string();
        let date_id = date_id.to_string();
        let inner = self.inner.clone();
        Some(tokio::spawn(async move {
            let aggregate = inner
                .entries
                .lock()
                .unwrap()
                .get(&sermon_id)
                .map(|s| s.is_preached)
                .unwrap_or(preached);
            let result = async {
                inner
                    .api
                    .update_preach_date_status(&sermon_id, &date_id, preached)
                    .await?;
                inner.api.set_preached(&sermon_id, aggregate).await
            }
            .await;
            match result {
                Ok(()) => inner.clear_sync(&sermon_id),
                Err(e) => {
                    tracing::error!(sermon_id = %sermon_id, error = %e, "preach toggle failed, rolling back");
                    inner.entries.lock().unwrap().insert(sermon_id.clone(), previous);
                    inner.set_error(
                        &sermon_id,
                        SyncOperation::PreachStatus,
                        e.to_string(),
                        RetryOp::PreachStatus { date_id, preached },
                    );
                }
            }
        }))
    }

    /// Re-dispatch the failed mutation recorded for this id
    pub fn retry(&self, id: &str) -> Option<JoinHandle<()>> {
        let retry = {
            let mut sync = self.inner.sync.lock().unwrap();
            let entry = sync.get_mut(id)?;
            entry.retry.take()?
        };
        match retry {
            RetryOp::Create(input) => Some(self.create_as(id.to_string(), input)),
            RetryOp::Update(sermon) => {
                self.inner.clear_sync(id);
                self.update(sermon)
            }
            RetryOp::Delete(id) => {
                self.inner.clear_sync(&id);
                self.delete(&id)
            }
            RetryOp::PreachStatus { date_id, preached } => {
                self.inner.clear_sync(id);
                self.toggle_preached(id, &date_id, preached)
            }
        }
    }

    /// Drop the sync record for this id. A dismissed failed create also
    /// removes its provisional record, since it never existed remotely.
    pub fn dismiss_sync_error(&self, id: &str) {
        let entry = self.inner.sync.lock().unwrap().remove(id);
        if let Some(entry) = entry {
            if entry.state.operation == SyncOperation::Create {
                self.inner.entries.lock().unwrap().shift_remove(id);
            }
        }
    }

    fn is_pending(&self, id: &str) -> bool {
        self.inner
            .sync
            .lock()
            .unwrap()
            .get(id)
            .is_some_and(|e| e.state.status == crate::model::SyncStatus::Pending)
    }
}
