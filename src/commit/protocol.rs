//! Optimistic commit protocol for the outline board.
//!
//! Board mutations apply synchronously; persistence trails behind on two
//! debounced channels. A cross-bucket move touches both: the moved
//! thought's tags go out on a per-thought channel, and the full ordering
//! document goes out on a single structure channel. The two failure
//! modes are deliberately different: a failed thought save keeps the
//! optimistic board (the structure still records the intended order),
//! while a failed structure save restores the pre-drag snapshot, because
//! an ordering the server never accepted must not survive a reload.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{ApiError, SermonApi};
use crate::commit::debounce::{Debouncer, KeyedDebouncer, KeyedSink, Sink};
use crate::model::{Bucket, Containers, TagRegistry, Thought};
use crate::ops::classify::classify;
use crate::ops::outline_ops::{self, OutlineError};
use crate::session::{DragOutcome, DragSession, DropTarget};

struct EditorState {
    board: Containers,
    thoughts: HashMap<String, Thought>,
    session: Option<DragSession>,
}

impl EditorState {
    /// A thought save came back under a different id (the server
    /// assigned a real one). Rewrite every live reference.
    fn rename(&mut self, old: &str, new: &str) {
        if let Some(item) = self.board.item_mut(old) {
            item.id = new.to_string();
        }
        if let Some(thought) = self.thoughts.remove(old) {
            self.thoughts.insert(new.to_string(), thought);
        }
    }
}

/// Drives one sermon's outline: classification on load, drag sessions,
/// and the debounced dual-channel save pipeline.
pub struct OutlineEditor {
    registry: TagRegistry,
    state: Arc<Mutex<EditorState>>,
    thought_saver: KeyedDebouncer<Thought>,
    structure_saver: Debouncer<Containers>,
}

impl OutlineEditor {
    /// Fetch the sermon and the user's tag registry, classify the
    /// thoughts, and wire up the save channels.
    pub async fn load(
        api: Arc<dyn SermonApi>,
        sermon_id: &str,
        user_id: &str,
        thought_window: Duration,
        structure_window: Duration,
    ) -> Result<Self, ApiError> {
        let sermon = api.get_sermon(sermon_id).await?;
        let registry = api.get_tags(user_id).await?;

        let structure = sermon.structure_doc();
        let board = classify(&sermon.thoughts, structure.as_ref(), &registry);
        let thoughts = sermon
            .thoughts
            .iter()
            .map(|t| (t.id.clone(), t.clone()))
            .collect();
        let state = Arc::new(Mutex::new(EditorState {
            board,
            thoughts,
            session: None,
        }));

        let thought_sink: KeyedSink<Thought> = {
            let api = api.clone();
            let state = state.clone();
            let sermon_id = sermon_id.to_string();
            Arc::new(move |key, thought| {
                let api = api.clone();
                let state = state.clone();
                let sermon_id = sermon_id.clone();
                Box::pin(async move {
                    match api.update_thought(&sermon_id, &thought).await {
                        Ok(stored) => {
                            let mut state = state.lock().unwrap();
                            if stored.id != key {
                                state.rename(&key, &stored.id);
                            }
                            state.thoughts.insert(stored.id.clone(), stored);
                        }
                        Err(e) => {
                            // Board keeps the optimistic placement; the
                            // structure save still records the order
                            tracing::error!(thought_id = %key, error = %e, "thought save failed");
                        }
                    }
                })
            })
        };

        // Payload is the rollback snapshot; the document itself is read
        // from the live board at fire time so id renames are picked up
        let structure_sink: Sink<Containers> = {
            let api = api.clone();
            let state = state.clone();
            let sermon_id = sermon_id.to_string();
            Arc::new(move |snapshot| {
                let api = api.clone();
                let state = state.clone();
                let sermon_id = sermon_id.clone();
                Box::pin(async move {
                    let structure = state.lock().unwrap().board.to_structure();
                    if let Err(e) = api.update_structure(&sermon_id, &structure).await {
                        tracing::error!(sermon_id = %sermon_id, error = %e, "structure save failed, restoring board");
                        state.lock().unwrap().board = snapshot;
                    }
                })
            })
        };

        Ok(OutlineEditor {
            registry,
            state,
            thought_saver: KeyedDebouncer::new(thought_window, thought_sink),
            structure_saver: Debouncer::new(structure_window, structure_sink),
        })
    }

    /// Current board state
    pub fn board(&self) -> Containers {
        self.state.lock().unwrap().board.clone()
    }

    pub fn thought(&self, id: &str) -> Option<Thought> {
        self.state.lock().unwrap().thoughts.get(id).cloned()
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Begin a drag. Returns false for unknown ids or when a drag is
    /// already live.
    pub fn drag_start(&self, id: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.session.is_some() {
            return false;
        }
        match DragSession::begin(&state.board, id) {
            Some(session) => {
                state.session = Some(session);
                true
            }
            None => false,
        }
    }

    /// Apply one hover of the live drag
    pub fn drag_over(&self, target: &DropTarget) {
        let mut state = self.state.lock().unwrap();
        if let Some(session) = state.session.take() {
            session.drag_over(&mut state.board, target);
            state.session = Some(session);
        }
    }

    /// Abort the live drag and restore the pre-drag board
    pub fn drag_cancel(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(session) = state.session.take() {
            session.cancel(&mut state.board);
        }
    }

    /// Drop: schedule the saves the net transition calls for
    pub fn drag_end(&self) -> DragOutcome {
        let mut state = self.state.lock().unwrap();
        let Some(session) = state.session.take() else {
            return DragOutcome::Unchanged;
        };
        let active_id = session.active_id().to_string();
        let snapshot = session.snapshot().clone();
        let outcome = session.end(&state.board);
        match outcome {
            DragOutcome::Unchanged => {}
            DragOutcome::Reorder { .. } => {
                drop(state);
                self.structure_saver.call(snapshot);
            }
            DragOutcome::CrossBucket { .. } => {
                let payload = stage_thought(&mut state, &active_id);
                drop(state);
                if let Some(thought) = payload {
                    self.thought_saver.call(&active_id, thought);
                }
                self.structure_saver.call(snapshot);
            }
        }
        outcome
    }

    /// Programmatic cross-bucket move (no drag), same commit path
    pub fn move_thought(&self, id: &str, to: Bucket) -> Result<bool, OutlineError> {
        let mut state = self.state.lock().unwrap();
        let snapshot = state.board.clone();
        if !outline_ops::move_to_bucket(&mut state.board, id, to)? {
            return Ok(false);
        }
        let payload = stage_thought(&mut state, id);
        drop(state);
        if let Some(thought) = payload {
            self.thought_saver.call(id, thought);
        }
        self.structure_saver.call(snapshot);
        Ok(true)
    }

    /// Run every pending save now. Thought saves go first so id renames
    /// land before the ordering document is built.
    pub async fn flush(&self) {
        self.thought_saver.flush().await;
        self.structure_saver.flush().await;
    }

    pub fn has_pending_saves(&self) -> bool {
        self.thought_saver.has_pending() || self.structure_saver.has_pending()
    }
}

/// Fold the item's current bucket back into its thought record and
/// return the save payload
fn stage_thought(state: &mut EditorState, id: &str) -> Option<Thought> {
    let (tags, outline_point_id) = {
        let item = state.board.item(id)?;
        (outline_ops::merged_tags(item), item.outline_point_id.clone())
    };
    let thought = state.thoughts.get_mut(id)?;
    thought.tags = tags;
    thought.outline_point_id = outline_point_id;
    Some(thought.clone())
}
