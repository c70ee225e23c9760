//! Drag session state machine.
//!
//! A session captures where the dragged item started and a snapshot of
//! the whole board, so any number of intermediate hovers collapse into a
//! single net transition at drop time and a failed commit can restore
//! the pre-drag state exactly.

use crate::model::{Bucket, Containers};
use crate::ops::outline_ops;

/// What the pointer is currently over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Another item: insert the dragged item before it
    Item(String),
    /// A bucket body: append the dragged item
    Container(Bucket),
    /// The empty-ambiguous placeholder
    Placeholder,
}

/// The net effect of a completed drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Dropped where it started, same position
    Unchanged,
    /// Same bucket, different position
    Reorder { bucket: Bucket },
    /// Landed in a different bucket than it started in, however many
    /// buckets it visited in between
    CrossBucket { from: Bucket, to: Bucket },
}

#[derive(Debug, Clone)]
pub struct DragSession {
    active_id: String,
    origin: Bucket,
    snapshot: Containers,
}

impl DragSession {
    /// Start dragging `id`. Unknown ids start nothing.
    pub fn begin(containers: &Containers, id: &str) -> Option<DragSession> {
        let origin = containers.bucket_of(id)?;
        Some(DragSession {
            active_id: id.to_string(),
            origin,
            snapshot: containers.clone(),
        })
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn origin(&self) -> Bucket {
        self.origin
    }

    /// The board as it stood when the drag began
    pub fn snapshot(&self) -> &Containers {
        &self.snapshot
    }

    /// Apply one hover. Invalid targets leave the board untouched; the
    /// session stays live either way.
    pub fn drag_over(&self, containers: &mut Containers, target: &DropTarget) {
        let result = match target {
            DropTarget::Item(target_id) => {
                outline_ops::move_before(containers, &self.active_id, target_id)
            }
            DropTarget::Container(bucket) => {
                outline_ops::move_to_bucket(containers, &self.active_id, *bucket)
            }
            DropTarget::Placeholder => {
                outline_ops::move_to_bucket(containers, &self.active_id, Bucket::Ambiguous)
            }
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "ignoring hover over stale target");
        }
    }

    /// Drop: classify the net effect against the origin
    pub fn end(self, containers: &Containers) -> DragOutcome {
        let Some(landed) = containers.bucket_of(&self.active_id) else {
            return DragOutcome::Unchanged;
        };
        if landed != self.origin {
            DragOutcome::CrossBucket {
                from: self.origin,
                to: landed,
            }
        } else if *containers != self.snapshot {
            DragOutcome::Reorder { bucket: landed }
        } else {
            DragOutcome::Unchanged
        }
    }

    /// Abort: restore the board to its pre-drag state
    pub fn cancel(self, containers: &mut Containers) {
        *containers = self.snapshot;
    }
}
