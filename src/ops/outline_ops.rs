//! Pure container mutations used by the drag session and the CLI.
//!
//! All functions keep the partition invariant: an item is removed from
//! its current bucket before it is inserted anywhere else, and the
//! structural tags on the item are rewritten whenever its bucket changes.

use thiserror::Error;

use crate::model::{Bucket, Containers, Item};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutlineError {
    #[error("unknown thought: {0}")]
    UnknownThought(String),
}

/// Move an item to the end of `to`, rewriting its structural tags.
/// Returns false when the item is already in that bucket.
pub fn move_to_bucket(
    containers: &mut Containers,
    id: &str,
    to: Bucket,
) -> Result<bool, OutlineError> {
    let from = containers
        .bucket_of(id)
        .ok_or_else(|| OutlineError::UnknownThought(id.to_string()))?;
    if from == to {
        return Ok(false);
    }
    let mut item = take(containers, from, id);
    cross_bucket(&mut item, to);
    containers.bucket_mut(to).push(item);
    Ok(true)
}

/// Move an item so it sits immediately before `target_id`, crossing
/// buckets when the target lives elsewhere. Returns false when nothing
/// changed (self-target, or already in position).
pub fn move_before(
    containers: &mut Containers,
    id: &str,
    target_id: &str,
) -> Result<bool, OutlineError> {
    if id == target_id {
        return Ok(false);
    }
    let from = containers
        .bucket_of(id)
        .ok_or_else(|| OutlineError::UnknownThought(id.to_string()))?;
    let to = containers
        .bucket_of(target_id)
        .ok_or_else(|| OutlineError::UnknownThought(target_id.to_string()))?;

    if from == to {
        let items = containers.bucket(from);
        let item_pos = items.iter().position(|i| i.id == id).unwrap_or_default();
        let target_pos = items
            .iter()
            .position(|i| i.id == target_id)
            .unwrap_or_default();
        // Already immediately before the target
        if target_pos == item_pos + 1 {
            return Ok(false);
        }
    }

    let mut item = take(containers, from, id);
    if from != to {
        cross_bucket(&mut item, to);
    }
    let dest = containers.bucket_mut(to);
    // Index computed after removal so same-bucket moves land correctly
    let index = dest
        .iter()
        .position(|i| i.id == target_id)
        .unwrap_or(dest.len());
    dest.insert(index, item);
    Ok(true)
}

/// The tag list to persist for an item: structural first, then custom
pub fn merged_tags(item: &Item) -> Vec<String> {
    item.required_tags
        .iter()
        .cloned()
        .chain(item.custom_tags.iter().map(|b| b.name.clone()))
        .collect()
}

fn take(containers: &mut Containers, bucket: Bucket, id: &str) -> Item {
    let items = containers.bucket_mut(bucket);
    let pos = items
        .iter()
        .position(|i| i.id == id)
        .unwrap_or_default();
    items.remove(pos)
}

/// Bucket membership changed: rewrite structural tags and drop the
/// outline-point link, which only means something inside its old bucket
fn cross_bucket(item: &mut Item, to: Bucket) {
    item.set_bucket(to);
    item.outline_point_id = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TagBadge;
    use pretty_assertions::assert_eq;

    fn item(id: &str) -> Item {
        Item {
            id: id.into(),
            content: format!("content of {id}"),
            required_tags: Vec::new(),
            custom_tags: Vec::new(),
            outline_point_id: None,
        }
    }

    fn board() -> Containers {
        let mut c = Containers::default();
        for id in ["i1", "i2"] {
            let mut it = item(id);
            it.set_bucket(Bucket::Introduction);
            c.introduction.push(it);
        }
        for id in ["m1", "m2", "m3"] {
            let mut it = item(id);
            it.set_bucket(Bucket::Main);
            c.main.push(it);
        }
        c.ambiguous.push(item("a1"));
        c
    }

    #[test]
    fn move_to_bucket_appends_and_retags() {
        let mut c = board();
        assert_eq!(move_to_bucket(&mut c, "a1", Bucket::Main), Ok(true));
        assert_eq!(c.ids(Bucket::Main), vec!["m1", "m2", "m3", "a1"]);
        assert!(c.ambiguous.is_empty());
        assert_eq!(
            c.item("a1").unwrap().required_tags,
            vec!["Main".to_string()]
        );
    }

    #[test]
    fn move_to_same_bucket_is_noop() {
        let mut c = board();
        assert_eq!(move_to_bucket(&mut c, "m2", Bucket::Main), Ok(false));
        assert_eq!(c.ids(Bucket::Main), vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn move_unknown_id_errors() {
        let mut c = board();
        assert_eq!(
            move_to_bucket(&mut c, "nope", Bucket::Main),
            Err(OutlineError::UnknownThought("nope".into()))
        );
    }

    #[test]
    fn cross_bucket_clears_outline_point() {
        let mut c = board();
        c.item_mut("i1").unwrap().outline_point_id = Some("op-1".into());
        move_to_bucket(&mut c, "i1", Bucket::Conclusion).unwrap();
        assert_eq!(c.item("i1").unwrap().outline_point_id, None);
    }

    #[test]
    fn move_before_reorders_within_bucket() {
        let mut c = board();
        assert_eq!(move_before(&mut c, "m3", "m1"), Ok(true));
        assert_eq!(c.ids(Bucket::Main), vec!["m3", "m1", "m2"]);
        // Moving later in the same bucket also lands before the target
        assert_eq!(move_before(&mut c, "m3", "m2"), Ok(true));
        assert_eq!(c.ids(Bucket::Main), vec!["m1", "m3", "m2"]);
    }

    #[test]
    fn move_before_crosses_buckets_at_target_position() {
        let mut c = board();
        assert_eq!(move_before(&mut c, "i1", "m2"), Ok(true));
        assert_eq!(c.ids(Bucket::Introduction), vec!["i2"]);
        assert_eq!(c.ids(Bucket::Main), vec!["m1", "i1", "m2", "m3"]);
        assert_eq!(
            c.item("i1").unwrap().required_tags,
            vec!["Main".to_string()]
        );
    }

    #[test]
    fn move_before_self_is_noop() {
        let mut c = board();
        assert_eq!(move_before(&mut c, "m1", "m1"), Ok(false));
        // Already directly before the target
        assert_eq!(move_before(&mut c, "m1", "m2"), Ok(false));
        assert_eq!(c.ids(Bucket::Main), vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn merged_tags_orders_structural_first() {
        let mut it = item("t1");
        it.set_bucket(Bucket::Conclusion);
        it.custom_tags.push(TagBadge {
            name: "grace".into(),
            color: "#f59e0b".into(),
        });
        assert_eq!(
            merged_tags(&it),
            vec!["Conclusion".to_string(), "grace".to_string()]
        );
    }
}
