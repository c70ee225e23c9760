//! Deterministic assignment of thoughts to outline buckets.
//!
//! With a persisted structure the structure wins: listed ids are placed in
//! structure order and structural tags are rewritten to match, so stored
//! tag drift can never desync from the authoritative ordering. Without a
//! structure, a thought's own tags decide, and anything unresolved lands
//! in the ambiguous bucket.

use std::collections::{HashMap, HashSet};

use crate::model::{Bucket, Containers, Item, Structure, TagRegistry, Thought};

/// Partition the full thought set into the four buckets.
///
/// Guarantee: every input thought id appears in exactly one output
/// sequence, regardless of stale, duplicated or missing structure ids.
pub fn classify(
    thoughts: &[Thought],
    structure: Option<&Structure>,
    registry: &TagRegistry,
) -> Containers {
    let mut containers = Containers::default();
    let by_id: HashMap<&str, &Thought> =
        thoughts.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut used: HashSet<&str> = HashSet::new();

    if let Some(structure) = structure {
        for bucket in Bucket::ALL {
            for id in structure.ids(bucket) {
                // Duplicates across buckets keep their first placement
                if used.contains(id.as_str()) {
                    continue;
                }
                let Some(thought) = by_id.get(id.as_str()) else {
                    // Stale id: structure outlived the thought
                    tracing::debug!(thought_id = %id, "structure lists unknown thought, skipping");
                    continue;
                };
                let mut item = item_from_thought(thought, registry);
                item.set_bucket(bucket);
                containers.bucket_mut(bucket).push(item);
                used.insert(id.as_str());
            }
        }
    } else {
        for thought in thoughts {
            let structural = thought.structural_tags();
            let bucket = if structural.len() == 1 {
                // Exactly one structural tag decides the bucket
                Bucket::from_structural_tag(structural[0]).unwrap_or(Bucket::Ambiguous)
            } else {
                Bucket::Ambiguous
            };
            let mut item = item_from_thought(thought, registry);
            item.set_bucket(bucket);
            containers.bucket_mut(bucket).push(item);
            used.insert(thought.id.as_str());
        }
    }

    // Thoughts the structure never mentioned (created after the last save,
    // or dropped from a stale document) are appended to ambiguous
    for thought in thoughts {
        if !used.contains(thought.id.as_str()) {
            let mut item = item_from_thought(thought, registry);
            item.set_bucket(Bucket::Ambiguous);
            containers.ambiguous.push(item);
        }
    }

    containers
}

/// Build the drag-facing projection of a thought, resolving custom tag
/// colors against the registry
fn item_from_thought(thought: &Thought, registry: &TagRegistry) -> Item {
    let custom_tags = thought
        .custom_tags()
        .into_iter()
        .map(|name| registry.badge(name))
        .collect();
    Item {
        id: thought.id.clone(),
        content: thought.text.clone(),
        required_tags: thought
            .structural_tags()
            .into_iter()
            .map(String::from)
            .collect(),
        custom_tags,
        outline_point_id: thought.outline_point_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_TAG_COLOR, TagDef};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn thought(id: &str, tags: &[&str]) -> Thought {
        Thought {
            id: id.into(),
            text: format!("text of {id}"),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            date: Utc::now(),
            outline_point_id: None,
        }
    }

    fn registry() -> TagRegistry {
        TagRegistry {
            required_tags: vec![
                TagDef { name: "Introduction".into(), color: "#2563eb".into() },
                TagDef { name: "Main".into(), color: "#7c3aed".into() },
                TagDef { name: "Conclusion".into(), color: "#059669".into() },
            ],
            custom_tags: vec![TagDef { name: "grace".into(), color: "#f59e0b".into() }],
        }
    }

    fn all_ids(c: &Containers) -> Vec<String> {
        let mut ids = Vec::new();
        for b in Bucket::ALL {
            ids.extend(c.ids(b));
        }
        ids
    }

    // --- Tag fallback path ---

    #[test]
    fn single_structural_tag_places_in_bucket() {
        let thoughts = vec![
            thought("t1", &["Introduction"]),
            thought("t2", &["Main"]),
            thought("t3", &["Conclusion"]),
        ];
        let c = classify(&thoughts, None, &registry());
        assert_eq!(c.ids(Bucket::Introduction), vec!["t1"]);
        assert_eq!(c.ids(Bucket::Main), vec!["t2"]);
        assert_eq!(c.ids(Bucket::Conclusion), vec!["t3"]);
        assert!(c.ambiguous.is_empty());
    }

    #[test]
    fn zero_or_multiple_structural_tags_go_ambiguous() {
        let thoughts = vec![
            thought("t1", &[]),
            thought("t2", &["Introduction", "Main"]),
            thought("t3", &["grace"]),
        ];
        let c = classify(&thoughts, None, &registry());
        assert_eq!(c.ids(Bucket::Ambiguous), vec!["t1", "t2", "t3"]);
        // Ambiguous items never carry a structural tag
        for item in &c.ambiguous {
            assert!(item.required_tags.is_empty());
        }
    }

    // --- Structure path ---

    #[test]
    fn structure_order_wins_over_tags() {
        // t1 is tagged Conclusion but the structure says introduction;
        // the structure is authoritative and the tag is rewritten
        let thoughts = vec![thought("t1", &["Conclusion"]), thought("t2", &["Main"])];
        let structure = Structure {
            introduction: vec!["t1".into()],
            main: vec!["t2".into()],
            ..Default::default()
        };
        let c = classify(&thoughts, Some(&structure), &registry());
        assert_eq!(c.ids(Bucket::Introduction), vec!["t1"]);
        assert_eq!(
            c.introduction[0].required_tags,
            vec!["Introduction".to_string()]
        );
    }

    #[test]
    fn structure_preserves_in_bucket_order() {
        let thoughts = vec![
            thought("t1", &[]),
            thought("t2", &[]),
            thought("t3", &[]),
        ];
        let structure = Structure {
            main: vec!["t3".into(), "t1".into(), "t2".into()],
            ..Default::default()
        };
        let c = classify(&thoughts, Some(&structure), &registry());
        assert_eq!(c.ids(Bucket::Main), vec!["t3", "t1", "t2"]);
    }

    // --- Partition invariant ---

    #[test]
    fn partition_with_omitted_stale_and_duplicate_ids() {
        let thoughts = vec![
            thought("t1", &["Introduction"]),
            thought("t2", &[]),
            thought("t3", &["grace"]),
        ];
        // t1 listed twice across buckets, "ghost" never existed,
        // t2 and t3 omitted entirely
        let structure = Structure {
            introduction: vec!["t1".into()],
            conclusion: vec!["t1".into(), "ghost".into()],
            ..Default::default()
        };
        let c = classify(&thoughts, Some(&structure), &registry());

        let mut ids = all_ids(&c);
        ids.sort();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
        // First placement wins for the duplicate
        assert_eq!(c.ids(Bucket::Introduction), vec!["t1"]);
        assert!(c.conclusion.is_empty());
        // Omitted thoughts appended to ambiguous in input order
        assert_eq!(c.ids(Bucket::Ambiguous), vec!["t2", "t3"]);
    }

    #[test]
    fn partition_holds_without_structure() {
        let thoughts: Vec<Thought> = (0..10)
            .map(|i| {
                let tags: &[&str] = match i % 4 {
                    0 => &["Introduction"],
                    1 => &["Main"],
                    2 => &["Conclusion", "Main"],
                    _ => &[],
                };
                thought(&format!("t{i}"), tags)
            })
            .collect();
        let c = classify(&thoughts, None, &registry());
        assert_eq!(c.total_len(), 10);
        let mut ids = all_ids(&c);
        ids.sort();
        let mut expected: Vec<String> = (0..10).map(|i| format!("t{i}")).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    // --- Tag enrichment ---

    #[test]
    fn custom_tags_get_registry_colors() {
        let thoughts = vec![thought("t1", &["Main", "grace", "mystery"])];
        let c = classify(&thoughts, None, &registry());
        let item = &c.main[0];
        assert_eq!(item.custom_tags.len(), 2);
        assert_eq!(item.custom_tags[0].name, "grace");
        assert_eq!(item.custom_tags[0].color, "#f59e0b");
        // Unknown tag falls back to the default color
        assert_eq!(item.custom_tags[1].name, "mystery");
        assert_eq!(item.custom_tags[1].color, DEFAULT_TAG_COLOR);
    }

    #[test]
    fn empty_inputs() {
        let c = classify(&[], None, &registry());
        assert_eq!(c.total_len(), 0);
        let c = classify(&[], Some(&Structure::default()), &registry());
        assert_eq!(c.total_len(), 0);
    }
}
