use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::outline::Bucket;

/// Prefix for ids of records that exist only on this client so far
pub const LOCAL_ID_PREFIX: &str = "local-";

/// A single note/idea belonging to a sermon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    /// Unique id; `local-` prefixed until persisted
    pub id: String,
    /// Free text content
    pub text: String,
    /// Tag names in insertion order (structural tags mixed with custom ones)
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp
    pub date: DateTime<Utc>,
    /// Optional link to an outline point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_point_id: Option<String>,
}

impl Thought {
    /// Create a new local (not yet persisted) thought
    pub fn new_local(text: String) -> Self {
        Thought {
            id: local_id(),
            text,
            tags: Vec::new(),
            date: Utc::now(),
            outline_point_id: None,
        }
    }

    /// True if this thought has not been persisted yet
    pub fn is_local(&self) -> bool {
        self.id.starts_with(LOCAL_ID_PREFIX)
    }

    /// The subset of this thought's tags that are structural tag names,
    /// in the order they appear on the thought
    pub fn structural_tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|t| Bucket::from_structural_tag(t).is_some())
            .map(|t| t.as_str())
            .collect()
    }

    /// The non-structural tag names, in the order they appear
    pub fn custom_tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|t| Bucket::from_structural_tag(t).is_none())
            .map(|t| t.as_str())
            .collect()
    }
}

/// Generate a collision-resistant provisional id: timestamp + random suffix
pub fn local_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}{}-{:06}", LOCAL_ID_PREFIX, Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ids_carry_prefix_and_differ() {
        let a = local_id();
        let b = local_id();
        assert!(a.starts_with(LOCAL_ID_PREFIX));
        assert!(b.starts_with(LOCAL_ID_PREFIX));
        assert_ne!(a, b);
    }

    #[test]
    fn new_local_is_local() {
        let t = Thought::new_local("a point worth making".into());
        assert!(t.is_local());
        assert!(t.tags.is_empty());
    }

    #[test]
    fn structural_and_custom_tags_split() {
        let mut t = Thought::new_local("text".into());
        t.tags = vec![
            "Introduction".into(),
            "grace".into(),
            "Main".into(),
            "covenant".into(),
        ];
        assert_eq!(t.structural_tags(), vec!["Introduction", "Main"]);
        assert_eq!(t.custom_tags(), vec!["grace", "covenant"]);
    }
}
