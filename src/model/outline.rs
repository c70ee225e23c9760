use serde::{Deserialize, Serialize};

use super::tags::TagBadge;

/// One of the four named groups a thought can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Introduction,
    Main,
    Conclusion,
    Ambiguous,
}

impl Bucket {
    /// Fixed iteration order used everywhere buckets are walked
    pub const ALL: [Bucket; 4] = [
        Bucket::Introduction,
        Bucket::Main,
        Bucket::Conclusion,
        Bucket::Ambiguous,
    ];

    /// The structural tag name corresponding to this bucket.
    /// `Ambiguous` has no structural tag.
    pub fn structural_tag(self) -> Option<&'static str> {
        match self {
            Bucket::Introduction => Some("Introduction"),
            Bucket::Main => Some("Main"),
            Bucket::Conclusion => Some("Conclusion"),
            Bucket::Ambiguous => None,
        }
    }

    /// Resolve a structural tag name back to its bucket
    pub fn from_structural_tag(name: &str) -> Option<Bucket> {
        match name {
            "Introduction" => Some(Bucket::Introduction),
            "Main" => Some(Bucket::Main),
            "Conclusion" => Some(Bucket::Conclusion),
            _ => None,
        }
    }

    /// The key used for this bucket in the persisted structure document
    pub fn key(self) -> &'static str {
        match self {
            Bucket::Introduction => "introduction",
            Bucket::Main => "main",
            Bucket::Conclusion => "conclusion",
            Bucket::Ambiguous => "ambiguous",
        }
    }

    /// Resolve a structure-document key back to its bucket
    pub fn from_key(key: &str) -> Option<Bucket> {
        match key {
            "introduction" => Some(Bucket::Introduction),
            "main" => Some(Bucket::Main),
            "conclusion" => Some(Bucket::Conclusion),
            "ambiguous" => Some(Bucket::Ambiguous),
            _ => None,
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bucket::Introduction => write!(f, "Introduction"),
            Bucket::Main => write!(f, "Main"),
            Bucket::Conclusion => write!(f, "Conclusion"),
            Bucket::Ambiguous => write!(f, "Ambiguous"),
        }
    }
}

/// The drag-facing projection of a thought
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Mirrors the thought id (`local-` prefixed for unpersisted thoughts)
    pub id: String,
    /// Display text
    pub content: String,
    /// Structural tag names currently applied (0 or 1 in steady state).
    /// Invariant: matches the bucket the item occupies, empty in `Ambiguous`.
    pub required_tags: Vec<String>,
    /// Non-structural tags with their display colors
    pub custom_tags: Vec<TagBadge>,
    /// Optional link to an outline point within the item's bucket
    pub outline_point_id: Option<String>,
}

impl Item {
    /// Rewrite `required_tags` to reflect the given bucket
    pub fn set_bucket(&mut self, bucket: Bucket) {
        self.required_tags = bucket
            .structural_tag()
            .map(|t| t.to_string())
            .into_iter()
            .collect();
    }
}

/// The four ordered bucket sequences.
/// Invariant: every thought of the sermon appears in exactly one sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Containers {
    pub introduction: Vec<Item>,
    pub main: Vec<Item>,
    pub conclusion: Vec<Item>,
    pub ambiguous: Vec<Item>,
}

impl Containers {
    /// Items of one bucket
    pub fn bucket(&self, bucket: Bucket) -> &[Item] {
        match bucket {
            Bucket::Introduction => &self.introduction,
            Bucket::Main => &self.main,
            Bucket::Conclusion => &self.conclusion,
            Bucket::Ambiguous => &self.ambiguous,
        }
    }

    /// Mutable items of one bucket
    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<Item> {
        match bucket {
            Bucket::Introduction => &mut self.introduction,
            Bucket::Main => &mut self.main,
            Bucket::Conclusion => &mut self.conclusion,
            Bucket::Ambiguous => &mut self.ambiguous,
        }
    }

    /// Which bucket currently holds the item with this id
    pub fn bucket_of(&self, id: &str) -> Option<Bucket> {
        Bucket::ALL
            .into_iter()
            .find(|b| self.bucket(*b).iter().any(|i| i.id == id))
    }

    /// Find an item by id across all buckets
    pub fn item(&self, id: &str) -> Option<&Item> {
        Bucket::ALL
            .into_iter()
            .find_map(|b| self.bucket(b).iter().find(|i| i.id == id))
    }

    /// Find an item by id across all buckets, mutably
    pub fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        let bucket = self.bucket_of(id)?;
        self.bucket_mut(bucket).iter_mut().find(|i| i.id == id)
    }

    /// Total item count across all buckets
    pub fn total_len(&self) -> usize {
        Bucket::ALL.into_iter().map(|b| self.bucket(b).len()).sum()
    }

    /// Ids of one bucket in display order
    pub fn ids(&self, bucket: Bucket) -> Vec<String> {
        self.bucket(bucket).iter().map(|i| i.id.clone()).collect()
    }

    /// Serialize the current membership and order into the persisted shape
    pub fn to_structure(&self) -> Structure {
        Structure {
            introduction: self.ids(Bucket::Introduction),
            main: self.ids(Bucket::Main),
            conclusion: self.ids(Bucket::Conclusion),
            ambiguous: self.ids(Bucket::Ambiguous),
        }
    }
}

/// The persisted ordering document: four arrays of thought ids.
/// A missing key is an empty array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default)]
    pub introduction: Vec<String>,
    #[serde(default)]
    pub main: Vec<String>,
    #[serde(default)]
    pub conclusion: Vec<String>,
    #[serde(default)]
    pub ambiguous: Vec<String>,
}

impl Structure {
    /// Ids listed for one bucket
    pub fn ids(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::Introduction => &self.introduction,
            Bucket::Main => &self.main,
            Bucket::Conclusion => &self.conclusion,
            Bucket::Ambiguous => &self.ambiguous,
        }
    }

    /// True if no bucket lists any id
    pub fn is_empty(&self) -> bool {
        Bucket::ALL.into_iter().all(|b| self.ids(b).is_empty())
    }
}

/// Storage does not enforce a schema: the structure arrives either as a
/// JSON object or as a JSON-encoded string. Normalized on entry so the
/// engine never branches on representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructureField {
    Doc(Structure),
    Text(String),
}

impl StructureField {
    /// Normalize to the parsed form. An unparseable string is treated as
    /// absent (the classifier falls back to tags) and logged.
    pub fn normalize(&self) -> Option<Structure> {
        match self {
            StructureField::Doc(s) => Some(s.clone()),
            StructureField::Text(raw) => match serde_json::from_str(raw) {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unparseable structure document");
                    None
                }
            },
        }
    }
}
