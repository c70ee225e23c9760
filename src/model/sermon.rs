use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outline::{Structure, StructureField};
use super::thought::Thought;

/// A scheduled or past preaching of a sermon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreachDate {
    pub id: String,
    pub date: DateTime<Utc>,
    /// True once this date has actually been preached
    #[serde(default)]
    pub preached: bool,
}

/// Aggregate root: a sermon with its thoughts and optional ordering document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sermon {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub verse: String,
    pub user_id: String,
    #[serde(default)]
    pub thoughts: Vec<Thought>,
    /// Absent when the sermon was never organized; otherwise an object or
    /// a JSON-encoded string (see [`StructureField`])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<StructureField>,
    #[serde(default)]
    pub is_preached: bool,
    #[serde(default)]
    pub preach_dates: Vec<PreachDate>,
}

impl Sermon {
    /// The normalized structure document, if one is present and parseable
    pub fn structure_doc(&self) -> Option<Structure> {
        self.structure.as_ref().and_then(|s| s.normalize())
    }

    /// Find a thought by id
    pub fn thought(&self, id: &str) -> Option<&Thought> {
        self.thoughts.iter().find(|t| t.id == id)
    }

    /// Find a thought by id, mutably
    pub fn thought_mut(&mut self, id: &str) -> Option<&mut Thought> {
        self.thoughts.iter_mut().find(|t| t.id == id)
    }
}

/// Fields required to create a sermon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSermon {
    pub title: String,
    #[serde(default)]
    pub verse: String,
    pub user_id: String,
}

impl NewSermon {
    /// Build the optimistic record inserted into the cache before the
    /// server has confirmed the create
    pub fn into_sermon(self, id: String) -> Sermon {
        Sermon {
            id,
            title: self.title,
            verse: self.verse,
            user_id: self.user_id,
            thoughts: Vec::new(),
            structure: None,
            is_preached: false,
            preach_dates: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sermon_with_object_structure() {
        let json = r#"{
            "id": "s1", "title": "On Grace", "user_id": "u1",
            "structure": {"introduction": ["t1"], "main": [], "conclusion": [], "ambiguous": []}
        }"#;
        let sermon: Sermon = serde_json::from_str(json).unwrap();
        let doc = sermon.structure_doc().unwrap();
        assert_eq!(doc.introduction, vec!["t1".to_string()]);
    }

    #[test]
    fn sermon_with_string_structure() {
        let json = r#"{
            "id": "s1", "title": "On Grace", "user_id": "u1",
            "structure": "{\"main\": [\"t2\"]}"
        }"#;
        let sermon: Sermon = serde_json::from_str(json).unwrap();
        let doc = sermon.structure_doc().unwrap();
        assert_eq!(doc.main, vec!["t2".to_string()]);
    }

    #[test]
    fn sermon_without_structure() {
        let json = r#"{"id": "s1", "title": "On Grace", "user_id": "u1"}"#;
        let sermon: Sermon = serde_json::from_str(json).unwrap();
        assert!(sermon.structure_doc().is_none());
        assert!(sermon.thoughts.is_empty());
    }

    #[test]
    fn new_sermon_builds_blank_record() {
        let input = NewSermon {
            title: "On Hope".into(),
            verse: "Rom 15:13".into(),
            user_id: "u1".into(),
        };
        let s = input.into_sermon("local-1-000001".into());
        assert_eq!(s.id, "local-1-000001");
        assert_eq!(s.title, "On Hope");
        assert!(!s.is_preached);
        assert!(s.preach_dates.is_empty());
    }
}
