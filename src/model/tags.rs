use serde::{Deserialize, Serialize};

/// Color applied to tags the registry does not know about
pub const DEFAULT_TAG_COLOR: &str = "#808080";

/// A tag definition from the tag registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDef {
    pub name: String,
    pub color: String,
}

/// A tag name paired with its resolved display color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBadge {
    pub name: String,
    pub color: String,
}

/// The user's tag registry: the three structural tag definitions plus
/// any custom tags, fetched once at load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagRegistry {
    #[serde(default)]
    pub required_tags: Vec<TagDef>,
    #[serde(default)]
    pub custom_tags: Vec<TagDef>,
}

impl TagRegistry {
    /// Resolve a custom tag name to a badge. Unknown names fall back to
    /// the default color with a warning (non-fatal).
    pub fn badge(&self, name: &str) -> TagBadge {
        let found = self
            .custom_tags
            .iter()
            .chain(self.required_tags.iter())
            .find(|t| t.name == name);
        match found {
            Some(def) => TagBadge {
                name: def.name.clone(),
                color: def.color.clone(),
            },
            None => {
                tracing::warn!(tag = %name, "tag missing from registry, using default color");
                TagBadge {
                    name: name.to_string(),
                    color: DEFAULT_TAG_COLOR.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn badge_resolves_known_custom_tag() {
        let b = registry().badge("grace");
        assert_eq!(b.color, "#f59e0b");
    }

    #[test]
    fn badge_falls_back_to_default_color() {
        let b = registry().badge("unheard-of");
        assert_eq!(b.name, "unheard-of");
        assert_eq!(b.color, DEFAULT_TAG_COLOR);
    }

    #[test]
    fn registry_deserializes_with_missing_fields() {
        let r: TagRegistry = serde_json::from_str("{}").unwrap();
        assert!(r.required_tags.is_empty());
        assert!(r.custom_tags.is_empty());
    }
}
