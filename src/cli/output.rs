use serde::Serialize;

use crate::model::{Bucket, Containers, Item, Sermon};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SermonJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub verse: String,
    pub thoughts: usize,
    pub is_preached: bool,
}

impl From<&Sermon> for SermonJson {
    fn from(s: &Sermon) -> Self {
        SermonJson {
            id: s.id.clone(),
            title: s.title.clone(),
            verse: s.verse.clone(),
            thoughts: s.thoughts.len(),
            is_preached: s.is_preached,
        }
    }
}

#[derive(Serialize)]
pub struct ItemJson {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl From<&Item> for ItemJson {
    fn from(item: &Item) -> Self {
        ItemJson {
            id: item.id.clone(),
            content: item.content.clone(),
            tags: crate::ops::outline_ops::merged_tags(item),
        }
    }
}

#[derive(Serialize)]
pub struct OutlineJson {
    pub introduction: Vec<ItemJson>,
    pub main: Vec<ItemJson>,
    pub conclusion: Vec<ItemJson>,
    pub ambiguous: Vec<ItemJson>,
}

impl From<&Containers> for OutlineJson {
    fn from(c: &Containers) -> Self {
        let items = |b: Bucket| -> Vec<ItemJson> { c.bucket(b).iter().map(ItemJson::from).collect() };
        OutlineJson {
            introduction: items(Bucket::Introduction),
            main: items(Bucket::Main),
            conclusion: items(Bucket::Conclusion),
            ambiguous: items(Bucket::Ambiguous),
        }
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

pub fn print_sermons(sermons: &[Sermon]) {
    for s in sermons {
        let preached = if s.is_preached { " [preached]" } else { "" };
        println!(
            "{}  {} ({} thoughts){}",
            s.id,
            s.title,
            s.thoughts.len(),
            preached
        );
    }
}

pub fn print_outline(containers: &Containers) {
    for bucket in Bucket::ALL {
        let items = containers.bucket(bucket);
        println!("{} ({})", bucket, items.len());
        for item in items {
            let tags: Vec<String> = item.custom_tags.iter().map(|t| t.name.clone()).collect();
            if tags.is_empty() {
                println!("  {}  {}", item.id, item.content);
            } else {
                println!("  {}  {}  [{}]", item.id, item.content, tags.join(", "));
            }
        }
        println!();
    }
}
