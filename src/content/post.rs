use serde::{Deserialize, Serialize};

use super::validate::{self, FieldResult, Validate};
use super::Resource;
use crate::store::{Collection, ContentStore};

/// A travel blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    pub body: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl Validate for BlogPost {
    fn validate(&self) -> FieldResult {
        validate::required("title", &self.title)?;
        validate::max_len("title", &self.title, 200)?;
        validate::slug("slug", &self.slug)?;
        validate::max_len("excerpt", &self.excerpt, 500)?;
        validate::required("body", &self.body)?;
        validate::required("author", &self.author)?;
        validate::url("cover_image", self.cover_image.as_deref())
    }
}

impl Resource for BlogPost {
    const KIND: &'static str = "posts";

    fn slug(&self) -> Option<&str> {
        Some(self.slug.as_str())
    }

    fn is_public(&self) -> bool {
        self.published
    }

    fn normalize(&mut self) {
        for tag in &mut self.tags {
            *tag = tag.trim().to_lowercase();
        }
        self.tags.retain(|t| !t.is_empty());
        self.tags.sort();
        self.tags.dedup();
    }

    fn collection(store: &ContentStore) -> &Collection<Self> {
        &store.posts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_normalized() {
        let mut post = BlogPost {
            title: "Packing for the Himalaya".into(),
            slug: "packing-for-the-himalaya".into(),
            excerpt: String::new(),
            body: "Layers.".into(),
            author: "Editorial".into(),
            tags: vec![" Trekking".into(), "gear".into(), "trekking".into(), "".into()],
            cover_image: None,
            published: false,
        };
        post.normalize();
        assert_eq!(post.tags, vec!["gear", "trekking"]);
    }
}
