use serde::{Deserialize, Serialize};

use super::validate::{self, FieldResult, Validate};
use super::Resource;
use crate::store::{Collection, ContentStore};

/// Static pages such as "about" or "terms".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub slug: String,
    pub body: String,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl Validate for Page {
    fn validate(&self) -> FieldResult {
        validate::required("title", &self.title)?;
        validate::slug("slug", &self.slug)?;
        validate::required("body", &self.body)?;
        match &self.meta_description {
            Some(meta) => validate::max_len("meta_description", meta, 160),
            None => Ok(()),
        }
    }
}

impl Resource for Page {
    const KIND: &'static str = "pages";

    fn slug(&self) -> Option<&str> {
        Some(self.slug.as_str())
    }

    fn is_public(&self) -> bool {
        self.published
    }

    fn collection(store: &ContentStore) -> &Collection<Self> {
        &store.pages
    }
}
