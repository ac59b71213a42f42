use serde::{Deserialize, Serialize};

use super::validate::{self, FieldResult, Validate};
use super::Resource;
use crate::store::{Collection, ContentStore};

/// A country or region the agency sells trips to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub slug: String,
    pub country: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
}

impl Validate for Destination {
    fn validate(&self) -> FieldResult {
        validate::required("name", &self.name)?;
        validate::max_len("name", &self.name, 120)?;
        validate::slug("slug", &self.slug)?;
        validate::required("country", &self.country)?;
        validate::required("summary", &self.summary)?;
        validate::max_len("summary", &self.summary, 300)?;
        validate::url("hero_image", self.hero_image.as_deref())
    }
}

impl Resource for Destination {
    const KIND: &'static str = "destinations";

    fn slug(&self) -> Option<&str> {
        Some(self.slug.as_str())
    }

    fn is_public(&self) -> bool {
        self.published
    }

    fn collection(store: &ContentStore) -> &Collection<Self> {
        &store.destinations
    }
}
