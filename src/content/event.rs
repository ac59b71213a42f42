use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validate::{self, FieldResult, Validate};
use super::Resource;
use crate::store::{Collection, ContentStore};

/// A festival, fair or other dated happening promoted on the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub slug: String,
    pub location: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl Validate for Event {
    fn validate(&self) -> FieldResult {
        validate::required("title", &self.title)?;
        validate::slug("slug", &self.slug)?;
        validate::required("location", &self.location)?;
        validate::not_before("ends_on", &self.ends_on, &self.starts_on, "starts_on")?;
        validate::url("image", self.image.as_deref())
    }
}

impl Resource for Event {
    const KIND: &'static str = "events";

    fn slug(&self) -> Option<&str> {
        Some(self.slug.as_str())
    }

    fn is_public(&self) -> bool {
        self.published
    }

    fn order(&self, other: &Self) -> Ordering {
        self.starts_on.cmp(&other.starts_on)
    }

    fn collection(store: &ContentStore) -> &Collection<Self> {
        &store.events
    }
}
