use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validate::{self, FieldResult, Validate};
use super::{package_exists, Resource};
use crate::store::{Collection, ContentStore};

/// A time-boxed discount, optionally tied to one package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub discount_percent: u8,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl Validate for Offer {
    fn validate(&self) -> FieldResult {
        validate::required("title", &self.title)?;
        validate::slug("slug", &self.slug)?;
        validate::in_range("discount_percent", self.discount_percent, 1, 100)?;
        validate::not_before("valid_until", &self.valid_until, &self.valid_from, "valid_from")?;
        validate::optional_slug("package", self.package.as_deref())
    }
}

impl Resource for Offer {
    const KIND: &'static str = "offers";

    fn slug(&self) -> Option<&str> {
        Some(self.slug.as_str())
    }

    fn is_public(&self) -> bool {
        self.published
    }

    fn check_references(&self, store: &ContentStore) -> FieldResult {
        package_exists(store, "package", self.package.as_deref())
    }

    fn collection(store: &ContentStore) -> &Collection<Self> {
        &store.offers
    }
}
