use serde::{Deserialize, Serialize};

use super::validate::{self, FieldResult, Validate};
use super::{package_exists, Resource};
use crate::store::{Collection, ContentStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub author: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Stars, 1 to 5.
    pub rating: u8,
    pub quote: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl Validate for Testimonial {
    fn validate(&self) -> FieldResult {
        validate::required("author", &self.author)?;
        validate::in_range("rating", self.rating, 1, 5)?;
        validate::required("quote", &self.quote)?;
        validate::max_len("quote", &self.quote, 2000)?;
        validate::optional_slug("package", self.package.as_deref())
    }
}

impl Resource for Testimonial {
    const KIND: &'static str = "testimonials";

    fn is_public(&self) -> bool {
        self.published
    }

    fn check_references(&self, store: &ContentStore) -> FieldResult {
        package_exists(store, "package", self.package.as_deref())
    }

    fn collection(store: &ContentStore) -> &Collection<Self> {
        &store.testimonials
    }
}
