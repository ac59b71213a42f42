//! Visitor inquiries from the contact form. Admin-only reads.

use serde::{Deserialize, Serialize};

use super::validate::{self, FieldResult, Validate};
use super::{package_exists, Resource};
use crate::store::{Collection, ContentStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    /// Package the visitor asked about, if any.
    #[serde(default)]
    pub package: Option<String>,
}

impl Validate for Inquiry {
    fn validate(&self) -> FieldResult {
        validate::required("name", &self.name)?;
        validate::max_len("name", &self.name, 120)?;
        validate::email("email", &self.email)?;
        validate::required("message", &self.message)?;
        validate::max_len("message", &self.message, 5000)?;
        validate::optional_slug("package", self.package.as_deref())
    }
}

impl Resource for Inquiry {
    const KIND: &'static str = "inquiries";

    fn is_public(&self) -> bool {
        false
    }

    fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
        if self.phone.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.phone = None;
        }
    }

    fn check_references(&self, store: &ContentStore) -> FieldResult {
        package_exists(store, "package", self.package.as_deref())
    }

    fn collection(store: &ContentStore) -> &Collection<Self> {
        &store.inquiries
    }
}
