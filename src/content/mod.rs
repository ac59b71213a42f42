//! Content model for the travel site.
//!
//! # Responsibilities
//! - Define one type per content kind with its validation rules
//! - Describe how each kind is stored, ordered, and exposed publicly
//!
//! # Design Decisions
//! - Stored items are `Record<T>`: server-owned id and timestamps with the
//!   kind's own fields flattened beside them
//! - Cross-kind references are by slug and checked against the store at write time
//! - `Resource::KIND` doubles as the URL segment and the metrics label

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Collection, ContentStore};

pub mod departure;
pub mod destination;
pub mod event;
pub mod inquiry;
pub mod offer;
pub mod package;
pub mod page;
pub mod post;
pub mod testimonial;
pub mod validate;

pub use departure::{DepartureStatus, FixedDeparture};
pub use destination::Destination;
pub use event::Event;
pub use inquiry::Inquiry;
pub use offer::Offer;
pub use package::{ItineraryDay, Package};
pub use page::Page;
pub use post::BlogPost;
pub use testimonial::Testimonial;
pub use validate::{FieldError, FieldResult, Validate};

/// A content kind managed through the CMS.
pub trait Resource: Validate + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// URL segment and label, e.g. `"destinations"`.
    const KIND: &'static str;

    /// Unique, URL-safe identifier within the kind, if the kind has one.
    fn slug(&self) -> Option<&str> {
        None
    }

    /// Whether the public API may show this item.
    fn is_public(&self) -> bool;

    /// List order. Ties fall back to newest first.
    fn order(&self, _other: &Self) -> Ordering {
        Ordering::Equal
    }

    /// Tidy input before validation.
    fn normalize(&mut self) {}

    /// Verify slugs pointing at other kinds exist.
    fn check_references(&self, _store: &ContentStore) -> FieldResult {
        Ok(())
    }

    fn collection(store: &ContentStore) -> &Collection<Self>;
}

/// A stored content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

pub(crate) fn package_exists(store: &ContentStore, field: &'static str, slug: Option<&str>) -> FieldResult {
    match slug {
        Some(s) if store.packages.find_by_slug(s).is_none() => {
            Err(FieldError::new(field, format!("unknown package '{s}'")))
        }
        _ => Ok(()),
    }
}
