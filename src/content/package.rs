//! Tour packages.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::validate::{self, FieldError, FieldResult, Validate};
use super::Resource;
use crate::store::{Collection, ContentStore};

/// One day of a package itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A sellable trip to a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub title: String,
    pub slug: String,
    /// Slug of the destination this package belongs to.
    pub destination: String,
    pub duration_days: u32,
    /// Per-person starting price in whole currency units.
    pub price: u64,
    pub currency: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
}

impl Validate for Package {
    fn validate(&self) -> FieldResult {
        validate::required("title", &self.title)?;
        validate::max_len("title", &self.title, 160)?;
        validate::slug("slug", &self.slug)?;
        validate::slug("destination", &self.destination)?;
        validate::in_range("duration_days", self.duration_days, 1, 365)?;
        validate::currency("currency", &self.currency)?;
        validate::url("cover_image", self.cover_image.as_deref())?;

        let mut days = HashSet::new();
        for entry in &self.itinerary {
            validate::in_range("itinerary", entry.day, 1, self.duration_days)?;
            if !days.insert(entry.day) {
                return Err(FieldError::new("itinerary", format!("day {} listed twice", entry.day)));
            }
            validate::required("itinerary", &entry.title)?;
        }
        Ok(())
    }
}

impl Resource for Package {
    const KIND: &'static str = "packages";

    fn slug(&self) -> Option<&str> {
        Some(self.slug.as_str())
    }

    fn is_public(&self) -> bool {
        self.published
    }

    fn normalize(&mut self) {
        self.itinerary.sort_by_key(|d| d.day);
        self.highlights.retain(|h| !h.trim().is_empty());
    }

    fn check_references(&self, store: &ContentStore) -> FieldResult {
        if store.destinations.find_by_slug(&self.destination).is_none() {
            return Err(FieldError::new(
                "destination",
                format!("unknown destination '{}'", self.destination),
            ));
        }
        Ok(())
    }

    fn collection(store: &ContentStore) -> &Collection<Self> {
        &store.packages
    }
}
