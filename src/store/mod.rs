//! Content storage.
//!
//! # Data Flow
//! ```text
//! startup:   data file (JSON) → Snapshot → Collection<T> per kind
//! handlers:  Collection<T> (concurrent reads, serialized writes)
//! mutation:  Collection<T> → Snapshot → temp file → rename over data file
//! ```
//!
//! # Design Decisions
//! - Whole-store snapshot after each successful write; content volume is small
//! - Without a data path the store is purely in memory

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{
    BlogPost, Destination, Event, FixedDeparture, Inquiry, Offer, Package, Page, Record, Resource,
    Testimonial,
};

pub mod collection;

pub use collection::Collection;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} slug '{slug}' is already in use")]
    DuplicateSlug { kind: &'static str, slug: String },
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Every content collection, plus optional file persistence.
#[derive(Default)]
pub struct ContentStore {
    pub destinations: Collection<Destination>,
    pub packages: Collection<Package>,
    pub events: Collection<Event>,
    pub departures: Collection<FixedDeparture>,
    pub offers: Collection<Offer>,
    pub testimonials: Collection<Testimonial>,
    pub posts: Collection<BlogPost>,
    pub pages: Collection<Page>,
    pub inquiries: Collection<Inquiry>,
    data_path: Option<PathBuf>,
    persist_lock: Mutex<()>,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct Snapshot {
    destinations: Vec<Record<Destination>>,
    packages: Vec<Record<Package>>,
    events: Vec<Record<Event>>,
    departures: Vec<Record<FixedDeparture>>,
    offers: Vec<Record<Offer>>,
    testimonials: Vec<Record<Testimonial>>,
    posts: Vec<Record<BlogPost>>,
    pages: Vec<Record<Page>>,
    inquiries: Vec<Record<Inquiry>>,
}

impl ContentStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading the file if it exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let store = Self {
            data_path: Some(path.clone()),
            ..Self::default()
        };

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let snapshot: Snapshot = serde_json::from_reader(reader)?;
            store.restore(snapshot);
            tracing::info!(path = ?path, items = store.total(), "Loaded content snapshot");
        }
        Ok(store)
    }

    /// Write the current contents to the data file. No-op when in memory.
    pub fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.data_path else {
            return Ok(());
        };
        let _guard = self.persist_lock.lock().expect("persist lock poisoned");

        let snapshot = self.snapshot();
        let tmp = temp_path(path);
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        tracing::debug!(path = ?path, "Saved content snapshot");
        Ok(())
    }

    /// Item counts by kind.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            (Destination::KIND, self.destinations.len()),
            (Package::KIND, self.packages.len()),
            (Event::KIND, self.events.len()),
            (FixedDeparture::KIND, self.departures.len()),
            (Offer::KIND, self.offers.len()),
            (Testimonial::KIND, self.testimonials.len()),
            (BlogPost::KIND, self.posts.len()),
            (Page::KIND, self.pages.len()),
            (Inquiry::KIND, self.inquiries.len()),
        ])
    }

    fn total(&self) -> usize {
        self.counts().values().sum()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            destinations: self.destinations.snapshot(),
            packages: self.packages.snapshot(),
            events: self.events.snapshot(),
            departures: self.departures.snapshot(),
            offers: self.offers.snapshot(),
            testimonials: self.testimonials.snapshot(),
            posts: self.posts.snapshot(),
            pages: self.pages.snapshot(),
            inquiries: self.inquiries.snapshot(),
        }
    }

    fn restore(&self, snapshot: Snapshot) {
        self.destinations.restore(snapshot.destinations);
        self.packages.restore(snapshot.packages);
        self.events.restore(snapshot.events);
        self.departures.restore(snapshot.departures);
        self.offers.restore(snapshot.offers);
        self.testimonials.restore(snapshot.testimonials);
        self.posts.restore(snapshot.posts);
        self.pages.restore(snapshot.pages);
        self.inquiries.restore(snapshot.inquiries);
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(slug: &str) -> Destination {
        Destination {
            name: "Nepal".into(),
            slug: slug.into(),
            country: "Nepal".into(),
            summary: "Mountains".into(),
            description: String::new(),
            hero_image: None,
            featured: true,
            published: true,
        }
    }

    #[test]
    fn test_persistence() {
        let path = std::env::temp_dir().join(format!("travel-cms-{}.json", uuid::Uuid::new_v4()));

        let store = ContentStore::open(&path).unwrap();
        let nepal = store.destinations.insert(destination("nepal")).unwrap();
        store.persist().unwrap();

        let loaded = ContentStore::open(&path).unwrap();
        assert_eq!(loaded.destinations.get(nepal.id), Some(nepal));
        assert_eq!(loaded.counts()["destinations"], 1);
        assert_eq!(loaded.counts()["packages"], 0);

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_in_memory_persist_is_noop() {
        let store = ContentStore::in_memory();
        store.destinations.insert(destination("bhutan")).unwrap();
        assert!(store.persist().is_ok());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("travel-cms-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ContentStore::open(&path), Err(StoreError::Encoding(_))));
        std::fs::remove_file(&path).unwrap_or_default();
    }
}
