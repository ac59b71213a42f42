//! A typed, concurrent collection of content records.

use std::sync::Mutex;

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::content::{Record, Resource};
use crate::store::StoreError;

/// All records of one content kind.
///
/// Reads go straight to the map. Writes are serialized so the slug
/// uniqueness check and the insert happen as one step.
pub struct Collection<T> {
    items: DashMap<Uuid, Record<T>>,
    writes: Mutex<()>,
}

impl<T: Resource> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: DashMap::new(),
            writes: Mutex::new(()),
        }
    }
}

impl<T: Resource> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every record, in the kind's list order.
    pub fn list(&self) -> Vec<Record<T>> {
        let mut records: Vec<_> = self.items.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| {
            a.data
                .order(&b.data)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        records
    }

    /// Records the public site may show.
    pub fn list_public(&self) -> Vec<Record<T>> {
        let mut records = self.list();
        records.retain(|r| r.data.is_public());
        records
    }

    pub fn get(&self, id: Uuid) -> Option<Record<T>> {
        self.items.get(&id).map(|r| r.value().clone())
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<Record<T>> {
        self.items
            .iter()
            .find(|r| r.value().data.slug() == Some(slug))
            .map(|r| r.value().clone())
    }

    /// Look up by slug, falling back to the id.
    pub fn find(&self, key: &str) -> Option<Record<T>> {
        self.find_by_slug(key)
            .or_else(|| Uuid::parse_str(key).ok().and_then(|id| self.get(id)))
    }

    pub fn insert(&self, data: T) -> Result<Record<T>, StoreError> {
        let _guard = self.writes.lock().expect("collection write lock poisoned");
        self.ensure_slug_free(&data, None)?;

        let now = Utc::now();
        let record = Record {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            data,
        };
        self.items.insert(record.id, record.clone());
        Ok(record)
    }

    /// Replace the fields of an existing record. `Ok(None)` if absent,
    /// otherwise the updated record and the one it replaced.
    pub fn replace(&self, id: Uuid, data: T) -> Result<Option<(Record<T>, Record<T>)>, StoreError> {
        let _guard = self.writes.lock().expect("collection write lock poisoned");
        if !self.items.contains_key(&id) {
            return Ok(None);
        }
        self.ensure_slug_free(&data, Some(id))?;

        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        let previous = entry.value().clone();
        entry.data = data;
        entry.updated_at = Utc::now();
        Ok(Some((entry.value().clone(), previous)))
    }

    pub fn remove(&self, id: Uuid) -> Option<Record<T>> {
        let _guard = self.writes.lock().expect("collection write lock poisoned");
        self.items.remove(&id).map(|(_, record)| record)
    }

    /// Put a record back exactly as it was, undoing an insert, replace or remove.
    pub fn put_back(&self, record: Record<T>) {
        let _guard = self.writes.lock().expect("collection write lock poisoned");
        self.items.insert(record.id, record);
    }

    pub(crate) fn snapshot(&self) -> Vec<Record<T>> {
        let mut records: Vec<_> = self.items.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| r.created_at);
        records
    }

    pub(crate) fn restore(&self, records: Vec<Record<T>>) {
        let _guard = self.writes.lock().expect("collection write lock poisoned");
        self.items.clear();
        for record in records {
            self.items.insert(record.id, record);
        }
    }

    fn ensure_slug_free(&self, data: &T, except: Option<Uuid>) -> Result<(), StoreError> {
        let Some(slug) = data.slug() else {
            return Ok(());
        };
        let taken = self
            .items
            .iter()
            .any(|r| Some(r.key()) != except.as_ref() && r.value().data.slug() == Some(slug));
        if taken {
            return Err(StoreError::DuplicateSlug {
                kind: T::KIND,
                slug: slug.to_string(),
            });
        }
        Ok(())
    }
}
