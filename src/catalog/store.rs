//! Identity-keyed arena of catalog items and their visual handles.
//!
//! The store is the authoritative list of what is currently on the shelf. Each
//! distinct [`ItemId`] owns exactly one [`VisualHandle`] for the lifetime of a
//! snapshot: sorting and searching only read handles, a non-forced load only
//! adds handles for unseen ids, and only a forced refresh
//! ([`ItemStore::replace_all`]) destroys and recreates them.

use super::cache::CacheVersion;
use crate::domain::{format_size, ItemId, ItemRecord};
use crate::remote::endpoints;
use std::collections::HashMap;

/// Process-unique serial of a visual handle.
///
/// Two handles compare equal only if they are the same rendition; a recreated
/// handle for the same item always gets a fresh serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

/// The pre-rendered form of one catalog item.
///
/// Built once from the record it was created for. Everything the renderer
/// needs per row lives here, so repainting after a sort or a keystroke never
/// recomputes it, and the cover path (including its cache suffix) stays
/// byte-identical for as long as the handle lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualHandle {
    serial: HandleId,
    title: String,
    search_key: String,
    size_label: String,
    cover_path: String,
    download_path: String,
    version: CacheVersion,
}

impl VisualHandle {
    fn new(serial: HandleId, record: &ItemRecord, version: CacheVersion) -> Self {
        Self {
            serial,
            title: record.name.clone(),
            search_key: record.name.to_lowercase(),
            size_label: format_size(record.size_bytes),
            cover_path: endpoints::cover_path(&record.id, version),
            download_path: endpoints::download_path(&record.id),
            version,
        }
    }

    #[must_use]
    pub const fn serial(&self) -> HandleId {
        self.serial
    }

    /// Display name as it was when the handle was built.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Lower-cased name used for matching.
    #[must_use]
    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    #[must_use]
    pub fn size_label(&self) -> &str {
        &self.size_label
    }

    /// Cover path relative to the server root, with `?v=` once versioned.
    #[must_use]
    pub fn cover_path(&self) -> &str {
        &self.cover_path
    }

    #[must_use]
    pub fn download_path(&self) -> &str {
        &self.download_path
    }

    /// Cache generation that was current when this handle was created.
    #[must_use]
    pub const fn version(&self) -> CacheVersion {
        self.version
    }
}

#[derive(Debug, Clone)]
struct Entry {
    record: ItemRecord,
    handle: VisualHandle,
}

/// Authoritative item list plus one visual handle per item id.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    /// Entries in insertion order.
    entries: Vec<Entry>,
    /// Position of each id in `entries`.
    index: HashMap<ItemId, usize>,
    /// Serial for the next handle; never reset so serials stay unique.
    next_serial: u64,
}

impl ItemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards every record and handle and rebuilds the store from `records`.
    ///
    /// Input order is kept. When an id appears more than once, the first
    /// occurrence wins. Returns the number of handles created.
    pub fn replace_all(&mut self, records: Vec<ItemRecord>, version: CacheVersion) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.index.clear();

        let created = self.insert_unseen(records, version);

        tracing::debug!(
            dropped_handles = dropped,
            created_handles = created,
            cache_version = %version,
            "store replaced"
        );
        created
    }

    /// Adds handles for ids not already present, leaving known ids untouched.
    ///
    /// Records for known ids are ignored even if their name or size changed;
    /// the store has no in-place update. Returns the number of handles created.
    pub fn merge_new(&mut self, records: Vec<ItemRecord>, version: CacheVersion) -> usize {
        let stale = records
            .iter()
            .filter(|record| {
                self.get(&record.id)
                    .is_some_and(|(known, _)| known != *record)
            })
            .count();

        let created = self.insert_unseen(records, version);

        tracing::debug!(
            created_handles = created,
            stale_records_ignored = stale,
            total = self.entries.len(),
            "store merged"
        );
        created
    }

    fn insert_unseen(&mut self, records: Vec<ItemRecord>, version: CacheVersion) -> usize {
        let mut created = 0;
        for record in records {
            if self.index.contains_key(&record.id) {
                continue;
            }

            let serial = HandleId(self.next_serial);
            self.next_serial += 1;

            let handle = VisualHandle::new(serial, &record, version);
            self.index.insert(record.id.clone(), self.entries.len());
            self.entries.push(Entry { record, handle });
            created += 1;
        }
        created
    }

    /// Iterates over `(record, handle)` pairs in insertion order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = (&ItemRecord, &VisualHandle)> + '_ {
        self.entries.iter().map(|entry| (&entry.record, &entry.handle))
    }

    #[must_use]
    pub fn has(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<(&ItemRecord, &VisualHandle)> {
        self.index
            .get(id)
            .and_then(|&pos| self.entries.get(pos))
            .map(|entry| (&entry.record, &entry.handle))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
