//! Concurrent in-process record store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use crate::Record;

/// A keyed collection of records guarded by a single lock.
///
/// Readers only ever receive point-in-time copies, and every write replaces
/// or removes a whole record under the write lock.
#[derive(Debug)]
pub struct MemoryStore<R: Record> {
    records: RwLock<HashMap<Uuid, R>>,
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> MemoryStore<R> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a snapshot of every record, in no particular order.
    pub fn find_all(&self) -> Vec<R> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.values().cloned().collect()
    }

    /// Returns a copy of the record stored under `id`.
    pub fn get(&self, id: Uuid) -> Option<R> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(&id).cloned()
    }

    /// Inserts or replaces a record, returning the previous one.
    pub fn upsert(&self, record: R) -> Option<R> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(record.id(), record)
    }

    /// Removes the record stored under `id`.
    pub fn remove_by_key(&self, id: Uuid) -> Option<R> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Record> FromIterator<R> for MemoryStore<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let records = iter.into_iter().map(|record| (record.id(), record)).collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use jiff::Timestamp;

    use super::*;
    use crate::resource::{Notification, NotificationLevel};

    fn notification(title: &str) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            receiver_id: Uuid::nil(),
            title: title.to_owned(),
            content: None,
            level: NotificationLevel::Info,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn upsert_replaces_by_id() {
        let store = MemoryStore::new();
        let mut record = notification("first");
        assert!(store.upsert(record.clone()).is_none());

        record.title = "second".to_owned();
        assert_eq!(store.upsert(record.clone()).map(|r| r.title), Some("first".into()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(record.id).map(|r| r.title), Some("second".into()));

        assert!(store.remove_by_key(record.id).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let store: MemoryStore<_> = (0..3).map(|n| notification(&n.to_string())).collect();
        let snapshot = store.find_all();
        for record in &snapshot {
            store.remove_by_key(record.id);
        }
        assert_eq!(snapshot.len(), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_writers_and_readers() {
        let store = Arc::new(MemoryStore::new());
        let writers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for n in 0..250 {
                        let record = notification(&n.to_string());
                        store.upsert(record.clone());
                        if n % 2 == 0 {
                            store.remove_by_key(record.id);
                        }
                        let _ = store.find_all();
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(store.len(), 4 * 125);
    }
}
