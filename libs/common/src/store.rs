//! Record store abstraction for the volatile, process-lifetime database
//!
//! Services keep their collections in a [`Store`]. The only backend today is
//! [`MemoryStore`], a lock-guarded vector; the trait keeps the repositories
//! independent of it so a persistent backend can be swapped in later.
//!
//! Every check-then-act sequence a repository needs (uniqueness check before
//! insert, ownership check before update or removal) is expressed as a
//! closure that runs inside the store's critical section.
//!
//! ```rust
//! use common::store::{MemoryStore, Record, Store};
//!
//! #[derive(Clone)]
//! struct Note {
//!     id: u64,
//!     text: String,
//! }
//!
//! impl Record for Note {
//!     fn id(&self) -> u64 {
//!         self.id
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::<Note>::new();
//!     let note = store
//!         .insert(|id, _| {
//!             Ok::<_, common::StoreError>(Note { id, text: "hello".to_string() })
//!         })
//!         .await
//!         .unwrap();
//!     assert_eq!(store.get(note.id).await.unwrap().text, "hello");
//! }
//! ```

use std::{future::Future, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;

/// A value that can be kept in a [`Store`]
pub trait Record: Clone + Send + Sync + 'static {
    /// Identifier assigned by the store at insertion time
    fn id(&self) -> u64;
}

/// Collection of records keyed by a store-assigned integer id
///
/// Ids come from a monotonic counter that is independent of the collection
/// size, so an id is never handed out twice, even after removals.
pub trait Store<T: Record>: Clone + Send + Sync + 'static {
    /// Allocate the next id and build a record with it.
    ///
    /// `build` receives the id and the current records and may reject the
    /// insertion. The counter only advances when a record is stored.
    fn insert<B, E>(&self, build: B) -> impl Future<Output = Result<T, E>> + Send
    where
        B: FnOnce(u64, &[T]) -> Result<T, E> + Send,
        E: From<StoreError> + Send;

    /// Get a record by id
    fn get(&self, id: u64) -> impl Future<Output = Option<T>> + Send;

    /// First record matching `predicate`, in insertion order
    fn find<P>(&self, predicate: P) -> impl Future<Output = Option<T>> + Send
    where
        P: Fn(&T) -> bool + Send;

    /// All records matching `predicate`, in insertion order
    fn filter<P>(&self, predicate: P) -> impl Future<Output = Vec<T>> + Send
    where
        P: Fn(&T) -> bool + Send;

    /// Snapshot of every record, in insertion order
    fn list(&self) -> impl Future<Output = Vec<T>> + Send;

    /// Apply `mutate` to the record with the given id.
    ///
    /// The mutation runs on a copy which replaces the stored record only if
    /// `mutate` succeeds. Returns `Ok(None)` when no record has that id.
    fn update<F, E>(&self, id: u64, mutate: F) -> impl Future<Output = Result<Option<T>, E>> + Send
    where
        F: FnOnce(&mut T) -> Result<(), E> + Send,
        E: Send;

    /// Remove the record with the given id if `guard` accepts it.
    ///
    /// Returns `Ok(None)` when no record has that id.
    fn remove<G, E>(&self, id: u64, guard: G) -> impl Future<Output = Result<Option<T>, E>> + Send
    where
        G: FnOnce(&T) -> Result<(), E> + Send,
        E: Send;
}

#[derive(Debug)]
struct Inner<T> {
    records: Vec<T>,
    next_id: u64,
}

/// In-memory [`Store`] backed by a `tokio` read-write lock
///
/// Cloning is cheap; all clones share the same records.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    inner: Arc<RwLock<Inner<T>>>,
}

impl<T: Record> MemoryStore<T> {
    /// Create an empty store whose first id is 1
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store holding `records`; new ids start after the largest one
    pub fn with_records(records: Vec<T>) -> Self {
        let next_id = records
            .iter()
            .map(Record::id)
            .max()
            .map_or(1, |max| max.saturating_add(1));

        Self {
            inner: Arc::new(RwLock::new(Inner { records, next_id })),
        }
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Store<T> for MemoryStore<T> {
    async fn insert<B, E>(&self, build: B) -> Result<T, E>
    where
        B: FnOnce(u64, &[T]) -> Result<T, E> + Send,
        E: From<StoreError> + Send,
    {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        let next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;

        let record = build(id, &inner.records)?;
        debug_assert_eq!(record.id(), id, "record built with a foreign id");

        inner.records.push(record.clone());
        inner.next_id = next_id;
        debug!(id, "record inserted");

        Ok(record)
    }

    async fn get(&self, id: u64) -> Option<T> {
        let inner = self.inner.read().await;
        inner.records.iter().find(|r| r.id() == id).cloned()
    }

    async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool + Send,
    {
        let inner = self.inner.read().await;
        inner.records.iter().find(|r| predicate(r)).cloned()
    }

    async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool + Send,
    {
        let inner = self.inner.read().await;
        inner
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    async fn list(&self) -> Vec<T> {
        self.inner.read().await.records.clone()
    }

    async fn update<F, E>(&self, id: u64, mutate: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut T) -> Result<(), E> + Send,
        E: Send,
    {
        let mut inner = self.inner.write().await;
        let Some(slot) = inner.records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };

        let mut draft = slot.clone();
        mutate(&mut draft)?;
        *slot = draft.clone();
        debug!(id, "record updated");

        Ok(Some(draft))
    }

    async fn remove<G, E>(&self, id: u64, guard: G) -> Result<Option<T>, E>
    where
        G: FnOnce(&T) -> Result<(), E> + Send,
        E: Send,
    {
        let mut inner = self.inner.write().await;
        let Some(position) = inner.records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };

        guard(&inner.records[position])?;
        let removed = inner.records.remove(position);
        debug!(id, "record removed");

        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u64,
        name: String,
    }

    impl Record for Item {
        fn id(&self) -> u64 {
            self.id
        }
    }

    fn item(id: u64, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
        }
    }

    async fn add(store: &MemoryStore<Item>, name: &str) -> Item {
        store
            .insert(|id, _| Ok::<_, StoreError>(item(id, name)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let store = MemoryStore::new();
        assert_eq!(add(&store, "a").await.id, 1);
        assert_eq!(add(&store, "b").await.id, 2);
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_removal() {
        let store = MemoryStore::new();
        add(&store, "a").await;
        let second = add(&store, "b").await;

        let removed = store
            .remove(second.id, |_| Ok::<_, StoreError>(()))
            .await
            .unwrap();
        assert_eq!(removed, Some(second));

        assert_eq!(add(&store, "c").await.id, 3);
    }

    #[tokio::test]
    async fn test_seeded_store_continues_after_largest_id() {
        let store = MemoryStore::with_records(vec![item(4, "x"), item(2, "y")]);
        assert_eq!(add(&store, "z").await.id, 5);
    }

    #[tokio::test]
    async fn test_rejected_insert_does_not_advance_counter() {
        let store = MemoryStore::new();
        add(&store, "taken").await;

        let rejected = store
            .insert(|id, existing: &[Item]| {
                if existing.iter().any(|i| i.name == "taken") {
                    return Err(StoreError::NotFound(id));
                }
                Ok(item(id, "taken"))
            })
            .await;
        assert_eq!(rejected, Err(StoreError::NotFound(2)));

        assert_eq!(add(&store, "fresh").await.id, 2);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_record_untouched() {
        let store = MemoryStore::new();
        let original = add(&store, "a").await;

        let result = store
            .update(original.id, |draft: &mut Item| {
                draft.name = "changed".to_string();
                Err("refused")
            })
            .await;
        assert_eq!(result, Err("refused"));
        assert_eq!(store.get(original.id).await, Some(original));
    }

    #[tokio::test]
    async fn test_update_and_remove_report_missing_ids() {
        let store: MemoryStore<Item> = MemoryStore::new();

        let updated = store.update(9, |_| Ok::<_, StoreError>(())).await;
        assert_eq!(updated, Ok(None));

        let removed = store.remove(9, |_| Ok::<_, StoreError>(())).await;
        assert_eq!(removed, Ok(None));
    }

    #[tokio::test]
    async fn test_guard_can_veto_removal() {
        let store = MemoryStore::new();
        let kept = add(&store, "a").await;

        let result = store.remove(kept.id, |_| Err("not yours")).await;
        assert_eq!(result, Err("not yours"));
        assert_eq!(store.get(kept.id).await, Some(kept));
    }

    #[tokio::test]
    async fn test_find_and_filter_keep_insertion_order() {
        let store = MemoryStore::new();
        add(&store, "apple").await;
        add(&store, "banana").await;
        add(&store, "avocado").await;

        let found = store.find(|i| i.name.starts_with('b')).await;
        assert_eq!(found.map(|i| i.id), Some(2));

        let names: Vec<String> = store
            .filter(|i| i.name.starts_with('a'))
            .await
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["apple", "avocado"]);

        assert_eq!(store.list().await.len(), 3);
    }
}
