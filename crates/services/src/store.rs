//! Shared, persisted collections.
//!
//! # Responsibility
//! - Hold one insertion-ordered collection in memory, loaded lazily from the
//!   [`PersistentStore`] on first access.
//! - Write the whole collection back after every mutation.
//! - Notify subscribers with the updated collection after every mutation.
//!
//! # Invariants
//! - Mutations never fail: a rejected write is logged by the persistent store
//!   and the in-memory state is kept.
//! - No mutation cascades into another collection.
//! - Ids are not checked for uniqueness; a duplicate id shadows later records
//!   for `get`/`update`/`remove`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use storage::{PersistentStore, keys};
use study_core::model::{
    ExamCountdown, ExamId, ExamPatch, Milestone, MilestoneId, MilestonePatch, ProgressEntry,
    ProgressEntryId, ProgressEntryPatch, Subject, SubjectId, SubjectPatch,
};

/// A record type that can live in a [`CollectionStore`].
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: PartialEq + fmt::Display;
    type Patch;

    /// Durable storage key for the collection.
    const KEY: &'static str;
    /// Collection name used in log events.
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;
    fn apply(&mut self, patch: Self::Patch);
}

impl Record for Subject {
    type Id = SubjectId;
    type Patch = SubjectPatch;
    const KEY: &'static str = keys::SUBJECTS;
    const COLLECTION: &'static str = "subjects";

    fn id(&self) -> &SubjectId {
        Subject::id(self)
    }

    fn apply(&mut self, patch: SubjectPatch) {
        Subject::apply(self, patch);
    }
}

impl Record for Milestone {
    type Id = MilestoneId;
    type Patch = MilestonePatch;
    const KEY: &'static str = keys::MILESTONES;
    const COLLECTION: &'static str = "milestones";

    fn id(&self) -> &MilestoneId {
        Milestone::id(self)
    }

    fn apply(&mut self, patch: MilestonePatch) {
        Milestone::apply(self, patch);
    }
}

impl Record for ProgressEntry {
    type Id = ProgressEntryId;
    type Patch = ProgressEntryPatch;
    const KEY: &'static str = keys::PROGRESS_ENTRIES;
    const COLLECTION: &'static str = "progress_entries";

    fn id(&self) -> &ProgressEntryId {
        ProgressEntry::id(self)
    }

    fn apply(&mut self, patch: ProgressEntryPatch) {
        ProgressEntry::apply(self, patch);
    }
}

impl Record for ExamCountdown {
    type Id = ExamId;
    type Patch = ExamPatch;
    const KEY: &'static str = keys::EXAM_COUNTDOWNS;
    const COLLECTION: &'static str = "exam_countdowns";

    fn id(&self) -> &ExamId {
        ExamCountdown::id(self)
    }

    fn apply(&mut self, patch: ExamPatch) {
        ExamCountdown::apply(self, patch);
    }
}

/// Handle returned by [`CollectionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Arc<dyn Fn(&[T]) + Send + Sync>;

/// CRUD over one persisted collection.
pub struct CollectionStore<T: Record> {
    persistence: PersistentStore,
    seed: Vec<T>,
    items: Mutex<Option<Vec<T>>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<T>)>>,
    next_subscription: AtomicU64,
}

pub type SubjectStore = CollectionStore<Subject>;
pub type MilestoneStore = CollectionStore<Milestone>;
pub type ProgressStore = CollectionStore<ProgressEntry>;
pub type CountdownStore = CollectionStore<ExamCountdown>;

impl<T: Record> CollectionStore<T> {
    /// A store with no seed: starts empty when nothing is persisted.
    #[must_use]
    pub fn new(persistence: PersistentStore) -> Self {
        Self::with_seed(persistence, Vec::new())
    }

    /// A store that adopts `seed` when nothing usable is persisted yet.
    #[must_use]
    pub fn with_seed(persistence: PersistentStore, seed: Vec<T>) -> Self {
        Self {
            persistence,
            seed,
            items: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    /// Load the collection if it has not been loaded yet. Idempotent; every
    /// other method calls it implicitly.
    pub fn initialize(&self) {
        let mut guard = self.lock_items();
        self.loaded(&mut guard);
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.lock_items().is_some()
    }

    /// Snapshot of the collection in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<T> {
        self.with_items(<[T]>::to_vec)
    }

    #[must_use]
    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.with_items(|items| items.iter().find(|item| item.id() == id).cloned())
    }

    #[must_use]
    pub fn contains(&self, id: &T::Id) -> bool {
        self.with_items(|items| items.iter().any(|item| item.id() == id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.with_items(<[T]>::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` over the current collection without cloning it.
    ///
    /// `f` must not call back into this store.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let mut guard = self.lock_items();
        f(self.loaded(&mut guard))
    }

    /// Append `record` and persist.
    pub fn add(&self, record: T) {
        debug!(
            "event=store_add module=services collection={} id={}",
            T::COLLECTION,
            record.id()
        );
        self.commit(|items| {
            items.push(record);
            true
        });
    }

    /// Merge `patch` into the record with `id`. Returns `false` (and writes
    /// nothing) if there is no such record.
    pub fn update(&self, id: &T::Id, patch: T::Patch) -> bool {
        let updated = self.commit(|items| match items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        });
        debug!(
            "event=store_update module=services collection={} id={id} matched={updated}",
            T::COLLECTION
        );
        updated
    }

    /// Remove the record with `id`. Returns `false` if there is no such record.
    pub fn remove(&self, id: &T::Id) -> bool {
        let removed = self.commit(|items| match items.iter().position(|item| item.id() == id) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        });
        debug!(
            "event=store_remove module=services collection={} id={id} matched={removed}",
            T::COLLECTION
        );
        removed
    }

    /// Remove every record matching `predicate`; returns how many were removed.
    pub fn remove_where(&self, predicate: impl Fn(&T) -> bool) -> usize {
        let mut removed = 0;
        self.commit(|items| {
            let before = items.len();
            items.retain(|item| !predicate(item));
            removed = before - items.len();
            removed > 0
        });
        removed
    }

    /// Register `listener` to receive the full collection after each mutation.
    pub fn subscribe(&self, listener: impl Fn(&[T]) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Detach a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Apply `change` under the lock; when it reports a change, persist and
    /// notify subscribers once the lock is released.
    pub(crate) fn commit(&self, change: impl FnOnce(&mut Vec<T>) -> bool) -> bool {
        let snapshot = {
            let mut guard = self.lock_items();
            let items = self.loaded(&mut guard);
            if !change(items) {
                return false;
            }
            self.persistence.save(T::KEY, items.as_slice());
            items.clone()
        };
        self.notify(&snapshot);
        true
    }

    fn notify(&self, snapshot: &[T]) {
        let listeners: Vec<Listener<T>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }

    fn lock_items(&self) -> MutexGuard<'_, Option<Vec<T>>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn loaded<'a>(&self, slot: &'a mut Option<Vec<T>>) -> &'a mut Vec<T> {
        slot.get_or_insert_with(|| {
            let (items, seeded) = match self.persistence.try_load(T::KEY) {
                Ok(Some(items)) => (items, false),
                Ok(None) => {
                    if !self.seed.is_empty() {
                        self.persistence.save(T::KEY, self.seed.as_slice());
                    }
                    (self.seed.clone(), true)
                }
                // Unreadable data stays on disk until the next mutation.
                Err(err) => {
                    warn!(
                        "event=store_init module=services status=unreadable collection={} error={err}",
                        T::COLLECTION
                    );
                    (self.seed.clone(), true)
                }
            };
            info!(
                "event=store_init module=services collection={} count={} seeded={seeded}",
                T::COLLECTION,
                items.len()
            );
            items
        })
    }
}
