//! User progress: the set of completed concept ids, and a store that keeps it durable.
//!
//! [`Progress`] is the plain value the resolver reads.
//! [`ProgressStore`] owns one, applies the two allowed mutations ([`complete`](ProgressStore::complete)
//! and [`reset`](ProgressStore::reset)) and writes the whole set to a [`Storage`] after every change.
//!
//! Status is never stored. Every query recomputes it from the catalog and the current progress.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::concept::{Category, Concept};
use crate::error::{LookupError, StorageError};
use crate::resolve::{LearningPath, Resolver, Status};

mod storage;
pub use storage::*;

mod summary;
pub use summary::*;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "building-blocks-progress";

/// Version written into the persisted envelope. Blobs with another version are discarded.
const BLOB_VERSION: u32 = 0;

/// The set of completed concept ids.
///
/// Ids appear at most once. Insertion order is kept so the persisted blob is stable,
/// but nothing in this crate depends on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Progress {
    order: Vec<String>,
    completed: HashSet<String>,
}

impl Progress {
    /// No completed concepts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as completed. Returns false if it already was.
    pub fn complete(&mut self, id: &str) -> bool {
        if self.completed.contains(id) {
            return false;
        }
        self.completed.insert(id.to_string());
        self.order.push(id.to_string());
        true
    }

    /// Forgets every completed concept.
    pub fn reset(&mut self) {
        self.order.clear();
        self.completed.clear();
    }

    /// Whether `id` is completed.
    pub fn contains(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    /// Iterates in completion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of completed ids, including ids not in any catalog.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is completed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl PartialEq for Progress {
    fn eq(&self, other: &Self) -> bool {
        self.completed == other.completed
    }
}

impl Eq for Progress {}

impl<S: AsRef<str>> FromIterator<S> for Progress {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut progress = Progress::new();
        for id in iter {
            progress.complete(id.as_ref());
        }
        progress
    }
}

impl From<Vec<String>> for Progress {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<Progress> for Vec<String> {
    fn from(progress: Progress) -> Self {
        progress.order
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    completed_concepts: Progress,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    state: PersistedState,
    version: u32,
}

impl Progress {
    /// Encodes the persisted blob: `{"state":{"completedConcepts":[..]},"version":0}`.
    pub fn to_blob(&self) -> Result<String, StorageError> {
        let envelope = Envelope {
            state: PersistedState {
                completed_concepts: self.clone(),
            },
            version: BLOB_VERSION,
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Decodes a persisted blob. Anything malformed, or written by another version, yields `None`.
    pub fn from_blob(blob: &str) -> Option<Self> {
        match serde_json::from_str::<Envelope>(blob) {
            Ok(envelope) if envelope.version == BLOB_VERSION => {
                Some(envelope.state.completed_concepts)
            }
            Ok(envelope) => {
                log::warn!(
                    "discarding progress blob with unsupported version {}",
                    envelope.version
                );
                None
            }
            Err(e) => {
                log::warn!("discarding malformed progress blob: {e}");
                None
            }
        }
    }
}

/// Settings for a [`ProgressStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key under which the progress blob is stored.
    pub key: String,
}

impl StoreConfig {
    /// Stores progress under `key` instead of [`DEFAULT_STORAGE_KEY`].
    pub fn with_key(mut self, key: impl AsRef<str>) -> Self {
        self.key = key.as_ref().to_string();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Owns the current [`Progress`] and keeps it in sync with a [`Storage`].
///
/// There is a single writer: the store is passed explicitly to whatever needs to mutate progress.
/// Storage failures are logged and otherwise ignored; the in-memory state stays authoritative.
pub struct ProgressStore<'c, S: Storage> {
    resolver: Resolver<'c>,
    progress: Progress,
    storage: S,
    config: StoreConfig,
}

impl<'c, S: Storage> ProgressStore<'c, S> {
    /// Loads progress from `storage`.
    ///
    /// Missing, unreadable or malformed data all start the store empty.
    pub fn open(catalog: &'c Catalog, storage: S, config: StoreConfig) -> Self {
        let progress = match storage.read(&config.key) {
            Ok(Some(blob)) => Progress::from_blob(&blob).unwrap_or_default(),
            Ok(None) => Progress::default(),
            Err(e) => {
                log::warn!("could not read progress under {:?}: {e}", config.key);
                Progress::default()
            }
        };
        log::debug!(
            "opened progress store {:?} with {} completed concepts",
            config.key,
            progress.len()
        );

        Self {
            resolver: Resolver::new(catalog),
            progress,
            storage,
            config,
        }
    }

    /// The catalog statuses are computed against.
    pub fn catalog(&self) -> &'c Catalog {
        self.resolver.catalog()
    }

    /// A resolver over the same catalog, for queries against other progress values.
    pub fn resolver(&self) -> Resolver<'c> {
        self.resolver
    }

    /// The current completed set.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Gives the storage back, e.g. to reopen a store on it.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Marks `id` as completed. Completing an already completed concept changes nothing.
    ///
    /// Ids unknown to the catalog are recorded anyway, the same way stale persisted ids are kept.
    pub fn complete(&mut self, id: &str) {
        if !self.resolver.catalog().contains(id) {
            log::warn!("completing concept {id:?} which is not in the catalog");
        }
        if self.progress.complete(id) {
            self.persist();
        }
    }

    /// Clears all progress.
    pub fn reset(&mut self) {
        self.progress.reset();
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.write_blob() {
            log::warn!("could not persist progress under {:?}: {e}", self.config.key);
        }
    }

    fn write_blob(&mut self) -> Result<(), StorageError> {
        let blob = self.progress.to_blob()?;
        self.storage.write(&self.config.key, &blob)
    }

    /// See [`Resolver::status`].
    pub fn status(&self, id: &str) -> Result<Status, LookupError> {
        self.resolver.status(id, &self.progress)
    }

    /// Like [`status`](Self::status), but unknown ids are reported as locked.
    pub fn status_or_locked(&self, id: &str) -> Status {
        self.resolver.status_or_locked(id, &self.progress)
    }

    /// See [`Resolver::is_available`].
    pub fn is_available(&self, id: &str) -> bool {
        self.resolver.is_available(id, &self.progress)
    }

    /// See [`Resolver::missing_prerequisites`].
    pub fn missing_prerequisites(&self, id: &str) -> Result<Vec<&'c Concept>, LookupError> {
        self.resolver.missing_prerequisites(id, &self.progress)
    }

    /// See [`Resolver::learning_path`].
    pub fn learning_path(&self, id: &str) -> Result<LearningPath<'c>, LookupError> {
        self.resolver.learning_path(id, &self.progress)
    }

    /// Overall completion, counting catalog concepts only.
    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary::new(self.resolver.catalog(), &self.progress)
    }

    /// Completion within one category.
    pub fn category_progress(&self, category: Category) -> CategoryProgress {
        CategoryProgress::new(self.resolver.catalog(), &self.progress, category)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::concept::Category::*;

    fn abc() -> Catalog {
        Catalog::new(vec![
            Concept::new("a", Mathematics),
            Concept::new("b", Mathematics).with_prerequisites(["a"]),
            Concept::new("c", Mathematics).with_prerequisites(["b"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut once = Progress::new();
        once.complete("a");

        let mut twice = Progress::new();
        assert!(twice.complete("a"));
        assert!(!twice.complete("a"));

        assert_eq!(once, twice);
        assert_eq!(1, twice.len());
    }

    #[test]
    fn test_equality_ignores_order() {
        let ab: Progress = ["a", "b"].into_iter().collect();
        let ba: Progress = ["b", "a"].into_iter().collect();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_blob_shape() {
        let progress: Progress = ["numbers", "addition"].into_iter().collect();
        assert_eq!(
            r#"{"state":{"completedConcepts":["numbers","addition"]},"version":0}"#,
            progress.to_blob().unwrap()
        );
    }

    #[test]
    fn test_blob_duplicates_collapse() {
        let progress =
            Progress::from_blob(r#"{"state":{"completedConcepts":["a","b","a"]},"version":0}"#)
                .unwrap();
        assert_eq!(vec!["a", "b"], progress.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_bad_blobs_are_discarded() {
        assert!(Progress::from_blob("not json").is_none());
        assert!(Progress::from_blob(r#"{"state":{}}"#).is_none());
        assert!(Progress::from_blob(r#"["a"]"#).is_none());
        assert!(
            Progress::from_blob(r#"{"state":{"completedConcepts":["a"]},"version":7}"#).is_none()
        );
    }

    #[test]
    fn test_store_survives_restart() {
        let catalog = abc();
        let mut storage = MemoryStorage::new();

        {
            let mut store = ProgressStore::open(&catalog, &mut storage, StoreConfig::default());
            store.complete("a");
            store.complete("b");
        }

        let store = ProgressStore::open(&catalog, &mut storage, StoreConfig::default());
        assert_eq!(Ok(Status::Completed), store.status("b"));
        assert_eq!(Ok(Status::Available), store.status("c"));
    }

    #[test]
    fn test_store_starts_empty_on_corrupt_blob() {
        let catalog = abc();
        let storage = MemoryStorage::new().with_blob(DEFAULT_STORAGE_KEY, "{{{{");

        let store = ProgressStore::open(&catalog, storage, StoreConfig::default());
        assert!(store.progress().is_empty());
    }

    #[test]
    fn test_store_uses_configured_key() {
        let catalog = abc();
        let mut store = ProgressStore::open(
            &catalog,
            MemoryStorage::new(),
            StoreConfig::default().with_key("other"),
        );
        store.complete("a");

        let storage = store.into_storage();
        assert!(storage.get(DEFAULT_STORAGE_KEY).is_none());
        assert!(storage.get("other").unwrap().contains("\"a\""));
    }

    #[test]
    fn test_reset_persists_empty_set() {
        let catalog = abc();
        let mut store = ProgressStore::open(&catalog, MemoryStorage::new(), StoreConfig::default());
        store.complete("a");
        store.reset();

        assert_eq!(Ok(Status::Available), store.status("a"));
        let storage = store.into_storage();
        assert_eq!(
            Some(r#"{"state":{"completedConcepts":[]},"version":0}"#),
            storage.get(DEFAULT_STORAGE_KEY)
        );
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("unreadable").into())
        }

        fn write(&mut self, _key: &str, _blob: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    #[test]
    fn test_storage_failures_are_not_fatal() {
        let catalog = abc();
        let mut store = ProgressStore::open(&catalog, FailingStorage, StoreConfig::default());
        assert!(store.progress().is_empty());

        store.complete("a");
        assert_eq!(Ok(Status::Completed), store.status("a"));
    }
}
