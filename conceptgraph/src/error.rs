use thiserror::Error;

/// A caller asked about a concept id the catalog does not contain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The id is not in the catalog.
    #[error("unknown concept: {0}")]
    UnknownConcept(String),
}

/// Building a [`Catalog`](crate::Catalog) from user-supplied data failed.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The JSON did not describe a list of concepts.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two concepts share an id.
    #[error("duplicate concept id: {0}")]
    DuplicateConcept(String),
}

/// A [`Storage`](crate::progress::Storage) backend could not read or write a blob.
///
/// The progress store never propagates these; they are logged and the store
/// continues with its in-memory state.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend failed to read or write.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The key cannot be used as a file name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    /// Progress could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
