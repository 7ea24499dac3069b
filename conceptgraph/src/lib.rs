#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![cfg_attr(not(docsrs), allow(rustdoc::broken_intra_doc_links))]
#![allow(unknown_lints)]
#![allow(unexpected_cfgs)]

mod concept;
pub use concept::{Category, CodeExample, Concept, Difficulty};

mod catalog;
pub use catalog::{Catalog, CatalogIssue};

mod error;
pub use error::{CatalogError, LookupError, StorageError};

pub mod layout;
pub mod progress;
pub mod resolve;

pub use layout::{layout, Layout, LayoutSettings};
pub use progress::{Progress, ProgressStore, StoreConfig};
pub use resolve::{Resolver, Status};

#[cfg(feature = "dot")]
pub mod render;

/// Build a [`Catalog`] from a compact literal, checked at compile time.
///
/// Syntax: entries `$id: $category [<- $prerequisite, ...];`,
/// where ids are identifiers or string literals and categories are lowercase [`Category`] names.
///
/// ```rust
/// use conceptgraph::{catalog, Resolver, Progress, Status};
///
/// let catalog = catalog! {
///     numbers: mathematics;
///     addition: mathematics <- numbers;
///     "algebra-basics": mathematics <- addition, numbers;
/// };
///
/// let resolver = Resolver::new(&catalog);
/// assert_eq!(Ok(Status::Locked), resolver.status("algebra-basics", &Progress::new()));
/// ```
///
/// The macro reports, in one compile error, every duplicate id, every prerequisite that is not
/// declared in the same invocation, and every prerequisite cycle:
///
/// ```compile_fail
/// use conceptgraph::catalog;
///
/// let catalog = catalog! {
///     a: logic <- b;
///     b: logic <- a;
/// };
/// ```
pub use conceptgraph_macros::catalog;
