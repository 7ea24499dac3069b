//! Queries combining a [`Catalog`] with a user's [`Progress`].
//!
//! Nothing here is cached: every call derives its answer from the two inputs.
//!
//! Lookups the caller asks for directly report unknown ids as [`LookupError::UnknownConcept`].
//! Lookups made while walking the graph silently skip prerequisite ids that are not in the
//! catalog, and never visit a concept twice, so cyclic data cannot make them loop.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::concept::Concept;
use crate::error::LookupError;
use crate::progress::Progress;

mod missing;

mod path;
pub use path::*;

/// Derived state of a concept. Never stored.
///
/// For a single concept the only forward transitions are `Locked -> Available -> Completed`;
/// only a reset of the whole progress moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// At least one prerequisite is not completed.
    Locked,
    /// Not completed, and every prerequisite is.
    Available,
    /// In the completed set.
    Completed,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Locked => "locked",
            Status::Available => "available",
            Status::Completed => "completed",
        })
    }
}

/// Read-only queries over a catalog. Cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'c> {
    catalog: &'c Catalog,
}

impl<'c> Resolver<'c> {
    /// Creates a resolver over `catalog`.
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// The catalog this resolver queries.
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Looks up `id`, reporting a miss as an error.
    pub fn concept(&self, id: &str) -> Result<&'c Concept, LookupError> {
        self.catalog
            .concept(id)
            .ok_or_else(|| LookupError::UnknownConcept(id.to_string()))
    }

    /// Classifies `id` against `progress`.
    ///
    /// Only direct prerequisites are checked. Indirect ones are satisfied by induction:
    /// a prerequisite could only have been completed once its own prerequisites were.
    /// Prerequisite ids missing from the catalog are ignored.
    pub fn status(&self, id: &str, progress: &Progress) -> Result<Status, LookupError> {
        let concept = self.concept(id)?;
        Ok(self.status_of(concept, progress))
    }

    /// Like [`status`](Self::status), but unknown ids are [`Status::Locked`].
    ///
    /// Meant for ids coming from persisted state, which may mention concepts that no longer exist.
    pub fn status_or_locked(&self, id: &str, progress: &Progress) -> Status {
        self.catalog
            .concept(id)
            .map(|concept| self.status_of(concept, progress))
            .unwrap_or(Status::Locked)
    }

    pub(crate) fn status_of(&self, concept: &Concept, progress: &Progress) -> Status {
        if progress.contains(&concept.id) {
            Status::Completed
        } else if self.prerequisites_met(concept, progress) {
            Status::Available
        } else {
            Status::Locked
        }
    }

    fn prerequisites_met(&self, concept: &Concept, progress: &Progress) -> bool {
        concept
            .prerequisites
            .iter()
            .filter(|p| self.catalog.contains(p))
            .all(|p| progress.contains(p))
    }

    /// True if `id` is completed or could be started now. False for unknown ids.
    pub fn is_available(&self, id: &str, progress: &Progress) -> bool {
        self.catalog.concept(id).is_some_and(|concept| {
            progress.contains(&concept.id) || self.prerequisites_met(concept, progress)
        })
    }

    /// Direct prerequisites of `id`, in declaration order.
    ///
    /// Prerequisite ids that are not in the catalog are dropped.
    pub fn prerequisites_of(&self, id: &str) -> Result<Vec<&'c Concept>, LookupError> {
        let concept = self.concept(id)?;
        Ok(concept
            .prerequisites
            .iter()
            .filter_map(|p| self.catalog.concept(p))
            .collect())
    }

    /// Every concept that lists `id` as a direct prerequisite, in catalog order.
    pub fn dependents_of(&self, id: &str) -> Result<Vec<&'c Concept>, LookupError> {
        let concept = self.concept(id)?;
        Ok(self
            .catalog
            .iter()
            .filter(|c| c.requires(&concept.id))
            .collect())
    }
}
