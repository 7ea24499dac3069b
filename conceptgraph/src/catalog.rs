//! The static registry of concepts and their prerequisite edges.
//!
//! A [`Catalog`] is built once and never mutated afterwards.
//! Concepts live in a single vector in declaration order; all edges refer to concepts by id,
//! and an id index maps ids back into that vector.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use crate::concept::{Category, Concept};
use crate::error::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../data/concepts.json");

/// An immutable, ordered set of [`Concept`]s keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    concepts: Vec<Concept>,
    index: HashMap<String, usize>,
}

/// A data-integrity problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// `concept` lists `prerequisite`, which is not in the catalog.
    #[allow(missing_docs)]
    DanglingPrerequisite { concept: String, prerequisite: String },
    /// The ids form a prerequisite cycle. The first id is repeated at the end.
    Cycle(Vec<String>),
}

impl Display for CatalogIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogIssue::DanglingPrerequisite {
                concept,
                prerequisite,
            } => write!(f, "{concept} requires unknown concept {prerequisite}"),
            CatalogIssue::Cycle(ids) => write!(f, "prerequisite cycle: {}", ids.join(" -> ")),
        }
    }
}

impl Catalog {
    /// Builds a catalog, keeping the given order.
    ///
    /// Fails on duplicate ids. Dangling prerequisites and cycles are accepted here;
    /// see [`Catalog::validate`].
    pub fn new(concepts: Vec<Concept>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(concepts.len());
        for (i, concept) in concepts.iter().enumerate() {
            if index.insert(concept.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateConcept(concept.id.clone()));
            }
        }
        Ok(Self { concepts, index })
    }

    /// Used by the `catalog!` macro, which rejects duplicate ids at compile time.
    #[doc(hidden)]
    pub fn from_validated(concepts: Vec<Concept>) -> Self {
        let mut index = HashMap::with_capacity(concepts.len());
        for (i, concept) in concepts.iter().enumerate() {
            index.entry(concept.id.clone()).or_insert(i);
        }
        Self { concepts, index }
    }

    /// Parses a JSON array of concepts (camelCase fields).
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let concepts: Vec<Concept> = serde_json::from_str(json)?;
        Self::new(concepts)
    }

    /// The compiled-in concept catalog.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let catalog = Catalog::from_json(BUILTIN_CATALOG)
                .expect("builtin catalog is checked by the test suite");
            for issue in catalog.validate() {
                log::warn!("builtin catalog: {issue}");
            }
            log::info!("loaded builtin catalog with {} concepts", catalog.len());
            catalog
        })
    }

    /// Looks up a concept by id.
    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.index.get(id).map(|&i| &self.concepts[i])
    }

    /// Whether `id` is in the catalog.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    /// Number of concepts.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Whether the catalog has no concepts.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Concepts of one category, in catalog order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Concept> {
        self.concepts.iter().filter(move |c| c.category == category)
    }

    /// Concepts whose title, description or a key point contains `query`, ignoring case.
    ///
    /// A blank query matches nothing. At most `limit` results, in catalog order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Concept> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.concepts
            .iter()
            .filter(|c| c.matches_lowercase(&needle))
            .take(limit)
            .collect()
    }

    /// The first concept whose title is exactly `title`.
    pub fn find_by_title(&self, title: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.title == title)
    }

    /// Reports dangling prerequisite ids and prerequisite cycles.
    ///
    /// Neither is fatal anywhere else in this crate: traversals drop dangling ids and
    /// stop at revisited nodes.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for concept in &self.concepts {
            for prerequisite in &concept.prerequisites {
                if !self.contains(prerequisite) {
                    issues.push(CatalogIssue::DanglingPrerequisite {
                        concept: concept.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }

        // iterative DFS over prerequisite edges; a back edge to a node on the
        // current path closes a cycle
        let mut done: HashSet<usize> = HashSet::new();
        for root in 0..self.concepts.len() {
            if done.contains(&root) {
                continue;
            }
            let mut path: Vec<usize> = vec![root];
            let mut on_path: HashMap<usize, usize> = HashMap::from([(root, 0)]);
            let mut cursors: Vec<usize> = vec![0];

            while let Some(&node) = path.last() {
                let depth = path.len() - 1;
                let prerequisites = &self.concepts[node].prerequisites;

                if cursors[depth] == prerequisites.len() {
                    path.pop();
                    cursors.pop();
                    on_path.remove(&node);
                    done.insert(node);
                    continue;
                }

                let next = &prerequisites[cursors[depth]];
                cursors[depth] += 1;

                let Some(&next) = self.index.get(next) else {
                    continue;
                };
                if let Some(&start) = on_path.get(&next) {
                    let mut cycle: Vec<String> = path[start..]
                        .iter()
                        .map(|&i| self.concepts[i].id.clone())
                        .collect();
                    cycle.push(self.concepts[next].id.clone());
                    issues.push(CatalogIssue::Cycle(cycle));
                } else if !done.contains(&next) {
                    on_path.insert(next, path.len());
                    path.push(next);
                    cursors.push(0);
                }
            }
        }

        issues
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Concept;
    type IntoIter = std::slice::Iter<'a, Concept>;

    fn into_iter(self) -> Self::IntoIter {
        self.concepts.iter()
    }
}
