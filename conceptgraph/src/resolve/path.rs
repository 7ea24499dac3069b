use serde::Serialize;

use crate::concept::Concept;
use crate::error::LookupError;
use crate::progress::Progress;

use super::{Resolver, Status};

/// One stop on a [`LearningPath`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStep<'c> {
    #[allow(missing_docs)]
    pub concept: &'c Concept,
    /// 1-based position in the path.
    pub step: usize,
    /// Status at the time the path was computed.
    pub status: Status,
    /// Set on the last step only.
    pub is_target: bool,
}

/// What to learn, in order, to reach a target concept: its missing prerequisites, then the target.
#[derive(Debug, Clone, Serialize)]
pub struct LearningPath<'c> {
    /// The concept the path leads to.
    pub target: &'c Concept,
    /// Prerequisites first, the target last.
    pub steps: Vec<PathStep<'c>>,
}

impl<'c> LearningPath<'c> {
    /// Number of steps, including the target.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Never true for a path built by [`Resolver::learning_path`].
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Concept ids in step order.
    pub fn ids(&self) -> impl Iterator<Item = &'c str> + '_ {
        self.steps.iter().map(|s| s.concept.id.as_str())
    }
}

impl<'c> Resolver<'c> {
    /// The [`missing_prerequisites`](Self::missing_prerequisites) of `id` followed by `id` itself.
    pub fn learning_path(
        &self,
        id: &str,
        progress: &Progress,
    ) -> Result<LearningPath<'c>, LookupError> {
        let target = self.concept(id)?;
        let missing = self.missing_prerequisites(id, progress)?;

        let steps = missing
            .into_iter()
            .chain(std::iter::once(target))
            .enumerate()
            .map(|(i, concept)| PathStep {
                concept,
                step: i + 1,
                status: self.status_of(concept, progress),
                is_target: concept.id == target.id,
            })
            .collect();

        Ok(LearningPath { target, steps })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::Catalog;
    use crate::concept::Category::*;

    #[test]
    fn test_learning_path() {
        let catalog = Catalog::new(vec![
            Concept::new("a", Logic),
            Concept::new("b", Logic).with_prerequisites(["a"]),
            Concept::new("c", Logic).with_prerequisites(["b"]),
        ])
        .unwrap();
        let resolver = Resolver::new(&catalog);

        let path = resolver.learning_path("c", &Progress::new()).unwrap();
        assert_eq!(vec!["a", "b", "c"], path.ids().collect::<Vec<_>>());
        assert_eq!(
            vec![Status::Available, Status::Locked, Status::Locked],
            path.steps.iter().map(|s| s.status).collect::<Vec<_>>()
        );
        assert_eq!(vec![1, 2, 3], path.steps.iter().map(|s| s.step).collect::<Vec<_>>());
        assert!(path.steps[2].is_target);
        assert!(!path.steps[0].is_target);
    }

    #[test]
    fn test_path_to_available_concept_is_just_the_target() {
        let catalog = Catalog::new(vec![Concept::new("a", Logic)]).unwrap();
        let resolver = Resolver::new(&catalog);

        let path = resolver.learning_path("a", &Progress::new()).unwrap();
        assert_eq!(1, path.len());
        assert_eq!("a", path.target.id);
    }
}
