use std::collections::HashSet;

use crate::concept::Concept;
use crate::error::LookupError;
use crate::progress::Progress;

use super::Resolver;

struct Frame<'c> {
    concept: &'c Concept,
    next: usize,
}

impl<'c> Resolver<'c> {
    /// All uncompleted prerequisites of `id`, direct and indirect, without duplicates.
    ///
    /// Collection is a depth-first walk over uncompleted prerequisites that appends a concept
    /// after everything below it (post-order), so a concept's own missing prerequisites end up
    /// before it. The result is then stably sorted by number of declared prerequisites,
    /// which puts foundational concepts first and keeps walk order among equals.
    ///
    /// The sort is a heuristic. When two concepts on one chain declare the same number of
    /// prerequisites their order comes from the walk, which is topological, but a concept
    /// declaring fewer prerequisites than one of its own ancestors would be moved before it.
    ///
    /// Completed concepts are not descended into. The target itself is never part of the result,
    /// even if cyclic data leads back to it.
    pub fn missing_prerequisites(
        &self,
        id: &str,
        progress: &Progress,
    ) -> Result<Vec<&'c Concept>, LookupError> {
        let target = self.concept(id)?;

        let mut visited: HashSet<&'c str> = HashSet::from([target.id.as_str()]);
        let mut collected: HashSet<&'c str> = HashSet::new();
        let mut missing: Vec<&'c Concept> = Vec::new();

        let mut push_missing = |concept: &'c Concept| {
            if concept.id != target.id && collected.insert(concept.id.as_str()) {
                missing.push(concept);
            }
        };

        let mut stack = vec![Frame {
            concept: target,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let concept = frame.concept;
            let Some(prerequisite) = concept.prerequisites.get(frame.next) else {
                stack.pop();
                // the target's own frame is the only one not appended
                if !stack.is_empty() {
                    push_missing(concept);
                }
                continue;
            };
            frame.next += 1;

            if progress.contains(prerequisite) {
                continue;
            }
            let Some(prerequisite) = self.catalog.concept(prerequisite) else {
                log::debug!("skipping unknown prerequisite {prerequisite:?} of {:?}", concept.id);
                continue;
            };

            if visited.insert(prerequisite.id.as_str()) {
                stack.push(Frame {
                    concept: prerequisite,
                    next: 0,
                });
            } else {
                // already explored (or on the current path, for cyclic data)
                push_missing(prerequisite);
            }
        }

        missing.sort_by_key(|c| c.prerequisites.len());

        log::debug!(
            "missing prerequisites of {id:?}: {:?}",
            missing.iter().map(|c| &c.id).collect::<Vec<_>>()
        );
        Ok(missing)
    }
}
