use std::collections::{HashMap, HashSet};

use crate::catalog::Catalog;
use crate::concept::Concept;

struct Frame<'c> {
    concept: &'c Concept,
    next: usize,
    /// Highest level among the prerequisites seen so far.
    best: Option<usize>,
}

/// Level of every concept: 0 without prerequisites, else one more than its highest prerequisite.
///
/// Prerequisite ids that are not in the catalog do not count.
/// On cyclic data, an edge back into the concept currently being computed counts as level 0,
/// so the result is an under-count for the concepts on the cycle rather than an endless walk.
pub fn levels(catalog: &Catalog) -> HashMap<&str, usize> {
    let mut memo: HashMap<&str, usize> = HashMap::with_capacity(catalog.len());

    for root in catalog {
        if memo.contains_key(root.id.as_str()) {
            continue;
        }

        let mut on_path: HashSet<&str> = HashSet::from([root.id.as_str()]);
        let mut stack = vec![Frame {
            concept: root,
            next: 0,
            best: None,
        }];

        while let Some(frame) = stack.last_mut() {
            let concept = frame.concept;
            let Some(prerequisite) = concept.prerequisites.get(frame.next) else {
                let level = frame.best.map_or(0, |best| best + 1);
                memo.insert(concept.id.as_str(), level);
                on_path.remove(concept.id.as_str());
                stack.pop();
                if let Some(parent) = stack.last_mut() {
                    parent.best = parent.best.max(Some(level));
                }
                continue;
            };
            frame.next += 1;

            let Some(prerequisite) = catalog.concept(prerequisite) else {
                continue;
            };
            if let Some(&level) = memo.get(prerequisite.id.as_str()) {
                frame.best = frame.best.max(Some(level));
            } else if on_path.contains(prerequisite.id.as_str()) {
                log::debug!(
                    "prerequisite cycle through {:?} while leveling {:?}",
                    prerequisite.id,
                    root.id
                );
                frame.best = frame.best.max(Some(0));
            } else {
                on_path.insert(prerequisite.id.as_str());
                stack.push(Frame {
                    concept: prerequisite,
                    next: 0,
                    best: None,
                });
            }
        }
    }

    memo
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::concept::Category::*;

    fn concept(id: &str, prerequisites: &[&str]) -> Concept {
        Concept::new(id, Mathematics).with_prerequisites(prerequisites.iter().copied())
    }

    #[test]
    fn test_longest_chain_wins() {
        let catalog = Catalog::new(vec![
            concept("top", &["a", "c"]),
            concept("a", &[]),
            concept("b", &["a"]),
            concept("c", &["b"]),
        ])
        .unwrap();
        let levels = levels(&catalog);

        assert_eq!(0, levels["a"]);
        assert_eq!(1, levels["b"]);
        assert_eq!(2, levels["c"]);
        assert_eq!(3, levels["top"]);
    }

    #[test]
    fn test_shared_ancestor_keeps_true_level() {
        // `z` is reached from `x` first; `y` must still see its real level
        let catalog = Catalog::new(vec![
            concept("w", &[]),
            concept("v", &["w"]),
            concept("z", &["v"]),
            concept("x", &["z"]),
            concept("y", &["z"]),
            concept("d", &["x", "y"]),
        ])
        .unwrap();
        let levels = levels(&catalog);

        assert_eq!(3, levels["x"]);
        assert_eq!(3, levels["y"]);
        assert_eq!(4, levels["d"]);
    }

    #[test]
    fn test_dangling_does_not_count() {
        let catalog = Catalog::new(vec![concept("d", &["ghost"])]).unwrap();
        assert_eq!(0, levels(&catalog)["d"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let catalog =
            Catalog::new(vec![concept("a", &["b"]), concept("b", &["a"]), concept("s", &["s"])])
                .unwrap();
        let levels = levels(&catalog);

        assert_eq!(2, levels["a"]);
        assert_eq!(1, levels["b"]);
        assert_eq!(1, levels["s"]);
    }

    #[test]
    fn test_builtin_levels() {
        let levels = levels(Catalog::builtin());

        assert_eq!(0, levels["numbers"]);
        assert_eq!(1, levels["addition"]);
        assert_eq!(3, levels["division"]);
        assert_eq!(0, levels["variables-prog"]);
    }
}
