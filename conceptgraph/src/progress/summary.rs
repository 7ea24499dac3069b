use serde::Serialize;

use crate::catalog::Catalog;
use crate::concept::Category;

use super::Progress;

/// Overall completion numbers. Completed ids that are not in the catalog are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSummary {
    /// Catalog concepts that are completed.
    pub completed: usize,
    /// Concepts in the catalog.
    pub total: usize,
    /// `completed / total * 100`, or 0 for an empty catalog.
    pub percentage: f64,
}

impl ProgressSummary {
    /// Counts `progress` against `catalog`.
    pub fn new(catalog: &Catalog, progress: &Progress) -> Self {
        let completed = catalog.iter().filter(|c| progress.contains(&c.id)).count();
        let total = catalog.len();
        let percentage = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// Completion numbers for a single [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct CategoryProgress {
    pub category: Category,
    pub completed: usize,
    pub total: usize,
}

impl CategoryProgress {
    /// Counts `progress` against the concepts of `category`.
    pub fn new(catalog: &Catalog, progress: &Progress, category: Category) -> Self {
        let (completed, total) = catalog
            .in_category(category)
            .fold((0, 0), |(completed, total), c| {
                (completed + usize::from(progress.contains(&c.id)), total + 1)
            });
        Self {
            category,
            completed,
            total,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::concept::Concept;
    use crate::concept::Category::*;

    #[test]
    fn test_summary_ignores_stale_ids() {
        let catalog = Catalog::new(vec![
            Concept::new("a", Mathematics),
            Concept::new("b", Logic),
            Concept::new("c", Logic),
            Concept::new("d", Logic),
        ])
        .unwrap();
        let progress: Progress = ["a", "removed-long-ago"].into_iter().collect();

        let summary = ProgressSummary::new(&catalog, &progress);
        assert_eq!(1, summary.completed);
        assert_eq!(4, summary.total);
        assert_eq!(25.0, summary.percentage);
    }

    #[test]
    fn test_empty_catalog() {
        let summary = ProgressSummary::new(&Catalog::default(), &Progress::new());
        assert_eq!(0.0, summary.percentage);
    }

    #[test]
    fn test_category_progress() {
        let catalog = Catalog::new(vec![
            Concept::new("a", Mathematics),
            Concept::new("b", Logic),
            Concept::new("c", Logic),
        ])
        .unwrap();
        let progress: Progress = ["a", "b"].into_iter().collect();

        assert_eq!(
            CategoryProgress {
                category: Logic,
                completed: 1,
                total: 2
            },
            CategoryProgress::new(&catalog, &progress, Logic)
        );
        assert_eq!(0, CategoryProgress::new(&catalog, &progress, Science).total);
    }
}
