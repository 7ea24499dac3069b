use crate::resolve::LearningPath;

use super::{Layout, LayoutEdge, LayoutNode};

/// Spacing used by [`layout_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathSettings {
    /// Horizontal position of the first step.
    pub start_x: f64,
    /// Horizontal distance between steps.
    pub x_spacing: f64,
    /// Vertical position of even steps.
    pub base_y: f64,
    /// Vertical offset of every second step.
    pub zigzag: f64,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            start_x: 50.0,
            x_spacing: 200.0,
            base_y: 80.0,
            zigzag: 30.0,
        }
    }
}

/// Lays a [`LearningPath`] out left to right, alternating between two rows.
///
/// Node `i` gets `column = i` and `level = i % 2`. Edges join consecutive steps.
pub fn layout_path(path: &LearningPath<'_>, settings: &PathSettings) -> Layout {
    let nodes = path
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| LayoutNode {
            id: step.concept.id.clone(),
            x: settings.start_x + i as f64 * settings.x_spacing,
            y: settings.base_y + (i % 2) as f64 * settings.zigzag,
            level: i % 2,
            column: i,
            stagger: 0,
        })
        .collect();

    let edges = path
        .steps
        .windows(2)
        .map(|pair| LayoutEdge::new(&pair[0].concept.id, &pair[1].concept.id))
        .collect();

    Layout { nodes, edges }
}
