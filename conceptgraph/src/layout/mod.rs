//! Hierarchical positions for drawing a [`Catalog`] as a graph.
//!
//! Layout depends on the catalog alone, never on progress; renderers decorate nodes with
//! [`Status`](crate::resolve::Status) themselves.
//!
//! Each category owns a column band and each [level](levels) a row.
//! Concepts sharing a category and a level are numbered in catalog order
//! and shifted right by that number, so they do not render on top of each other.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::concept::Category;

mod levels;
pub use levels::levels;

mod path;
pub use path::*;

/// Spacing used by [`layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    /// Horizontal distance between category columns.
    pub x_spacing: f64,
    /// Vertical distance between levels.
    pub y_spacing: f64,
    /// Horizontal shift per concept sharing a category and a level.
    pub stagger_step: f64,
    /// Vertical position of level 0.
    pub y_offset: f64,
}

impl LayoutSettings {
    /// Sets [`x_spacing`](Self::x_spacing).
    pub fn with_x_spacing(mut self, x_spacing: f64) -> Self {
        self.x_spacing = x_spacing;
        self
    }

    /// Sets [`y_spacing`](Self::y_spacing).
    pub fn with_y_spacing(mut self, y_spacing: f64) -> Self {
        self.y_spacing = y_spacing;
        self
    }

    /// Sets [`stagger_step`](Self::stagger_step).
    pub fn with_stagger_step(mut self, stagger_step: f64) -> Self {
        self.stagger_step = stagger_step;
        self
    }

    /// Sets [`y_offset`](Self::y_offset).
    pub fn with_y_offset(mut self, y_offset: f64) -> Self {
        self.y_offset = y_offset;
        self
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            x_spacing: 280.0,
            y_spacing: 180.0,
            stagger_step: 60.0,
            y_offset: 100.0,
        }
    }
}

/// A positioned concept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    /// Id of the concept drawn here.
    pub id: String,
    #[allow(missing_docs)]
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
    /// Row index.
    pub level: usize,
    /// Column band index.
    pub column: usize,
    /// Position among the nodes sharing this row and band.
    pub stagger: usize,
}

/// A directed edge from a prerequisite to the concept requiring it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    /// `<from>-<to>`, for display purposes.
    ///
    /// Not unique when concept ids contain `-`: `x-y -> z` and `x -> y-z` both get `x-y-z`.
    /// Key edges on `(from, to)` instead, see [`Layout::edge`].
    pub id: String,
    /// The prerequisite.
    pub from: String,
    /// The concept requiring it.
    pub to: String,
}

impl LayoutEdge {
    /// An edge from prerequisite `from` to dependent `to`.
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            id: format!("{from}-{to}"),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Nodes and edges ready to be painted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[allow(missing_docs)]
    pub nodes: Vec<LayoutNode>,
    #[allow(missing_docs)]
    pub edges: Vec<LayoutEdge>,
}

impl Layout {
    /// The node drawn for concept `id`.
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The edge from prerequisite `from` to dependent `to`.
    pub fn edge(&self, from: &str, to: &str) -> Option<&LayoutEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }
}

/// Positions every concept of `catalog` and lists one edge per resolvable prerequisite.
///
/// `x = column * x_spacing + stagger * stagger_step`, `y = level * y_spacing + y_offset`.
/// Nodes and edges follow catalog order, so the same catalog always yields the same layout.
pub fn layout(catalog: &Catalog, settings: &LayoutSettings) -> Layout {
    let levels = levels(catalog);
    let mut stagger: HashMap<(Category, usize), usize> = HashMap::new();

    let nodes = catalog
        .iter()
        .map(|concept| {
            let level = levels.get(concept.id.as_str()).copied().unwrap_or(0);
            let column = concept.category.column();

            let slot = stagger.entry((concept.category, level)).or_insert(0);
            let index = *slot;
            *slot += 1;

            LayoutNode {
                id: concept.id.clone(),
                x: column as f64 * settings.x_spacing + index as f64 * settings.stagger_step,
                y: level as f64 * settings.y_spacing + settings.y_offset,
                level,
                column,
                stagger: index,
            }
        })
        .collect();

    let edges = catalog
        .iter()
        .flat_map(|concept| {
            concept
                .prerequisites
                .iter()
                .filter(|p| catalog.contains(p))
                .map(|p| LayoutEdge::new(p, &concept.id))
        })
        .collect();

    let layout = Layout { nodes, edges };
    log::debug!(
        "laid out {} nodes and {} edges",
        layout.nodes.len(),
        layout.edges.len()
    );
    layout
}
