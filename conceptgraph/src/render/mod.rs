//! Render layouts to graphviz `.dot` files.
//!
//! Generally, use `layout.render_to(filename, resolver, &progress, RenderSettings::default())`.
//! Pinned positions are only honoured by engines that accept them, e.g. `neato -n`.

use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

use crate::layout::Layout;
use crate::progress::Progress;
use crate::resolve::{Resolver, Status};

/// Global settings related to rendering layouts.
pub struct RenderSettings {
    /// Whether to pin every node to its computed position.
    pub show_positions: bool,
    /// The title which should be displayed above the graph.
    ///
    /// Defaults to the filename given to [`Layout::render_to`].
    pub title: Option<String>,
}

impl RenderSettings {
    /// Sets the title of the graph
    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        self.title = Some(name.as_ref().to_string());
        self
    }

    /// Sets [`show_positions`](Self::show_positions).
    pub fn with_positions(mut self, show_positions: bool) -> Self {
        self.show_positions = show_positions;
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_positions: true,
            title: None,
        }
    }
}

fn status_color(status: Status) -> &'static str {
    match status {
        Status::Completed => "#10b981",
        Status::Available => "#8b5cf6",
        Status::Locked => "#4b5563",
    }
}

fn escape_text(inp: &str) -> String {
    inp.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Layout {
    /// Emit the layout as a graphviz digraph, colouring each node by its current status.
    ///
    /// Nodes whose id is not in the resolver's catalog are drawn with their id as label, as locked.
    pub fn render<W: Write>(
        &self,
        output: &mut W,
        resolver: Resolver<'_>,
        progress: &Progress,
        settings: RenderSettings,
    ) -> io::Result<()> {
        writeln!(output, "digraph {{")?;

        writeln!(
            output,
            r#"node [shape="box",style="rounded,filled",fontcolor="white",penwidth="0"]"#
        )?;

        if let Some(ref i) = settings.title {
            // title
            writeln!(output, r#"labelloc="t";"#)?;
            writeln!(output, r#"label="{}";"#, escape_text(i))?;
        }

        // nodes
        for node in &self.nodes {
            let (label, status) = match resolver.concept(&node.id) {
                Ok(concept) if concept.emoji.is_empty() => {
                    (concept.title.clone(), resolver.status_of(concept, progress))
                }
                Ok(concept) => (
                    format!("{} {}", concept.emoji, concept.title),
                    resolver.status_of(concept, progress),
                ),
                Err(_) => (node.id.clone(), Status::Locked),
            };

            let mut attrs = vec![
                format!(r#"[label="{}"]"#, escape_text(&label)),
                format!(r#"[fillcolor="{}"]"#, status_color(status)),
            ];
            if settings.show_positions {
                // graphviz' y axis points up
                attrs.push(format!(r#"[pos="{},{}!"]"#, node.x, -node.y));
            }

            writeln!(output, r#""{}" {}"#, escape_text(&node.id), attrs.join(""))?
        }

        // edges
        for edge in &self.edges {
            writeln!(
                output,
                r#""{}" -> "{}""#,
                escape_text(&edge.from),
                escape_text(&edge.to)
            )?
        }

        writeln!(output, "}}")?;

        Ok(())
    }

    /// [`render`](Layout::render) directly to a file.
    pub fn render_to(
        &self,
        path: impl AsRef<Path>,
        resolver: Resolver<'_>,
        progress: &Progress,
        mut settings: RenderSettings,
    ) -> io::Result<()> {
        let path = path.as_ref();
        let mut w = File::create(path)?;

        if settings.title.is_none() {
            settings.title = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string());
        }

        self.render(&mut w, resolver, progress, settings)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::Catalog;
    use crate::concept::Category::*;
    use crate::concept::Concept;
    use crate::layout::{layout, LayoutSettings};

    fn render_to_string(settings: RenderSettings) -> String {
        let catalog = Catalog::new(vec![
            Concept::new("a", Logic).with_title("Say \"hi\""),
            Concept::new("b", Logic).with_prerequisites(["a"]),
        ])
        .unwrap();
        let progress: Progress = ["a"].into_iter().collect();
        let layout = layout(&catalog, &LayoutSettings::default());

        let mut out = Vec::new();
        layout
            .render(&mut out, Resolver::new(&catalog), &progress, settings)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render() {
        let dot = render_to_string(RenderSettings::default().with_name("graph"));

        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains(r#"label="graph";"#));
        assert!(dot.contains(
            r##""a" [label="Say \"hi\""][fillcolor="#10b981"][pos="560,-100!"]"##
        ));
        assert!(dot.contains(r##""b" [label="b"][fillcolor="#8b5cf6"]"##));
        assert!(dot.contains(r#""a" -> "b""#));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_render_without_positions() {
        let dot = render_to_string(RenderSettings::default().with_positions(false));
        assert!(!dot.contains("pos="));
        assert!(!dot.contains("labelloc"));
    }

    #[test]
    fn test_render_to_defaults_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concepts.dot");
        let catalog = Catalog::new(vec![Concept::new("a", Logic)]).unwrap();

        layout(&catalog, &LayoutSettings::default())
            .render_to(
                &path,
                Resolver::new(&catalog),
                &Progress::new(),
                RenderSettings::default(),
            )
            .unwrap();

        let dot = std::fs::read_to_string(path).unwrap();
        assert!(dot.contains(r#"label="concepts";"#));
    }
}
