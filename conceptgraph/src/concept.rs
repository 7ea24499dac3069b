use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Subject area of a [`Concept`].
///
/// Only used for grouping: the layout engine gives every category its own column band.
/// Prerequisite logic never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Category {
    Mathematics,
    Programming,
    Logic,
    Science,
    Language,
}

impl Category {
    /// All categories, in column order.
    pub const ALL: [Category; 5] = [
        Category::Mathematics,
        Category::Programming,
        Category::Logic,
        Category::Science,
        Category::Language,
    ];

    /// Horizontal column index used by the layout engine.
    pub fn column(self) -> usize {
        match self {
            Category::Mathematics => 0,
            Category::Programming => 1,
            Category::Logic => 2,
            Category::Science => 3,
            Category::Language => 4,
        }
    }

    /// Lowercase name, as used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Category::Mathematics => "mathematics",
            Category::Programming => "programming",
            Category::Logic => "logic",
            Category::Science => "science",
            Category::Language => "language",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How demanding a concept is. Display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// A code snippet shown next to a concept's explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExample {
    /// Language name used for syntax highlighting, e.g. `python`.
    pub language: String,
    /// Caption shown above the snippet.
    pub title: String,
    /// The source text.
    pub code: String,
}

/// A single learning unit in the dependency graph.
///
/// Everything except `id`, `category` and `prerequisites` is display content
/// and opaque to the resolver and the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    /// Unique key. Every edge in the graph refers to concepts by this id.
    pub id: String,
    /// Human-readable name.
    pub title: String,
    /// One-line summary.
    #[serde(default)]
    pub description: String,
    /// Longer explanation text.
    #[serde(default)]
    pub explanation: String,
    /// Icon shown on the node.
    #[serde(default)]
    pub emoji: String,
    /// Determines the layout column.
    pub category: Category,
    /// Display-only.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Ids of the concepts that must be completed first.
    /// Each entry is an edge `prerequisite -> self`.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Free-form duration, e.g. `15 min`.
    #[serde(default)]
    pub estimated_time: String,
    /// Bullet points summarising the concept. Also searched by [`Catalog::search`](crate::Catalog::search).
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Snippets shown with the explanation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_examples: Vec<CodeExample>,
}

impl Concept {
    /// Creates a concept without prerequisites. The title defaults to the id.
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            description: String::new(),
            explanation: String::new(),
            emoji: String::new(),
            category,
            difficulty: Difficulty::default(),
            prerequisites: Vec::new(),
            estimated_time: String::new(),
            key_points: Vec::new(),
            code_examples: Vec::new(),
        }
    }

    /// Replaces the title.
    pub fn with_title(mut self, title: impl AsRef<str>) -> Self {
        self.title = title.as_ref().to_string();
        self
    }

    /// Replaces the description.
    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        self.description = description.as_ref().to_string();
        self
    }

    /// Sets the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Appends prerequisites, keeping declaration order.
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites
            .extend(prerequisites.into_iter().map(Into::into));
        self
    }

    /// Appends key points.
    pub fn with_key_points<I, S>(mut self, key_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_points.extend(key_points.into_iter().map(Into::into));
        self
    }

    /// Whether `id` is a declared direct prerequisite, resolvable or not.
    pub fn requires(&self, id: &str) -> bool {
        self.prerequisites.iter().any(|p| p == id)
    }

    /// Case-insensitive substring match over title, description and key points.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .key_points
                .iter()
                .any(|kp| kp.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "loops",
            "title": "Loops",
            "category": "programming",
            "difficulty": "intermediate",
            "prerequisites": ["conditionals"],
            "estimatedTime": "15 min",
            "keyPoints": ["for", "while"]
        }"#;
        let concept: Concept = serde_json::from_str(json).unwrap();

        assert_eq!("loops", concept.id);
        assert_eq!(Category::Programming, concept.category);
        assert_eq!(Difficulty::Intermediate, concept.difficulty);
        assert_eq!(vec!["conditionals".to_string()], concept.prerequisites);
        assert_eq!("15 min", concept.estimated_time);
        assert!(concept.code_examples.is_empty());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = r#"{ "id": "x", "title": "X", "category": "alchemy" }"#;
        assert!(serde_json::from_str::<Concept>(json).is_err());
    }

    #[test]
    fn test_columns_are_distinct() {
        let mut columns = Category::ALL.map(Category::column).to_vec();
        columns.dedup();
        assert_eq!(Category::ALL.len(), columns.len());
    }

    #[test]
    fn test_matches_key_points() {
        let concept = Concept::new("sets", Category::Mathematics)
            .with_title("Sets")
            .with_key_points(["Union and Intersection"]);

        assert!(concept.matches_lowercase("intersection"));
        assert!(concept.matches_lowercase("sets"));
        assert!(!concept.matches_lowercase("monoid"));
    }
}
