//! Types for coursedoc-commonmark public API and internal use.
use serde::{Deserialize, Serialize};

/// A node of the nested table of contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
  /// Anchor ID derived from the title. Not unique across equal titles.
  pub id: String,

  /// Heading text, trimmed.
  pub title: String,

  /// Body placeholder. Always empty; sections only describe navigation.
  pub content: String,

  /// Heading level (1-4).
  pub level: u8,

  /// Nested sections in document order.
  pub children: Vec<Self>,

  /// ID of the enclosing section, `None` for roots.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parent: Option<String>,
}

impl Section {
  /// Create a childless section without a parent.
  #[must_use]
  pub fn new(id: String, title: &str, level: u8) -> Self {
    Self {
      id,
      title: title.to_string(),
      content: String::new(),
      level,
      children: Vec::new(),
      parent: None,
    }
  }
}

/// A heading in the flat "on this page" list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadingNode {
  /// Anchor ID, same format as [`Section::id`].
  pub id:    String,
  /// Heading text, trimmed.
  pub text:  String,
  /// Heading level (1-3).
  pub level: u8,
}

/// A slice of the raw document starting at one H1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentPart {
  /// Positional ID (`section-N`).
  pub id:      String,
  pub title:   String,
  /// Raw Markdown of the part, H1 line included.
  pub content: String,
}

/// Result of Markdown processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML output.
  pub html: String,

  /// Nested table of contents (levels 1-4).
  pub toc: Vec<Section>,

  /// Flat heading list (levels 1-3).
  pub headings: Vec<HeadingNode>,

  /// Title of the document, if found (first H1).
  pub title: Option<String>,
}
