//! # coursedoc-commonmark
//!
//! Markdown processing for single-page course documentation: fenced-code
//! stripping, heading anchors, a nested table of contents, navigation
//! helpers and `comrak`-based HTML rendering with highlighted code blocks.
//!
//! ## Quick Start
//!
//! ```rust
//! use coursedoc_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::default());
//! let result = processor.render("# Hello World\n\n## Setup\n");
//!
//! assert_eq!(result.title.as_deref(), Some("Hello World"));
//! assert_eq!(result.toc[0].children[0].id, "heading-setup");
//! ```
//!
//! ## Navigation
//!
//! ```rust
//! use coursedoc_commonmark::{extract_table_of_contents, get_adjacent_sections};
//!
//! let toc = extract_table_of_contents("# A\n## B\n# C\n");
//! let adjacent = get_adjacent_sections(&toc, "heading-b");
//! assert_eq!(adjacent.next.map(|s| s.title.as_str()), Some("C"));
//! ```

pub mod active;
pub mod headings;
pub mod navigation;
pub mod processor;
pub mod syntax;
pub mod toc;
mod types;
pub mod utils;

pub use crate::{
  active::{
    ActiveSectionTracker,
    ObserverOptions,
    VisibilityEntry,
    VisibilityObserver,
  },
  headings::{extract_headings, split_content_by_sections},
  navigation::{
    Adjacent,
    build_breadcrumb_trail,
    find_section_by_id,
    flatten_sections,
    get_adjacent_sections,
    get_ancestor_ids,
  },
  processor::{
    MarkdownOptions,
    MarkdownProcessor,
    process_with_recovery,
  },
  toc::extract_table_of_contents,
  types::{ContentPart, HeadingNode, MarkdownResult, Section},
  utils::{generate_heading_id, is_valid_heading, remove_code_blocks},
};
