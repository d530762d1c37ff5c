//! Nested table of contents built from ATX headings.
//!
//! Headings are read line by line from the code-stripped document, so `#`
//! comments inside fenced samples never become sections. Levels 1 through 4
//! take part. Nesting is inferred from levels alone: a heading becomes the
//! child of the closest preceding open heading with a strictly lower level,
//! which means skipped levels (an H3 right under an H1) still nest.
use log::{trace, warn};

use crate::{
  types::Section,
  utils::{
    generate_heading_id,
    is_valid_heading,
    parse_heading_line,
    remove_code_blocks,
  },
};

/// Deepest heading level that appears in the table of contents.
pub const TOC_MAX_LEVEL: u8 = 4;

/// Arena slot: the section being built plus the indices of its children.
struct TocNode {
  section:  Section,
  children: Vec<usize>,
}

/// Flat arena that the stack-based builder appends into.
#[derive(Default)]
struct TocArena {
  nodes: Vec<TocNode>,
  roots: Vec<usize>,
}

impl TocArena {
  fn push(&mut self, section: Section) -> usize {
    self.nodes.push(TocNode {
      section,
      children: Vec::new(),
    });
    self.nodes.len() - 1
  }

  /// Fold the arena back into an owned forest, preserving document order.
  fn into_forest(self) -> Vec<Section> {
    let Self { nodes, roots } = self;
    let mut slots: Vec<Option<TocNode>> = nodes.into_iter().map(Some).collect();
    roots
      .into_iter()
      .filter_map(|index| Self::take_subtree(&mut slots, index))
      .collect()
  }

  fn take_subtree(
    slots: &mut [Option<TocNode>],
    index: usize,
  ) -> Option<Section> {
    let TocNode {
      mut section,
      children,
    } = slots.get_mut(index)?.take()?;

    section.children = children
      .into_iter()
      .filter_map(|child| Self::take_subtree(slots, child))
      .collect();
    Some(section)
  }
}

/// Build the nested table of contents for a Markdown document.
///
/// See the module documentation for the nesting rule. A heading below level 1
/// that has no lower-level heading open (for example a document that starts
/// with `##`) is promoted to a root and a warning is logged.
///
/// The returned tree is a pure function of `content`; nothing is cached
/// between calls.
#[must_use]
pub fn extract_table_of_contents(content: &str) -> Vec<Section> {
  let clean = remove_code_blocks(content);

  let mut arena = TocArena::default();
  let mut stack: Vec<usize> = Vec::new();

  for line in clean.split('\n') {
    let Some((level, raw_title)) = parse_heading_line(line, TOC_MAX_LEVEL)
    else {
      continue;
    };
    let title = raw_title.trim();

    if !is_valid_heading(title, level) {
      trace!("Skipping heading {title:?} at level {level}");
      continue;
    }

    let mut section = Section::new(generate_heading_id(title), title, level);

    if level == 1 {
      let index = arena.push(section);
      arena.roots.push(index);
      stack.clear();
      stack.push(index);
      continue;
    }

    let parent_position = stack
      .iter()
      .rposition(|&index| arena.nodes[index].section.level < level);

    if let Some(position) = parent_position {
      let parent_index = stack[position];
      section.parent = Some(arena.nodes[parent_index].section.id.clone());

      let index = arena.push(section);
      arena.nodes[parent_index].children.push(index);

      stack.truncate(position + 1);
      stack.push(index);
    } else {
      warn!("No parent found for level {level} heading: {title:?}");
      let index = arena.push(section);
      arena.roots.push(index);
      stack.clear();
      stack.push(index);
    }
  }

  arena.into_forest()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn titles(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.title.as_str()).collect()
  }

  fn depth(sections: &[Section]) -> usize {
    sections
      .iter()
      .map(|s| 1 + depth(&s.children))
      .max()
      .unwrap_or(0)
  }

  fn count(sections: &[Section]) -> usize {
    sections.iter().map(|s| 1 + count(&s.children)).sum()
  }

  #[test]
  fn test_siblings_under_one_root() {
    let toc = extract_table_of_contents("# A\n## B\n## C\n");
    assert_eq!(titles(&toc), vec!["A"]);
    assert_eq!(titles(&toc[0].children), vec!["B", "C"]);
    assert_eq!(toc[0].children[0].parent.as_deref(), Some("heading-a"));
    assert_eq!(toc[0].children[1].parent.as_deref(), Some("heading-a"));
    assert!(toc[0].parent.is_none());
  }

  #[test]
  fn test_skipped_level_attaches_to_nearest_lower() {
    let toc = extract_table_of_contents("# A\n### B\n");
    assert_eq!(toc.len(), 1);
    assert_eq!(titles(&toc[0].children), vec!["B"]);
    assert_eq!(toc[0].children[0].level, 3);
  }

  #[test]
  fn test_strict_chain_depth_and_count() {
    let toc = extract_table_of_contents("# 1\n## 2\n### 3\n#### 4\n");
    assert_eq!(depth(&toc), 4);
    assert_eq!(count(&toc), 4);

    let md = "# a\n## b\n### c\n## d\n### e\n#### f\n# g\n## h\n";
    let toc = extract_table_of_contents(md);
    assert_eq!(depth(&toc), 4);
    assert_eq!(count(&toc), 8);
    assert_eq!(titles(&toc), vec!["a", "g"]);
  }

  #[test]
  fn test_stack_truncates_back_to_parent() {
    let md = "# A\n## B\n### C\n#### D\n## E\n### F\n";
    let toc = extract_table_of_contents(md);

    let a = &toc[0];
    assert_eq!(titles(&a.children), vec!["B", "E"]);
    assert_eq!(titles(&a.children[0].children), vec!["C"]);
    assert_eq!(titles(&a.children[0].children[0].children), vec!["D"]);
    assert_eq!(titles(&a.children[1].children), vec!["F"]);
  }

  #[test]
  fn test_orphan_heading_becomes_root() {
    let toc = extract_table_of_contents("## Orphan\n### Child\n# Real\n");
    assert_eq!(titles(&toc), vec!["Orphan", "Real"]);
    assert!(toc[0].parent.is_none());
    assert_eq!(titles(&toc[0].children), vec!["Child"]);
  }

  #[test]
  fn test_same_level_after_orphan_is_also_root() {
    // The stack only holds the orphan H2, which is not strictly lower.
    let toc = extract_table_of_contents("## One\n## Two\n");
    assert_eq!(titles(&toc), vec!["One", "Two"]);
  }

  #[test]
  fn test_code_fences_and_level_five_are_ignored() {
    let md = "# A\n```bash\n# comment\n## also comment\n```\n##### five\n## B\n";
    let toc = extract_table_of_contents(md);
    assert_eq!(count(&toc), 2);
    assert_eq!(titles(&toc[0].children), vec!["B"]);
  }

  #[test]
  fn test_toc_marker_heading_is_excluded() {
    let md = "# Course\n## 📋 目录\n## Intro\n";
    let toc = extract_table_of_contents(md);
    assert_eq!(titles(&toc[0].children), vec!["Intro"]);
  }

  #[test]
  fn test_section_fields() {
    let toc = extract_table_of_contents("#   Getting  Started  \n");
    let section = &toc[0];
    assert_eq!(section.title, "Getting  Started");
    assert_eq!(section.id, "heading-getting-started");
    assert_eq!(section.level, 1);
    assert!(section.content.is_empty());
    assert!(section.children.is_empty());
  }

  #[test]
  fn test_duplicate_titles_share_ids() {
    let toc = extract_table_of_contents("# A\n## Setup\n# B\n## Setup\n");
    assert_eq!(toc[0].children[0].id, toc[1].children[0].id);
  }

  #[test]
  fn test_empty_input() {
    assert!(extract_table_of_contents("").is_empty());
    assert!(extract_table_of_contents("plain text\nno headings").is_empty());
  }
}
