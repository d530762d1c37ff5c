//! Lookups over the section tree: search by ID, breadcrumbs, and
//! previous/next navigation.
use crate::types::Section;

/// Neighbours of a section in pre-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent<'a> {
  pub prev: Option<&'a Section>,
  pub next: Option<&'a Section>,
}

/// Find a section by ID, depth-first in document order.
///
/// Because IDs may collide, the first matching section wins.
#[must_use]
pub fn find_section_by_id<'a>(
  sections: &'a [Section],
  id: &str,
) -> Option<&'a Section> {
  for section in sections {
    if section.id == id {
      return Some(section);
    }
    if let Some(found) = find_section_by_id(&section.children, id) {
      return Some(found);
    }
  }
  None
}

/// Path from a root down to (and including) the section with `target_id`.
///
/// Empty when the ID is unknown.
#[must_use]
pub fn build_breadcrumb_trail<'a>(
  sections: &'a [Section],
  target_id: &str,
) -> Vec<&'a Section> {
  fn search<'a>(
    items: &'a [Section],
    target_id: &str,
    trail: &mut Vec<&'a Section>,
  ) -> bool {
    for item in items {
      trail.push(item);
      if item.id == target_id || search(&item.children, target_id, trail) {
        return true;
      }
      trail.pop();
    }
    false
  }

  let mut trail = Vec::new();
  search(sections, target_id, &mut trail);
  trail
}

/// Flatten the tree in pre-order (parent before children).
#[must_use]
pub fn flatten_sections(sections: &[Section]) -> Vec<&Section> {
  fn flatten<'a>(items: &'a [Section], flat: &mut Vec<&'a Section>) {
    for item in items {
      flat.push(item);
      flatten(&item.children, flat);
    }
  }

  let mut flat = Vec::new();
  flatten(sections, &mut flat);
  flat
}

/// Previous and next section of `current_id` in reading order.
///
/// An unknown ID behaves as if it sat before the first section: there is no
/// previous section and the next one is the first section of the document.
#[must_use]
pub fn get_adjacent_sections<'a>(
  sections: &'a [Section],
  current_id: &str,
) -> Adjacent<'a> {
  let flat = flatten_sections(sections);

  match flat.iter().position(|s| s.id == current_id) {
    Some(index) => {
      Adjacent {
        prev: index.checked_sub(1).and_then(|i| flat.get(i).copied()),
        next: flat.get(index + 1).copied(),
      }
    },
    None => {
      Adjacent {
        prev: None,
        next: flat.first().copied(),
      }
    },
  }
}

/// IDs of every section on the breadcrumb trail, target included.
#[must_use]
pub fn get_ancestor_ids(sections: &[Section], target_id: &str) -> Vec<String> {
  build_breadcrumb_trail(sections, target_id)
    .into_iter()
    .map(|section| section.id.clone())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::toc::extract_table_of_contents;

  const DOC: &str = "# A\n## B\n### C\n## D\n# E\n## F\n";

  fn ids(sections: &[&Section]) -> Vec<String> {
    sections.iter().map(|s| s.id.clone()).collect()
  }

  #[test]
  fn test_find_section_by_id() {
    let toc = extract_table_of_contents(DOC);
    let found = find_section_by_id(&toc, "heading-c").map(|s| s.title.as_str());
    assert_eq!(found, Some("C"));
    assert!(find_section_by_id(&toc, "heading-zzz").is_none());
  }

  #[test]
  fn test_breadcrumb_trail() {
    let toc = extract_table_of_contents(DOC);
    let trail = build_breadcrumb_trail(&toc, "heading-c");
    assert_eq!(ids(&trail), vec!["heading-a", "heading-b", "heading-c"]);

    let trail = build_breadcrumb_trail(&toc, "heading-f");
    assert_eq!(ids(&trail), vec!["heading-e", "heading-f"]);

    assert!(build_breadcrumb_trail(&toc, "missing").is_empty());
  }

  #[test]
  fn test_flatten_is_pre_order() {
    let toc = extract_table_of_contents(DOC);
    let titles: Vec<&str> = flatten_sections(&toc)
      .iter()
      .map(|s| s.title.as_str())
      .collect();
    assert_eq!(titles, vec!["A", "B", "C", "D", "E", "F"]);
  }

  #[test]
  fn test_adjacent_sections() {
    let toc = extract_table_of_contents(DOC);

    let adjacent = get_adjacent_sections(&toc, "heading-d");
    assert_eq!(adjacent.prev.map(|s| s.title.as_str()), Some("C"));
    assert_eq!(adjacent.next.map(|s| s.title.as_str()), Some("E"));

    let first = get_adjacent_sections(&toc, "heading-a");
    assert!(first.prev.is_none());

    let last = get_adjacent_sections(&toc, "heading-f");
    assert!(last.next.is_none());

    let unknown = get_adjacent_sections(&toc, "nope");
    assert!(unknown.prev.is_none());
    assert_eq!(unknown.next.map(|s| s.title.as_str()), Some("A"));
  }

  #[test]
  fn test_ancestor_ids() {
    let toc = extract_table_of_contents(DOC);
    assert_eq!(get_ancestor_ids(&toc, "heading-b"), vec![
      "heading-a".to_string(),
      "heading-b".to_string()
    ]);
  }
}
