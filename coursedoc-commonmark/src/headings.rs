//! Flat heading list used by the "on this page" navigation.
use crate::{
  types::{ContentPart, HeadingNode},
  utils::{
    generate_heading_id,
    is_valid_heading,
    parse_heading_line,
    remove_code_blocks,
  },
};

/// Deepest heading level of the flat list.
pub const HEADINGS_MAX_LEVEL: u8 = 3;

/// Extract every valid H1-H3 heading in document order.
///
/// This is independent of [`crate::toc::extract_table_of_contents`]: level-4
/// headings are part of the tree but never of this list.
#[must_use]
pub fn extract_headings(content: &str) -> Vec<HeadingNode> {
  let clean = remove_code_blocks(content);

  clean
    .split('\n')
    .filter_map(|line| parse_heading_line(line, HEADINGS_MAX_LEVEL))
    .filter_map(|(level, raw)| {
      let text = raw.trim();
      is_valid_heading(text, level).then(|| {
        HeadingNode {
          id: generate_heading_id(text),
          text: text.to_string(),
          level,
        }
      })
    })
    .collect()
}

/// Split the raw document at every `# ` line.
///
/// Each part starts with its H1 line and runs up to the next one; every line
/// is kept with a trailing `\n`. Text before the first H1 is dropped. Fenced
/// code is not taken into account.
#[must_use]
pub fn split_content_by_sections(content: &str) -> Vec<ContentPart> {
  let mut parts = Vec::new();
  let mut current: Option<ContentPart> = None;

  for line in content.split('\n') {
    let h1 = line
      .strip_prefix("# ")
      .filter(|title| !title.trim_end_matches('\r').is_empty());

    if let Some(title) = h1 {
      if let Some(done) = current.take() {
        parts.push(done);
      }
      current = Some(ContentPart {
        id:      format!("section-{}", parts.len()),
        title:   title.trim().to_string(),
        content: format!("{line}\n"),
      });
    } else if let Some(part) = current.as_mut() {
      part.content.push_str(line);
      part.content.push('\n');
    }
  }

  if let Some(done) = current {
    parts.push(done);
  }

  parts
}
