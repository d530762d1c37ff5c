use std::sync::LazyLock;
pub mod codeblock;

use comrak::nodes::{AstNode, NodeValue};
use regex::Regex;

pub use self::codeblock::{FenceToggle, remove_code_blocks};

/// Prefix shared by every generated heading anchor.
pub const HEADING_ID_PREFIX: &str = "heading-";

/// Marker emoji of the in-document "table of contents" heading.
const TOC_MARKER_EMOJI: &str = "📋";

/// Marker word ("table of contents") of the in-document TOC heading.
const TOC_MARKER_WORD: &str = "目录";

/// Characters kept in a slug besides ASCII word characters and `-`.
const fn is_cjk_ideograph(c: char) -> bool {
  matches!(c, '\u{4e00}'..='\u{9fa5}')
}

const fn is_word_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

/// Generate the anchor ID for a heading.
///
/// The text is lower-cased, every whitespace run becomes a single `-`, and
/// any character that is not an ASCII word character, a `-` or a CJK
/// ideograph (U+4E00..=U+9FA5) is dropped. The result is prefixed with
/// [`HEADING_ID_PREFIX`].
///
/// The same ID is used by the table of contents, the flat heading list and
/// the rendered `id` attributes, so all three agree on anchors. IDs are not
/// made unique: two headings whose text normalizes identically share an ID
/// and the first one in the document wins when scrolling.
#[must_use]
pub fn generate_heading_id(text: &str) -> String {
  let lowered = text.to_lowercase();
  let mut id = String::with_capacity(HEADING_ID_PREFIX.len() + lowered.len());
  id.push_str(HEADING_ID_PREFIX);

  let mut in_whitespace = false;
  for c in lowered.chars() {
    if c.is_whitespace() {
      if !in_whitespace {
        id.push('-');
        in_whitespace = true;
      }
      continue;
    }
    in_whitespace = false;

    if is_word_char(c) || c == '-' || is_cjk_ideograph(c) {
      id.push(c);
    }
  }

  id
}

/// Slugify a heading without the anchor prefix.
///
/// Runs of characters outside `[A-Za-z0-9_]` and the CJK range collapse into
/// a single `-`, and leading/trailing dashes are trimmed.
#[must_use]
pub fn generate_slug(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  let mut pending_dash = false;

  for c in text.to_lowercase().chars() {
    if is_word_char(c) || is_cjk_ideograph(c) {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c);
    } else {
      pending_dash = true;
    }
  }

  slug
}

/// Whether a heading should show up in navigation.
///
/// Blank headings and the in-document "📋 目录" listing heading are
/// rejected. The level is accepted as-is.
#[must_use]
pub fn is_valid_heading(text: &str, _level: u8) -> bool {
  if text.contains(TOC_MARKER_EMOJI) && text.contains(TOC_MARKER_WORD) {
    return false;
  }

  !text.trim().is_empty()
}

/// ATX heading on a single line: hashes, one space, then text.
static HEADING_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(#{1,6}) (.+)$").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile HEADING_LINE_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
});

/// Match a single line against the heading pattern.
///
/// Returns the level and the *untrimmed* heading text when the line starts
/// with between 1 and `max_level` `#` characters followed by a space and at
/// least one more character. A trailing `\r` is ignored.
#[must_use]
pub fn parse_heading_line(line: &str, max_level: u8) -> Option<(u8, &str)> {
  let line = line.strip_suffix('\r').unwrap_or(line);
  let caps = HEADING_LINE_RE.captures(line)?;

  let hashes = caps.get(1)?.as_str();
  let level = u8::try_from(hashes.len()).ok()?;
  if level > max_level {
    return None;
  }

  caps.get(2).map(|m| (level, m.as_str()))
}

/// Extract all inline text from a heading node, recursively.
///
/// Inline HTML tags are dropped, images contribute nothing.
#[must_use]
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      NodeValue::HtmlInline(_) | NodeValue::Image(..) => {},
      _ => text.push_str(&extract_inline_text(child)),
    }
  }
  text
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_heading_id_basic() {
    assert_eq!(generate_heading_id("Hello World"), "heading-hello-world");
    assert_eq!(generate_heading_id("Quick   Start"), "heading-quick-start");
  }

  #[test]
  fn test_heading_id_strips_punctuation() {
    assert_eq!(
      generate_heading_id("What's new? (v2.0)"),
      "heading-whats-new-v20"
    );
    assert_eq!(generate_heading_id("a ! b"), "heading-a--b");
  }

  #[test]
  fn test_heading_id_keeps_cjk_and_hyphens() {
    assert_eq!(
      generate_heading_id("第一章 快速开始"),
      "heading-第一章-快速开始"
    );
    assert_eq!(generate_heading_id("pre-commit 钩子"), "heading-pre-commit-钩子");
  }

  #[test]
  fn test_heading_id_drops_emoji_and_fullwidth_punctuation() {
    assert_eq!(generate_heading_id("🚀 启动！"), "heading--启动");
  }

  #[test]
  fn test_heading_id_is_deterministic_and_collides() {
    assert_eq!(generate_heading_id("Setup"), generate_heading_id("Setup"));
    // Different display text, same normalized form: same anchor.
    assert_eq!(generate_heading_id("Setup!"), generate_heading_id("setup"));
  }

  #[test]
  fn test_generate_slug() {
    assert_eq!(generate_slug("  Hello, World!  "), "hello-world");
    assert_eq!(generate_slug("安装 & 配置"), "安装-配置");
    assert_eq!(generate_slug("---"), "");
  }

  #[test]
  fn test_is_valid_heading() {
    assert!(is_valid_heading("Intro", 1));
    assert!(is_valid_heading("目录 without emoji", 2));
    assert!(is_valid_heading("📋 checklist", 2));
    assert!(!is_valid_heading("📋 目录", 2));
    assert!(!is_valid_heading("目录 📋", 4));
    assert!(!is_valid_heading("   ", 1));
    assert!(!is_valid_heading("", 3));
  }

  #[test]
  fn test_parse_heading_line() {
    assert_eq!(parse_heading_line("# Title", 4), Some((1, "Title")));
    assert_eq!(parse_heading_line("#### Deep ", 4), Some((4, "Deep ")));
    assert_eq!(parse_heading_line("#### Deep", 3), None);
    assert_eq!(parse_heading_line("##### Too deep", 4), None);
    assert_eq!(parse_heading_line("#NoSpace", 4), None);
    assert_eq!(parse_heading_line(" # Indented", 4), None);
    assert_eq!(parse_heading_line("# ", 4), None);
    assert_eq!(parse_heading_line("## Windows\r", 4), Some((2, "Windows")));
  }
}
