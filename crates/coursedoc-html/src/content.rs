//! Assembly of the single course document from the content directory.
use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use log::{debug, error};
use rayon::prelude::*;

/// Metadata parsed from a leading YAML block.
pub type FrontMatter = BTreeMap<String, serde_yaml::Value>;

/// Separator appended after every file.
const FILE_SEPARATOR: &str = "\n\n";

/// Split a leading `---` YAML block off `content`.
///
/// Returns the parsed metadata and the body. Invalid YAML is logged and the
/// block is still removed. Text that does not open with a complete block is
/// returned unchanged.
#[must_use]
pub fn split_front_matter(content: &str) -> (Option<FrontMatter>, &str) {
  let stripped = content.trim_start_matches('\u{feff}');
  let Some(rest) = stripped.strip_prefix("---") else {
    return (None, content);
  };
  let Some(rest) = rest
    .strip_prefix("\r\n")
    .or_else(|| rest.strip_prefix('\n'))
  else {
    return (None, content);
  };

  let (yaml, after) = if let Some(after) = rest.strip_prefix("---") {
    ("", after)
  } else if let Some(idx) = rest.find("\n---") {
    (&rest[..idx], &rest[idx + 4..])
  } else {
    return (None, content);
  };

  let body = after
    .strip_prefix('\n')
    .or_else(|| after.strip_prefix("\r\n"))
    .unwrap_or(after);

  if yaml.trim().is_empty() {
    return (Some(FrontMatter::new()), body);
  }

  match serde_yaml::from_str::<FrontMatter>(yaml) {
    Ok(meta) => (Some(meta), body),
    Err(e) => {
      error!("Invalid front matter, ignoring it: {e}");
      (None, body)
    },
  }
}

/// Read one markdown file without its front matter.
///
/// Read errors are logged and yield `None`.
#[must_use]
pub fn read_markdown_body(path: &Path) -> Option<String> {
  match fs::read_to_string(path) {
    Ok(content) => {
      let (_, body) = split_front_matter(&content);
      Some(body.to_string())
    },
    Err(e) => {
      error!("Error reading file {}: {e}", path.display());
      None
    },
  }
}

/// Markdown files directly inside `dir`, sorted by file name.
fn markdown_files_in(dir: &Path) -> Vec<PathBuf> {
  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(e) => {
      error!("Error reading directory {}: {e}", dir.display());
      return Vec::new();
    },
  };

  let mut files: Vec<PathBuf> = entries
    .filter_map(Result::ok)
    .map(|entry| entry.path())
    .filter(|path| {
      path.is_file() && path.extension().is_some_and(|ext| ext == "md")
    })
    .collect();
  files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
  files
}

/// Concatenate the configured sources into one document.
///
/// Each entry of `read_order` is resolved against `content_dir`. Files are
/// appended as-is; directories contribute their `*.md` files in file-name
/// order. Every appended body is followed by a blank line. Missing entries
/// are skipped.
#[must_use]
pub fn get_all_content<S: AsRef<str>>(
  content_dir: &Path,
  read_order: &[S],
) -> String {
  let mut all_content = String::new();

  for item in read_order {
    let item_path = content_dir.join(item.as_ref());

    if item_path.is_file() {
      if let Some(body) = read_markdown_body(&item_path) {
        all_content.push_str(&body);
        all_content.push_str(FILE_SEPARATOR);
      }
    } else if item_path.is_dir() {
      let files = markdown_files_in(&item_path);
      debug!(
        "Reading {} markdown files from {}",
        files.len(),
        item_path.display()
      );

      let bodies: Vec<Option<String>> = files
        .par_iter()
        .map(|path| read_markdown_body(path))
        .collect();

      for body in bodies.into_iter().flatten() {
        all_content.push_str(&body);
        all_content.push_str(FILE_SEPARATOR);
      }
    } else {
      debug!("Skipping missing content entry {}", item_path.display());
    }
  }

  all_content
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_split_front_matter() {
    let (meta, body) =
      split_front_matter("---\ntitle: Intro\norder: 2\n---\n# Intro\n");
    let meta = meta.expect("front matter");
    assert_eq!(meta["title"].as_str(), Some("Intro"));
    assert_eq!(meta["order"].as_u64(), Some(2));
    assert_eq!(body, "# Intro\n");
  }

  #[test]
  fn test_split_front_matter_absent() {
    let text = "# No metadata\n---\n";
    let (meta, body) = split_front_matter(text);
    assert!(meta.is_none());
    assert_eq!(body, text);
  }

  #[test]
  fn test_split_front_matter_unclosed() {
    let text = "---\ntitle: open\n# Body";
    let (meta, body) = split_front_matter(text);
    assert!(meta.is_none());
    assert_eq!(body, text);
  }

  #[test]
  fn test_split_front_matter_empty_and_invalid() {
    let (meta, body) = split_front_matter("---\n---\nbody");
    assert_eq!(meta, Some(FrontMatter::new()));
    assert_eq!(body, "body");

    let (meta, body) = split_front_matter("---\ntitle: [unclosed\n---\nbody");
    assert!(meta.is_none());
    assert_eq!(body, "body");
  }

  #[test]
  fn test_get_all_content_order_and_separators() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    fs::write(root.join("main.md"), "---\ntitle: x\n---\n# Main").expect("write");
    fs::create_dir(root.join("extra")).expect("mkdir");
    fs::write(root.join("extra/b.md"), "# B").expect("write");
    fs::write(root.join("extra/a.md"), "# A").expect("write");
    fs::write(root.join("extra/skip.txt"), "# Skip").expect("write");

    let content =
      get_all_content(root, &["main.md", "missing.md", "extra"]);
    assert_eq!(content, "# Main\n\n# A\n\n# B\n\n");
  }
}
