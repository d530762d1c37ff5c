/// Toggle state for fenced code blocks.
///
/// Unlike a full CommonMark fence parser this only looks for lines whose
/// trimmed content starts with three backticks, and each such line flips the
/// state. An unbalanced fence therefore keeps the tracker "inside" until the
/// end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceToggle {
  in_code_block: bool,
}

impl FenceToggle {
  /// Create a new tracker, outside of any code block.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      in_code_block: false,
    }
  }

  /// Check if currently inside a code block.
  #[must_use]
  pub const fn in_code_block(&self) -> bool {
    self.in_code_block
  }

  /// Whether `line` opens or closes a fence.
  #[must_use]
  pub fn is_fence(line: &str) -> bool {
    line.trim().starts_with("```")
  }

  /// Process a line and return the state that applies to the *next* line.
  #[must_use]
  pub fn process_line(&self, line: &str) -> Self {
    if Self::is_fence(line) {
      Self {
        in_code_block: !self.in_code_block,
      }
    } else {
      *self
    }
  }
}

/// Blank out every fenced code block in `content`.
///
/// Fence lines and every line between them become empty strings, everything
/// else passes through. The output always has the same number of lines as
/// the input, so line-based heading matches stay aligned with the source.
#[must_use]
pub fn remove_code_blocks(content: &str) -> String {
  let mut tracker = FenceToggle::new();
  let mut filtered: Vec<&str> = Vec::new();

  for line in content.split('\n') {
    if FenceToggle::is_fence(line) {
      tracker = tracker.process_line(line);
      filtered.push("");
      continue;
    }

    if tracker.in_code_block() {
      filtered.push("");
    } else {
      filtered.push(line);
    }
  }

  filtered.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line_count(text: &str) -> usize {
    text.split('\n').count()
  }

  #[test]
  fn test_line_count_is_preserved() {
    let inputs = [
      "",
      "\n",
      "# Title\n\ntext",
      "```\ncode\n```",
      "```rust\nfn main() {}\n```\n# After\n",
      "```\nunterminated\n# not a heading\n",
      "a\r\nb\r\n```\r\nc\r\n```\r\n",
    ];

    for input in inputs {
      let stripped = remove_code_blocks(input);
      assert_eq!(
        line_count(input),
        line_count(&stripped),
        "line count changed for {input:?}"
      );
    }
  }

  #[test]
  fn test_fence_interior_is_blanked() {
    let md = "# Real\n```bash\n# comment in code\necho hi\n```\n## Also real";
    let stripped = remove_code_blocks(md);
    let lines: Vec<&str> = stripped.split('\n').collect();

    assert_eq!(lines, vec!["# Real", "", "", "", "", "## Also real"]);
  }

  #[test]
  fn test_indented_fence_toggles() {
    let md = "  ```\n# hidden\n  ```\n# shown";
    let stripped = remove_code_blocks(md);
    assert_eq!(stripped, "\n\n\n# shown");
  }

  #[test]
  fn test_unbalanced_fence_blanks_remainder() {
    let md = "# Before\n```\n# inside\n\n# still inside";
    let stripped = remove_code_blocks(md);
    assert_eq!(stripped, "# Before\n\n\n\n");
  }

  #[test]
  fn test_tilde_fences_are_not_special() {
    let md = "~~~\n# heading\n~~~";
    assert_eq!(remove_code_blocks(md), md);
  }

  #[test]
  fn test_tracker_process_line() {
    let tracker = FenceToggle::new();
    assert!(!tracker.in_code_block());

    let tracker = tracker.process_line("```python");
    assert!(tracker.in_code_block());

    let tracker = tracker.process_line("print('x')");
    assert!(tracker.in_code_block());

    let tracker = tracker.process_line("```");
    assert!(!tracker.in_code_block());
  }
}
