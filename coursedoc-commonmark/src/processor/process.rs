//! Main processing functions for Markdown content.
use log::error;

use super::types::MarkdownProcessor;
use crate::types::MarkdownResult;

/// Process markdown content with error recovery.
///
/// Attempts to render the markdown content and falls back to an error
/// placeholder if rendering panics.
///
/// # Arguments
///
/// * `processor` - The configured markdown processor
/// * `content` - The raw markdown content to process
///
/// # Returns
///
/// A `MarkdownResult` with rendered HTML, TOC, headings, and title
#[must_use]
pub fn process_with_recovery(
  processor: &MarkdownProcessor,
  content: &str,
) -> MarkdownResult {
  match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor.render(content)
  })) {
    Ok(result) => result,
    Err(panic_err) => {
      error!("Panic during markdown processing: {panic_err:?}");
      MarkdownResult {
        html:     "<div class=\"error\">Critical error processing markdown \
                   content</div>"
          .to_string(),
        toc:      Vec::new(),
        headings: Vec::new(),
        title:    None,
      }
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::processor::MarkdownOptions;

  #[test]
  fn test_process_with_recovery_renders_normally() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      gfm:             true,
      highlight_code:  false,
      highlight_theme: None,
    });
    let result = process_with_recovery(&processor, "# Title\n\ntext\n");

    assert_eq!(result.title.as_deref(), Some("Title"));
    assert_eq!(result.toc.len(), 1);
    assert!(result.html.contains("<h1 id=\"heading-title\">Title</h1>"));
    assert!(!result.html.contains("Critical error"));
  }
}
