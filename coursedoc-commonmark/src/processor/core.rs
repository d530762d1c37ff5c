//! Core implementation of the Markdown processor.
//!
//! This module contains the main implementation of `MarkdownProcessor`: the
//! comrak rendering pipeline and the navigation data extracted alongside it.
use std::sync::Arc;

use comrak::{Arena, options::Options, parse_document};
use log::trace;

use super::types::{
  AstTransformer,
  CodeBlockTransformer,
  HeadingAnchorTransformer,
  MarkdownOptions,
  MarkdownProcessor,
};
use crate::{
  headings::extract_headings,
  syntax::{SyntaxManager, create_default_manager},
  toc::extract_table_of_contents,
  types::{MarkdownResult, Section},
};

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  ///
  /// When highlighting is requested but no backend is compiled in, the
  /// processor logs a warning and renders code blocks unhighlighted.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let syntax_manager = if options.highlight_code {
      match create_default_manager(options.highlight_theme.as_deref()) {
        Ok(manager) => Some(Arc::new(manager)),
        Err(e) => {
          log::warn!("Syntax highlighting disabled: {e}");
          None
        },
      }
    } else {
      None
    };

    Self {
      options,
      syntax_manager,
    }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// The syntax manager used for code blocks, if highlighting is active.
  #[must_use]
  pub fn syntax_manager(&self) -> Option<&SyntaxManager> {
    self.syntax_manager.as_deref()
  }

  /// Render Markdown to HTML and extract its navigation data.
  ///
  /// The table of contents and heading list are built from the raw source;
  /// the rendered headings carry the same IDs.
  #[must_use]
  pub fn render(&self, markdown: &str) -> MarkdownResult {
    let toc = extract_table_of_contents(markdown);
    let headings = extract_headings(markdown);
    let title = document_title(&toc);
    let html = self.convert_to_html(markdown);

    trace!(
      "Rendered {} bytes of markdown into {} bytes of HTML",
      markdown.len(),
      html.len()
    );

    MarkdownResult {
      html,
      toc,
      headings,
      title,
    }
  }

  /// Convert markdown to HTML using comrak and the AST transformers.
  #[must_use]
  pub fn convert_to_html(&self, content: &str) -> String {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, content, &options);

    CodeBlockTransformer::new(
      self.syntax_manager(),
      self.options.highlight_theme.as_deref(),
    )
    .transform(root);
    HeadingAnchorTransformer::new(content, &options).transform(root);

    let mut html_output = String::new();
    if let Err(e) = comrak::format_html(root, &options, &mut html_output) {
      log::error!("Failed to format markdown as HTML: {e}");
    }
    html_output
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    // Raw HTML in the course material is trusted.
    options.render.r#unsafe = true;
    options.extension.header_ids = None;
    options
  }
}

/// Title of the first top-level H1, if any.
fn document_title(toc: &[Section]) -> Option<String> {
  toc
    .iter()
    .find(|section| section.level == 1)
    .map(|section| section.title.clone())
}
