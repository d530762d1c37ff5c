//! Type definitions for the Markdown processor.
//!
//! Contains the processor configuration (`MarkdownOptions`), the processor
//! itself (`MarkdownProcessor`) and the AST transformers that give headings
//! their anchors and wrap fenced code blocks.
//!
//! # Examples
//!
//! ```
//! use coursedoc_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   gfm: true,
//!   highlight_code: false,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use std::sync::{Arc, LazyLock};

use comrak::{
  nodes::{AstNode, NodeValue},
  options::Options,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;

use crate::{
  syntax::SyntaxManager,
  utils::{self, generate_heading_id, parse_heading_line},
};

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions.
  pub gfm: bool,

  /// Enable syntax highlighting for code blocks.
  pub highlight_code: bool,

  /// Optional: Custom syntax highlighting theme name.
  pub highlight_theme: Option<String>,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:             cfg!(feature = "gfm"),
      highlight_code:  cfg!(feature = "syntect"),
      highlight_theme: None,
    }
  }
}

/// Main Markdown processor.
///
/// Can be cheaply cloned since it uses `Arc` internally for the syntax manager.
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:        MarkdownOptions,
  pub(crate) syntax_manager: Option<Arc<SyntaxManager>>,
}

/// Trait for AST transformations applied before HTML rendering.
pub trait AstTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>);
}

/// Gives every heading an `id` attribute matching the table of contents.
///
/// The heading is pre-rendered with comrak and swapped for a raw node, with
/// the `id` spliced into the opening tag.
pub struct HeadingAnchorTransformer<'s, 'o> {
  source_lines: Vec<&'s str>,
  options:      &'o Options<'o>,
}

impl<'s, 'o> HeadingAnchorTransformer<'s, 'o> {
  #[must_use]
  pub fn new(source: &'s str, options: &'o Options<'o>) -> Self {
    Self {
      source_lines: source.split('\n').collect(),
      options,
    }
  }

  /// Anchor for a heading node.
  ///
  /// Uses the ATX source line when there is one, so the rendered `id` is
  /// computed from exactly the text the TOC builder saw.
  fn anchor_for<'a>(&self, node: &'a AstNode<'a>) -> String {
    let line = node.data.borrow().sourcepos.start.line;
    let source_text = line
      .checked_sub(1)
      .and_then(|index| self.source_lines.get(index))
      .and_then(|raw| parse_heading_line(raw, 6))
      .map(|(_, text)| text.trim().to_string());

    let text = source_text
      .unwrap_or_else(|| utils::extract_inline_text(node).trim().to_string());
    generate_heading_id(&text)
  }
}

impl AstTransformer for HeadingAnchorTransformer<'_, '_> {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    let headings: Vec<_> = node
      .descendants()
      .filter_map(|n| {
        match &n.data.borrow().value {
          NodeValue::Heading(heading) => Some((n, heading.level)),
          _ => None,
        }
      })
      .collect();

    for (heading, level) in headings {
      let id = self.anchor_for(heading);

      let mut rendered = String::new();
      if let Err(e) = comrak::format_html(heading, self.options, &mut rendered)
      {
        log::error!("Failed to render heading {id}: {e}");
        continue;
      }

      let open_tag = format!("<h{level}>");
      let anchored_tag = format!(
        "<h{level} id=\"{}\">",
        encode_double_quoted_attribute(&id)
      );
      let html = rendered.replacen(&open_tag, &anchored_tag, 1);

      let children: Vec<_> = heading.children().collect();
      for child in children {
        child.detach();
      }
      heading.data.borrow_mut().value = NodeValue::Raw(html);
    }
  }
}

/// Wraps fenced code blocks in the code-block component.
///
/// The component carries a language badge, an optional file name and a copy
/// button. The body is syntax highlighted when a manager is available; if
/// highlighting is off or fails the escaped code is emitted as-is so the
/// content is never lost.
pub struct CodeBlockTransformer<'m> {
  syntax_manager: Option<&'m SyntaxManager>,
  theme:          Option<&'m str>,
}

impl<'m> CodeBlockTransformer<'m> {
  #[must_use]
  pub const fn new(
    syntax_manager: Option<&'m SyntaxManager>,
    theme: Option<&'m str>,
  ) -> Self {
    Self {
      syntax_manager,
      theme,
    }
  }

  /// Render the body of one code block.
  #[must_use]
  pub fn render_body(&self, code: &str, language: &str) -> String {
    if let Some(manager) = self.syntax_manager {
      match manager.highlight_code(code, language, self.theme) {
        Ok(html) => return html,
        Err(e) => {
          log::error!("Failed to highlight {language} code block: {e}");
        },
      }
    }
    plain_code_block(code, language)
  }

  /// Render the complete component for a code block.
  #[must_use]
  pub fn render(&self, code: &str, info: &str) -> String {
    let (language, filename) = parse_info_string(info);
    let body = self.render_body(code, &language);

    let filename_html = filename.map_or_else(String::new, |name| {
      format!("<span class=\"code-filename\">{}</span>", encode_text(&name))
    });

    format!(
      "<div class=\"code-block-wrapper\" data-language=\"{lang_attr}\">\n<div \
       class=\"code-block-header\"><span \
       class=\"code-language\">{lang_text}</span>{filename_html}<button \
       type=\"button\" class=\"copy-button\" aria-label=\"Copy \
       code\">Copy</button></div>\n<div \
       class=\"code-block\">{body}</div>\n</div>\n",
      lang_attr = encode_double_quoted_attribute(&language),
      lang_text = encode_text(&language),
    )
  }
}

impl AstTransformer for CodeBlockTransformer<'_> {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    let blocks: Vec<_> = node
      .descendants()
      .filter_map(|n| {
        match &n.data.borrow().value {
          NodeValue::CodeBlock(block) if block.fenced => {
            Some((n, block.info.clone(), block.literal.clone()))
          },
          _ => None,
        }
      })
      .collect();

    for (block, info, literal) in blocks {
      let html = self.render(&literal, &info);
      block.data.borrow_mut().value = NodeValue::Raw(html);
    }
  }
}

/// Unhighlighted fallback rendering of a code block.
#[must_use]
pub fn plain_code_block(code: &str, language: &str) -> String {
  format!(
    "<pre><code class=\"language-{}\">{}</code></pre>",
    encode_double_quoted_attribute(language),
    encode_text(code)
  )
}

/// Split a fence info string into language and optional file name.
///
/// ```text
/// rust title="src/main.rs"
/// json filename=settings.json
/// ```
#[must_use]
pub fn parse_info_string(info: &str) -> (String, Option<String>) {
  static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:title|filename)=(?:"([^"]*)"|(\S+))"#).unwrap_or_else(
      |e| {
        log::error!("Failed to compile FILENAME_RE regex: {e}");
        utils::never_matching_regex()
      },
    )
  });

  let language = info
    .split_whitespace()
    .next()
    .filter(|token| !token.contains('='))
    .unwrap_or("text")
    .to_string();

  let filename = FILENAME_RE
    .captures(info)
    .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
    .map(|m| m.as_str().to_string())
    .filter(|name| !name.is_empty());

  (language, filename)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_info_string() {
    assert_eq!(parse_info_string(""), ("text".to_string(), None));
    assert_eq!(parse_info_string("rust"), ("rust".to_string(), None));
    assert_eq!(
      parse_info_string("rust title=\"src/main.rs\""),
      ("rust".to_string(), Some("src/main.rs".to_string()))
    );
    assert_eq!(
      parse_info_string("json filename=settings.json"),
      ("json".to_string(), Some("settings.json".to_string()))
    );
    assert_eq!(
      parse_info_string("title=\"only\""),
      ("text".to_string(), Some("only".to_string()))
    );
  }

  #[test]
  fn test_plain_code_block_escapes() {
    let html = plain_code_block("a < b && c", "text");
    assert_eq!(
      html,
      "<pre><code class=\"language-text\">a &lt; b &amp;&amp; c</code></pre>"
    );
  }

  #[test]
  fn test_render_without_highlighter_uses_fallback() {
    let transformer = CodeBlockTransformer::new(None, None);
    let html = transformer.render("echo <hi>\n", "bash title=run.sh");

    assert!(html.contains("class=\"code-block-wrapper\""));
    assert!(html.contains("<span class=\"code-language\">bash</span>"));
    assert!(html.contains("<span class=\"code-filename\">run.sh</span>"));
    assert!(html.contains("class=\"copy-button\""));
    assert!(html.contains("echo &lt;hi&gt;"));
  }
}
