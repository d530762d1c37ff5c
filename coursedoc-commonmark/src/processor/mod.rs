//! Markdown rendering.
//!
//! - [`core`]: Main processor implementation and rendering pipeline
//! - [`process`]: High-level processing functions with error recovery
//! - [`types`]: Options, the processor type and the AST transformers
pub mod core;
pub mod process;
pub mod types;

pub use process::process_with_recovery;
pub use types::{
  AstTransformer,
  CodeBlockTransformer,
  HeadingAnchorTransformer,
  MarkdownOptions,
  MarkdownProcessor,
  parse_info_string,
  plain_code_block,
};
