//! Trait-based syntax highlighting for fenced code blocks.
//!
//! The only bundled backend is **Syntect** (with two-face for extended
//! syntax definitions), enabled by the default `syntect` feature. Without it
//! [`create_default_manager`] reports [`SyntaxError::NoBackendAvailable`] and
//! code blocks render unhighlighted.

pub mod error;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager};

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use syntect::*;

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] when built without the
/// `syntect` feature.
pub fn create_default_manager(
  theme: Option<&str>,
) -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    Ok(create_syntect_manager(theme))
  }

  #[cfg(not(feature = "syntect"))]
  {
    let _ = theme;
    Err(SyntaxError::NoBackendAvailable)
  }
}
