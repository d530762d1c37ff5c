use serde::{Deserialize, Serialize};

/// Configuration for search functionality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  /// Whether the search index is generated at all
  pub enable: bool,

  /// Number of source lines per indexed chunk
  pub chunk_lines: usize,

  /// Chunks whose trimmed text has at most this many characters are skipped
  pub min_chunk_chars: usize,

  /// Characters of a chunk kept as the result snippet
  pub snippet_chars: usize,

  /// Maximum number of results shown for one query
  pub result_limit: usize,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      enable:          true,
      chunk_lines:     10,
      min_chunk_chars: 20,
      snippet_chars:   200,
      result_limit:    8,
    }
  }
}
