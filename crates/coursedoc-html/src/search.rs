//! Chunked full-text search over the course document.
//!
//! The document is cut into fixed windows of lines; every window long enough
//! to be useful becomes one [`SearchResult`]. [`SearchIndex`] answers queries
//! in process (used by `coursedoc search`) and its records are exported as
//! `assets/search-data.json` for the browser, which ranks them the same way.
use std::{
  collections::{HashMap, HashSet},
  fs,
  path::Path,
};

use color_eyre::eyre::{Context, Result};
use coursedoc_commonmark::{generate_heading_id, utils::parse_heading_line};
use coursedoc_config::SearchConfig;
use log::info;
use serde::{Deserialize, Serialize};

/// Deepest heading level that can title a chunk.
const CHUNK_TITLE_MAX_LEVEL: u8 = 3;

/// One searchable chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
  /// `doc-N`, numbered in document order.
  pub id: String,

  /// First heading of the chunk, or `Section N`.
  pub title: String,

  /// Leading characters of the chunk.
  pub content: String,

  /// Anchor of the heading the title came from.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub heading_id: Option<String>,
}

/// Indexed form of a document.
#[derive(Debug, Clone)]
struct IndexedDocument {
  /// Lower-cased `"{title} {content}"`.
  text:   String,
  title:  String,
  tokens: HashSet<String>,
}

/// Search index over [`SearchResult`] records.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
  order:   Vec<String>,
  indexed: HashMap<String, IndexedDocument>,
  records: HashMap<String, SearchResult>,
}

/// Split text into lower-case runs of alphanumeric characters.
///
/// CJK text has no spaces, so a run of ideographs forms a single token.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
  text
    .to_lowercase()
    .split(|c: char| !c.is_alphanumeric())
    .filter(|token| !token.is_empty())
    .map(str::to_string)
    .collect()
}

impl SearchIndex {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of documents.
  #[must_use]
  pub fn len(&self) -> usize {
    self.order.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  /// Records in insertion order.
  #[must_use]
  pub fn documents(&self) -> Vec<&SearchResult> {
    self
      .order
      .iter()
      .filter_map(|id| self.records.get(id))
      .collect()
  }

  /// Add or replace a document.
  ///
  /// Replacing keeps the original insertion position.
  pub fn add_document(&mut self, result: SearchResult) {
    let text = format!("{} {}", result.title, result.content).to_lowercase();
    let indexed = IndexedDocument {
      tokens: tokenize(&text).into_iter().collect(),
      title: result.title.to_lowercase(),
      text,
    };

    if !self.records.contains_key(&result.id) {
      self.order.push(result.id.clone());
    }
    self.indexed.insert(result.id.clone(), indexed);
    self.records.insert(result.id.clone(), result);
  }

  /// Remove every document.
  pub fn clear(&mut self) {
    self.order.clear();
    self.indexed.clear();
    self.records.clear();
  }

  /// Find documents containing every term of `query`.
  ///
  /// Each term scores 3 for an exact token hit, 2 for a token prefix hit and
  /// 1 for any other substring hit, plus 2 when it also occurs in the title.
  /// Results are ordered by score, then by insertion order, and truncated to
  /// `limit`.
  #[must_use]
  pub fn search(&self, query: &str, limit: usize) -> Vec<&SearchResult> {
    let terms = tokenize(query);
    if terms.is_empty() || limit == 0 {
      return Vec::new();
    }

    let mut hits: Vec<(usize, usize, &str)> = self
      .order
      .iter()
      .enumerate()
      .filter_map(|(position, id)| {
        let doc = self.indexed.get(id)?;
        score_document(doc, &terms).map(|score| (score, position, id.as_str()))
      })
      .collect();

    hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    hits
      .into_iter()
      .filter_map(|(_, _, id)| self.records.get(id))
      .take(limit)
      .collect()
  }
}

fn score_document(doc: &IndexedDocument, terms: &[String]) -> Option<usize> {
  let mut score = 0;
  for term in terms {
    if !doc.text.contains(term.as_str()) {
      return None;
    }

    score += if doc.tokens.contains(term) {
      3
    } else if doc.tokens.iter().any(|token| token.starts_with(term.as_str())) {
      2
    } else {
      1
    };

    if doc.title.contains(term.as_str()) {
      score += 2;
    }
  }
  Some(score)
}

/// Cut `content` into 10-line chunks and index them.
#[must_use]
pub fn build_search_index(content: &str) -> SearchIndex {
  build_search_index_with(content, &SearchConfig::default())
}

/// Cut `content` into chunks sized by `options` and index them.
#[must_use]
pub fn build_search_index_with(
  content: &str,
  options: &SearchConfig,
) -> SearchIndex {
  let mut index = SearchIndex::new();
  let lines: Vec<&str> = content.split('\n').collect();
  let mut doc_id = 0usize;

  for window in lines.chunks(options.chunk_lines.max(1)) {
    let joined = window.join("\n");
    let chunk = joined.trim();
    if chunk.chars().count() <= options.min_chunk_chars {
      continue;
    }

    // Lines of the trimmed chunk, so an indented first heading still counts.
    let heading = chunk
      .split('\n')
      .find_map(|line| parse_heading_line(line, CHUNK_TITLE_MAX_LEVEL))
      .map(|(_, text)| text);

    let (title, heading_id) = match heading {
      Some(raw) => (raw.trim().to_string(), Some(generate_heading_id(raw))),
      None => (format!("Section {}", doc_id + 1), None),
    };

    index.add_document(SearchResult {
      id: format!("doc-{doc_id}"),
      title,
      content: chunk.chars().take(options.snippet_chars).collect(),
      heading_id,
    });
    doc_id += 1;
  }

  index
}

/// Write the index records to `assets/search-data.json` below `output_dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file written.
pub fn write_search_data(index: &SearchIndex, output_dir: &Path) -> Result<()> {
  let assets_dir = output_dir.join("assets");
  fs::create_dir_all(&assets_dir).wrap_err_with(|| {
    format!("Failed to create assets directory {}", assets_dir.display())
  })?;

  let search_data_path = assets_dir.join("search-data.json");
  let json = serde_json::to_string(&index.documents())?;
  fs::write(&search_data_path, json).wrap_err_with(|| {
    format!(
      "Failed to write search data to {}",
      search_data_path.display()
    )
  })?;

  info!("Search index written: {} chunks", index.len());
  Ok(())
}
