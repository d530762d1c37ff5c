//! End-to-end site export.
use std::{fs, path::PathBuf};

use color_eyre::eyre::{Context, Result};
use coursedoc_commonmark::{
  MarkdownOptions,
  MarkdownProcessor,
  flatten_sections,
  process_with_recovery,
};
use coursedoc_config::Config;
use coursedoc_templates as templates;
use log::info;

use crate::{
  content::get_all_content,
  search::{build_search_index_with, write_search_data},
  template::{get_template_content, render_page},
};

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
  /// Path of the written `index.html`.
  pub index_path:    PathBuf,
  /// Number of sections in the table of contents, nested ones included.
  pub sections:      usize,
  /// Number of entries in the flat heading list.
  pub headings:      usize,
  /// Number of search chunks, `None` when search is disabled.
  pub search_chunks: Option<usize>,
}

/// Renderer options derived from the configuration.
#[must_use]
pub fn markdown_options(config: &Config) -> MarkdownOptions {
  MarkdownOptions {
    gfm:             config.gfm,
    highlight_code:  config.highlight_code,
    highlight_theme: config.highlight_theme.clone(),
  }
}

/// Aggregate, render, index and write the site into `config.output_dir`.
///
/// # Errors
///
/// Returns an error if the configured paths are invalid or any output file
/// cannot be written.
pub fn generate_site(config: &Config) -> Result<SiteSummary> {
  config
    .validate_paths()
    .wrap_err("Invalid content configuration")?;

  info!("Reading content from {}", config.content_dir.display());
  let content = get_all_content(&config.content_dir, &config.read_order);

  let processor = MarkdownProcessor::new(markdown_options(config));
  let result = process_with_recovery(&processor, &content);
  info!(
    "Rendered {} top-level sections, {} headings",
    result.toc.len(),
    result.headings.len()
  );

  let search_enabled = config.is_search_enabled();
  let page = render_page(config, &result, search_enabled)?;

  let output_dir = &config.output_dir;
  let assets_dir = output_dir.join("assets");
  fs::create_dir_all(&assets_dir).wrap_err_with(|| {
    format!("Failed to create output directory {}", assets_dir.display())
  })?;

  let index_path = output_dir.join("index.html");
  fs::write(&index_path, page).wrap_err_with(|| {
    format!("Failed to write {}", index_path.display())
  })?;

  let css = get_template_content(config, "default.css", templates::DEFAULT_CSS)?;
  fs::write(assets_dir.join("style.css"), css)
    .wrap_err("Failed to write CSS file")?;

  let script = get_template_content(config, "main.js", templates::MAIN_JS)?;
  fs::write(assets_dir.join("main.js"), script)
    .wrap_err("Failed to write main.js")?;

  let search_chunks = if search_enabled {
    let index = build_search_index_with(&content, &config.search);
    write_search_data(&index, output_dir)?;
    Some(index.len())
  } else {
    None
  };

  info!("Site written to {}", output_dir.display());

  Ok(SiteSummary {
    index_path,
    sections: flatten_sections(&result.toc).len(),
    headings: result.headings.len(),
    search_chunks,
  })
}
