use std::{fs, io::Write, path::Path};

use color_eyre::eyre::{Context, Result, bail};
use coursedoc_commonmark::MarkdownProcessor;
use coursedoc_config::Config;
use coursedoc_html::{
  SiteSummary,
  content::get_all_content,
  generate::markdown_options,
  generate_site,
  search::build_search_index_with,
};
use log::info;

/// Generate the site.
///
/// # Errors
///
/// Returns an error if the site cannot be generated.
pub fn build(config: &Config) -> Result<SiteSummary> {
  info!("Starting documentation generation...");
  let summary = generate_site(config)?;
  info!(
    "Documentation generated successfully in {} ({} sections)",
    config.output_dir.display(),
    summary.sections
  );
  Ok(summary)
}

/// Write the table of contents (or the flat heading list) as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn toc(config: &Config, flat: bool, out: &mut impl Write) -> Result<()> {
  let content = get_all_content(&config.content_dir, &config.read_order);
  let result = MarkdownProcessor::new(markdown_options(config)).render(&content);

  let json = if flat {
    serde_json::to_string_pretty(&result.headings)?
  } else {
    serde_json::to_string_pretty(&result.toc)?
  };
  writeln!(out, "{json}").wrap_err("Failed to write table of contents")?;
  Ok(())
}

/// Query the chunk index and write one entry per hit.
///
/// Returns the number of hits.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn search(
  config: &Config,
  query: &str,
  limit: Option<usize>,
  out: &mut impl Write,
) -> Result<usize> {
  let content = get_all_content(&config.content_dir, &config.read_order);
  let index = build_search_index_with(&content, &config.search);
  let hits = index.search(query, limit.unwrap_or(config.search.result_limit));

  if hits.is_empty() {
    writeln!(out, "No results for '{query}'")?;
    return Ok(0);
  }

  for hit in &hits {
    match hit.heading_id {
      Some(ref anchor) => writeln!(out, "{} (#{anchor})", hit.title)?,
      None => writeln!(out, "{}", hit.title)?,
    }
    let snippet = hit.content.lines().next().unwrap_or_default();
    writeln!(out, "    {snippet}")?;
  }
  Ok(hits.len())
}

/// Write a default configuration file.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or it cannot
/// be written.
pub fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!(
      "Failed to generate configuration file: {}",
      output.display()
    )
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize your \
     documentation generation."
  );
  Ok(())
}
