use crate::{Config, error::ConfigError};

/// Default configuration in TOML, with a comment for every field.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# coursedoc configuration file

# Directory containing the course material
content_dir = "content"

# Files or directories (relative to content_dir) joined into the page, in order.
# A directory contributes every *.md file directly inside it, sorted by name.
read_order = ["Claude_Code_培训教程.md"]

# Output directory for the generated site
output_dir = "out"

# Page title, used when the document has no level-1 heading
title = "Course Documentation"

# Footer text
footer_text = "Generated with coursedoc"

# Directory with custom default.html / default.css / main.js overrides
# template_dir = "templates"

# Whether to syntax-highlight fenced code blocks
highlight_code = true

# Highlighting theme (github-light, github-dark, dracula, nord, ...)
# highlight_theme = "github-light"

# Enable GitHub Flavored Markdown (tables, task lists, strikethrough)
gfm = true

# Threads used to read content directories (defaults to the number of CPUs)
# jobs = 4

[search]
# Whether to generate assets/search-data.json
enable = true

# Lines per search chunk
chunk_lines = 10

# Chunks with this many characters or fewer are not indexed
min_chunk_chars = 20

# Characters kept for the result preview
snippet_chars = 200

# Results shown per query
result_limit = 8
"#;

/// Default configuration file content for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns an error for unknown formats or if JSON serialization fails.
pub fn get_template(format: &str) -> Result<String, ConfigError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE.to_string()),
    "json" => Ok(serde_json::to_string_pretty(&Config::default())?),
    other => Err(ConfigError::UnsupportedFormat(other.to_string())),
  }
}
