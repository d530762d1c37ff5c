use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::ConfigError, search::SearchConfig};

/// File names probed, in order, when no config file is given explicitly.
pub const CONFIG_FILENAMES: [&str; 4] = [
  "coursedoc.toml",
  "coursedoc.json",
  ".coursedoc.toml",
  ".config/coursedoc.toml",
];

/// Main course file read when nothing else is configured.
pub const DEFAULT_COURSE_FILE: &str = "Claude_Code_培训教程.md";

/// Configuration for the coursedoc site generator.
///
/// [`Config`] controls where the course material is read from, how it is
/// rendered and where the site is written. Fields are typically loaded from a
/// TOML or JSON config file, then adjusted by `--config KEY=VALUE` overrides
/// and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Directory containing the course material.
  pub content_dir: PathBuf,

  /// Files or directories (relative to `content_dir`) joined into the page.
  pub read_order: Vec<String>,

  /// Output directory for the generated site.
  pub output_dir: PathBuf,

  /// Page title, used when the document has no level-1 heading.
  pub title: String,

  /// Text inserted in the footer.
  pub footer_text: String,

  /// Directory with template overrides.
  pub template_dir: Option<PathBuf>,

  /// Whether to syntax-highlight fenced code blocks.
  pub highlight_code: bool,

  /// Highlighting theme name.
  pub highlight_theme: Option<String>,

  /// Enable GitHub Flavored Markdown extensions.
  pub gfm: bool,

  /// Number of threads used for parallel reads.
  pub jobs: Option<usize>,

  /// Search configuration.
  pub search: SearchConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      content_dir:     PathBuf::from("content"),
      read_order:      vec![DEFAULT_COURSE_FILE.to_string()],
      output_dir:      PathBuf::from("out"),
      title:           "Course Documentation".to_string(),
      footer_text:     "Generated with coursedoc".to_string(),
      template_dir:    None,
      highlight_code:  true,
      highlight_theme: None,
      gfm:             true,
      jobs:            None,
      search:          SearchConfig::default(),
    }
  }
}

impl Config {
  /// Returns whether the search index should be generated.
  #[must_use]
  pub const fn is_search_enabled(&self) -> bool {
    self.search.enable
  }

  /// Read a config file (TOML or JSON) into a generic value.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format
  /// is unsupported.
  pub fn read_file_value(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let ext = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match ext.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some("toml") => {
        let table: toml::Table = toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })?;
        Ok(serde_json::to_value(table)?)
      },
      Some(_) => {
        Err(ConfigError::UnsupportedFormat(path.display().to_string()))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from a single file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, parsed or contains unknown
  /// keys.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let value = Self::read_file_value(path)?;
    serde_json::from_value(value).map_err(|e| {
      ConfigError::Config(format!("Invalid config in {}: {}", path.display(), e))
    })
  }

  /// Load configuration from files and `KEY=VALUE` overrides.
  ///
  /// Explicit files are merged in order, later files overriding only the
  /// keys they set. Without explicit files a config file is looked up in the
  /// working directory; without one the defaults apply. Overrides are applied
  /// last.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut merged = Value::Object(serde_json::Map::new());

    if config_files.is_empty() {
      if let Some(discovered) = Self::find_config_file() {
        log::info!("Using discovered config file: {}", discovered.display());
        merge_values(&mut merged, Self::read_file_value(&discovered)?);
      }
    } else {
      for config_path in config_files {
        let value = Self::read_file_value(config_path).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to load config from {}: {}",
            config_path.display(),
            e
          ))
        })?;
        merge_values(&mut merged, value);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
    }

    let mut config: Self = serde_json::from_value(merged).map_err(|e| {
      ConfigError::Config(format!("Invalid configuration: {e}"))
    })?;

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// Keys are field names, with dots for nested tables (`search.enable`).
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust
  /// use coursedoc_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&[
  ///     "search.enable=false".to_string(),
  ///     "title=My Course".to_string(),
  ///   ])
  ///   .expect("valid overrides");
  /// assert!(!config.is_search_enabled());
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value does not fit the
  /// field.
  pub fn apply_override(
    &mut self,
    key: &str,
    raw: &str,
  ) -> Result<(), ConfigError> {
    let pointer = format!("/{}", key.replace('.', "/"));
    let schema = serde_json::to_value(Self::default())?;
    let expected = schema.pointer(&pointer).ok_or_else(|| {
      ConfigError::Config(format!(
        "Unknown configuration key: '{key}'. See `coursedoc init` for \
         supported keys."
      ))
    })?;

    let parsed = parse_override_value(key, raw, expected)?;

    let mut current = serde_json::to_value(&*self)?;
    let slot = current.pointer_mut(&pointer).ok_or_else(|| {
      ConfigError::Config(format!("Unknown configuration key: '{key}'"))
    })?;
    *slot = parsed;

    *self = serde_json::from_value(current).map_err(|e| {
      ConfigError::Config(format!("Invalid value for '{key}': '{raw}' - {e}"))
    })?;
    log::debug!("Config override applied: {key} = {raw}");
    Ok(())
  }

  /// Path of a template override, if the template directory provides one.
  #[must_use]
  pub fn get_template_file(&self, name: &str) -> Option<PathBuf> {
    self
      .template_dir
      .as_ref()
      .map(|dir| dir.join(name))
      .filter(|path| path.is_file())
  }

  /// Search for a config file in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search for a config file in `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Validate all paths specified in the configuration.
  ///
  /// Missing `read_order` entries are only logged; they are skipped while
  /// reading.
  ///
  /// # Errors
  ///
  /// Returns an error if the content or template directory is missing.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if self.content_dir.is_dir() {
      for entry in &self.read_order {
        let path = self.content_dir.join(entry);
        if !path.exists() {
          log::warn!("Content entry not found, skipping: {}", path.display());
        }
      }
    } else {
      errors.push(format!(
        "Content directory does not exist: {}",
        self.content_dir.display()
      ));
    }

    if let Some(ref template_dir) = self.template_dir
      && !template_dir.is_dir()
    {
      errors.push(format!(
        "Template directory does not exist: {}",
        template_dir.display()
      ));
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration path validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Write a default configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

/// Deep-merge `other` into `base`; objects merge key by key, anything else
/// is replaced.
pub fn merge_values(base: &mut Value, other: Value) {
  match (base, other) {
    (Value::Object(base_map), Value::Object(other_map)) => {
      for (key, value) in other_map {
        match base_map.get_mut(&key) {
          Some(existing) => merge_values(existing, value),
          None => {
            base_map.insert(key, value);
          },
        }
      }
    },
    (slot, value) => *slot = value,
  }
}

/// Turn the textual value of an override into JSON shaped like `expected`.
fn parse_override_value(
  key: &str,
  raw: &str,
  expected: &Value,
) -> Result<Value, ConfigError> {
  match expected {
    Value::Bool(_) => {
      match raw.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(Value::Bool(true)),
        "false" | "no" | "0" | "off" => Ok(Value::Bool(false)),
        _ => {
          Err(ConfigError::Config(format!(
            "Invalid boolean value for '{key}': '{raw}'. Expected \
             true/false, yes/no, or 1/0"
          )))
        },
      }
    },
    Value::String(_) => Ok(Value::String(raw.to_string())),
    Value::Null if raw.is_empty() => Ok(Value::Null),
    Value::Array(_) => {
      match parse_toml_scalar(raw) {
        Some(array @ Value::Array(_)) => Ok(array),
        _ => Ok(Value::Array(vec![Value::String(raw.to_string())])),
      }
    },
    Value::Number(_) | Value::Null => {
      Ok(
        parse_toml_scalar(raw)
          .filter(Value::is_number)
          .unwrap_or_else(|| Value::String(raw.to_string())),
      )
    },
    Value::Object(_) => {
      Err(ConfigError::Config(format!(
        "Cannot override table '{key}' as a whole; set its fields instead"
      )))
    },
  }
}

/// Parse `raw` as a TOML value expression.
fn parse_toml_scalar(raw: &str) -> Option<Value> {
  let table: toml::Table = toml::from_str(&format!("value = {raw}")).ok()?;
  table
    .get("value")
    .and_then(|value| serde_json::to_value(value).ok())
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::expect_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.content_dir, PathBuf::from("content"));
    assert_eq!(config.read_order, vec![DEFAULT_COURSE_FILE.to_string()]);
    assert!(config.is_search_enabled());
    assert_eq!(config.search.chunk_lines, 10);
    assert_eq!(config.search.snippet_chars, 200);
  }

  #[test]
  fn test_merge_values_keeps_unset_keys() {
    let mut base = serde_json::json!({
      "title": "Base",
      "search": { "enable": true, "result_limit": 3 }
    });
    merge_values(
      &mut base,
      serde_json::json!({ "search": { "enable": false } }),
    );

    assert_eq!(base["title"], "Base");
    assert_eq!(base["search"]["enable"], false);
    assert_eq!(base["search"]["result_limit"], 3);
  }

  #[test]
  fn test_apply_overrides_boolean() {
    let mut config = Config::default();
    config
      .apply_overrides(&[
        "search.enable=false".to_string(),
        "highlight_code=no".to_string(),
        "gfm=yes".to_string(),
      ])
      .expect("overrides apply");

    assert!(!config.is_search_enabled());
    assert!(!config.highlight_code);
    assert!(config.gfm);
  }

  #[test]
  fn test_apply_overrides_string_and_path() {
    let mut config = Config::default();
    config
      .apply_overrides(&[
        "title=Test Course".to_string(),
        "output_dir=/tmp/output".to_string(),
        "template_dir=theme".to_string(),
        "highlight_theme=github-dark".to_string(),
      ])
      .expect("overrides apply");

    assert_eq!(config.title, "Test Course");
    assert_eq!(config.output_dir, PathBuf::from("/tmp/output"));
    assert_eq!(config.template_dir, Some(PathBuf::from("theme")));
    assert_eq!(config.highlight_theme.as_deref(), Some("github-dark"));
  }

  #[test]
  fn test_apply_overrides_numeric() {
    let mut config = Config::default();
    config
      .apply_overrides(&["jobs=8".to_string(), "search.chunk_lines=5".to_string()])
      .expect("overrides apply");

    assert_eq!(config.jobs, Some(8));
    assert_eq!(config.search.chunk_lines, 5);

    config.apply_override("jobs", "").expect("empty clears");
    assert_eq!(config.jobs, None);
  }

  #[test]
  fn test_apply_overrides_read_order() {
    let mut config = Config::default();
    config
      .apply_override("read_order", r#"["intro.md", "chapters"]"#)
      .expect("array");
    assert_eq!(config.read_order, vec!["intro.md", "chapters"]);

    config.apply_override("read_order", "single.md").expect("string");
    assert_eq!(config.read_order, vec!["single.md"]);
  }

  #[test]
  fn test_apply_overrides_errors() {
    let mut config = Config::default();

    let err = config
      .apply_overrides(&["no_equals_sign".to_string()])
      .expect_err("format");
    assert!(err.to_string().contains("Expected KEY=VALUE"));

    let err = config
      .apply_override("unknown_key", "value")
      .expect_err("unknown");
    assert!(err.to_string().contains("Unknown configuration key"));

    let err = config.apply_override("gfm", "maybe").expect_err("bool");
    assert!(err.to_string().contains("Invalid boolean"));

    let err = config
      .apply_override("jobs", "not_a_number")
      .expect_err("number");
    assert!(err.to_string().contains("Invalid value"));

    let err = config.apply_override("search", "off").expect_err("table");
    assert!(err.to_string().contains("Cannot override table"));
  }

  #[test]
  fn test_load_merges_files_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("base.toml");
    let second = dir.path().join("extra.json");
    fs::write(
      &first,
      "title = \"Base\"\ngfm = false\n[search]\nresult_limit = 3\n",
    )
    .expect("write");
    fs::write(&second, r#"{ "title": "Extra", "search": { "enable": false } }"#)
      .expect("write");

    let config = Config::load(&[first, second], &["jobs=2".to_string()])
      .expect("config loads");

    assert_eq!(config.title, "Extra");
    assert!(!config.gfm);
    assert!(!config.search.enable);
    assert_eq!(config.search.result_limit, 3);
    assert_eq!(config.jobs, Some(2));
  }

  #[test]
  fn test_from_file_rejects_unknown_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "titel = \"typo\"\n").expect("write");

    assert!(Config::from_file(&path).is_err());
  }

  #[test]
  fn test_from_file_unsupported_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, "title: x\n").expect("write");

    let err = Config::from_file(&path).expect_err("unsupported");
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
  }

  #[test]
  fn test_find_config_file_in() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(Config::find_config_file_in(dir.path()).is_none());

    fs::write(dir.path().join("coursedoc.json"), "{}").expect("write");
    fs::write(dir.path().join("coursedoc.toml"), "").expect("write");
    let found = Config::find_config_file_in(dir.path()).expect("found");
    assert!(found.ends_with("coursedoc.toml"));
  }

  #[test]
  fn test_validate_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::default();
    config.content_dir = dir.path().to_path_buf();
    assert!(config.validate_paths().is_ok());

    config.template_dir = Some(dir.path().join("missing"));
    let err = config.validate_paths().expect_err("missing template dir");
    assert!(err.to_string().contains("Template directory does not exist"));

    config.content_dir = dir.path().join("nope");
    assert!(config.validate_paths().is_err());
  }

  #[test]
  fn test_generate_default_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("coursedoc.toml");
    Config::generate_default_config("toml", &path).expect("written");

    let loaded = Config::from_file(&path).expect("loads");
    assert_eq!(loaded, Config::default());
  }
}
