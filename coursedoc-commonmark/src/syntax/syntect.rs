//! Syntect-based syntax highlighting backend enhanced with two-face.
//!
//! Syntect uses Sublime Text syntax definitions; two-face adds the extended
//! set used by the Bat pager (TOML, Dockerfile, TypeScript and friends).

use std::sync::OnceLock;

use syntect::{
  highlighting::Theme,
  html::highlighted_html_for_string,
  parsing::SyntaxSet,
};
use two_face::{
  re_exports::syntect::highlighting::ThemeSet,
  theme::{EmbeddedLazyThemeSet, EmbeddedThemeName},
};

use super::{
  error::{SyntaxError, SyntaxResult},
  types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager},
};

/// Theme used when nothing else matches.
pub const FALLBACK_THEME: &str = "InspiredGitHub";

/// Syntect-based syntax highlighter
pub struct SyntectHighlighter {
  theme_name: String,
}

impl SyntectHighlighter {
  /// Create a new Syntect highlighter with the specified theme.
  #[must_use]
  pub fn new(theme_name: Option<String>) -> Self {
    Self {
      theme_name: theme_name.unwrap_or_else(|| FALLBACK_THEME.to_string()),
    }
  }

  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(two_face::syntax::extra_newlines)
  }

  fn theme_set() -> &'static EmbeddedLazyThemeSet {
    static THEME_SET: OnceLock<EmbeddedLazyThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(two_face::theme::extra)
  }

  fn default_theme_set() -> &'static ThemeSet {
    static DEFAULT_THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    DEFAULT_THEME_SET.get_or_init(ThemeSet::load_defaults)
  }

  /// Map the site's light/dark names onto bundled themes.
  fn embedded_theme(name: &str) -> Option<EmbeddedThemeName> {
    match name.to_lowercase().as_str() {
      "github-light" | "github" => Some(EmbeddedThemeName::Github),
      "github-dark" | "one-dark" | "twodark" => Some(EmbeddedThemeName::TwoDark),
      "dracula" => Some(EmbeddedThemeName::Dracula),
      "nord" => Some(EmbeddedThemeName::Nord),
      "monokai" => Some(EmbeddedThemeName::MonokaiExtended),
      "solarized-light" => Some(EmbeddedThemeName::SolarizedLight),
      "solarized-dark" => Some(EmbeddedThemeName::SolarizedDark),
      _ => None,
    }
  }

  fn get_theme(&self, theme_name: Option<&str>) -> &'static Theme {
    let name = theme_name
      .filter(|name| !name.is_empty())
      .unwrap_or(&self.theme_name);

    if let Some(theme) = Self::default_theme_set().themes.get(name) {
      return theme;
    }

    if let Some(embedded) = Self::embedded_theme(name) {
      return Self::theme_set().get(embedded);
    }

    log::debug!("Unknown highlight theme {name:?}, using {FALLBACK_THEME}");
    Self::default_theme_set()
      .themes
      .get(FALLBACK_THEME)
      .unwrap_or_else(|| Self::theme_set().get(EmbeddedThemeName::Github))
  }
}

impl Default for SyntectHighlighter {
  fn default() -> Self {
    Self::new(None)
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "Syntect"
  }

  fn supported_languages(&self) -> Vec<String> {
    Self::syntax_set()
      .syntaxes()
      .iter()
      .flat_map(|syntax| {
        std::iter::once(syntax.name.to_lowercase())
          .chain(syntax.file_extensions.iter().map(|ext| ext.to_lowercase()))
      })
      .collect()
  }

  fn supports_language(&self, language: &str) -> bool {
    Self::syntax_set().find_syntax_by_token(language).is_some()
  }

  fn highlight(
    &self,
    code: &str,
    language: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<String> {
    let syntax_set = Self::syntax_set();
    let syntax = syntax_set
      .find_syntax_by_token(language)
      .unwrap_or_else(|| syntax_set.find_syntax_plain_text());

    let theme = self.get_theme(theme);

    highlighted_html_for_string(code, syntax_set, syntax, theme)
      .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))
  }
}

/// Create a Syntect-based syntax manager.
#[must_use]
pub fn create_syntect_manager(theme: Option<&str>) -> SyntaxManager {
  let highlighter = Box::new(SyntectHighlighter::default());
  let config = SyntaxConfig {
    default_theme: Some(theme.unwrap_or(FALLBACK_THEME).to_string()),
    ..SyntaxConfig::default()
  };
  SyntaxManager::new(highlighter, config)
}
