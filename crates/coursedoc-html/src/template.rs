use std::{fmt::Write, fs};

use color_eyre::eyre::{Context, Result};
use coursedoc_commonmark::{HeadingNode, MarkdownResult, ObserverOptions, Section};
use coursedoc_config::Config;
use coursedoc_templates as templates;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::json;
use tera::Tera;

/// Levels at or above this depth start out expanded in the sidebar.
const EXPANDED_MAX_LEVEL: u8 = 2;

pub const STYLESHEET_PATH: &str = "assets/style.css";
pub const MAIN_JS_PATH: &str = "assets/main.js";
pub const SEARCH_DATA_PATH: &str = "assets/search-data.json";

/// Render the course page.
///
/// # Errors
///
/// Returns an error if a template override cannot be read or the template
/// fails to render.
pub fn render_page(
  config: &Config,
  result: &MarkdownResult,
  search_enabled: bool,
) -> Result<String> {
  let mut tera = Tera::default();
  let template_content =
    get_template_content(config, "default.html", templates::DEFAULT_TEMPLATE)?;
  tera
    .add_raw_template("default", &template_content)
    .wrap_err("Failed to parse page template")?;

  let title = result.title.as_deref().unwrap_or(&config.title);

  // "default" carries no extension, so tera does not autoescape it.
  let mut ctx = tera::Context::new();
  ctx.insert("title", &encode_text(title));
  ctx.insert("site_title", &encode_text(&config.title));
  ctx.insert("footer_text", &encode_text(&config.footer_text));
  ctx.insert("content", &result.html);
  ctx.insert("toc_html", &render_toc_html(&result.toc));
  ctx.insert("headings_html", &render_headings_html(&result.headings));
  ctx.insert("stylesheet_path", STYLESHEET_PATH);
  ctx.insert("main_js_path", MAIN_JS_PATH);
  ctx.insert("search_enabled", &search_enabled);
  ctx.insert("search_data_path", SEARCH_DATA_PATH);
  ctx.insert("search_result_limit", &config.search.result_limit);
  ctx.insert(
    "observer_options",
    &observer_options_json(&ObserverOptions::default()),
  );

  let html = tera
    .render("default", &ctx)
    .wrap_err("Failed to render page template")?;
  Ok(html)
}

/// Template text from `config.template_dir`, or the embedded fallback.
///
/// # Errors
///
/// Returns an error if an override exists but cannot be read.
pub fn get_template_content(
  config: &Config,
  template_name: &str,
  fallback: &str,
) -> Result<String> {
  if let Some(template_path) = config.get_template_file(template_name) {
    log::debug!("Using template override {}", template_path.display());
    return fs::read_to_string(&template_path).wrap_err_with(|| {
      format!("Failed to read template file: {}", template_path.display())
    });
  }
  Ok(fallback.to_string())
}

/// Options for the browser `IntersectionObserver`.
#[must_use]
pub fn observer_options_json(options: &ObserverOptions) -> String {
  json!({
    "rootMargin": options.root_margin,
    "threshold": options.thresholds,
  })
  .to_string()
}

/// Render the nested sidebar.
///
/// Sections with children get a toggle button; H1 and H2 entries start
/// expanded, deeper ones collapsed.
#[must_use]
pub fn render_toc_html(sections: &[Section]) -> String {
  if sections.is_empty() {
    return String::new();
  }
  let mut html = String::new();
  write_toc_list(&mut html, sections);
  html
}

fn write_toc_list(html: &mut String, sections: &[Section]) {
  html.push_str("<ul>");
  for section in sections {
    let has_children = !section.children.is_empty();
    let expanded = has_children && section.level <= EXPANDED_MAX_LEVEL;

    html.push_str(if expanded {
      "<li class=\"toc-item expanded\">"
    } else {
      "<li class=\"toc-item\">"
    });
    html.push_str("<div class=\"toc-row\">");
    if has_children {
      // Writing to String is infallible
      let _ = write!(
        html,
        "<button type=\"button\" class=\"toc-toggle\" aria-expanded=\"{expanded}\" aria-label=\"Toggle section\"></button>"
      );
    } else {
      html.push_str("<span class=\"toc-spacer\"></span>");
    }

    let id = encode_double_quoted_attribute(&section.id);
    let _ = write!(
      html,
      "<a class=\"toc-link\" href=\"#{id}\" data-target=\"{id}\" data-level=\"{}\">{}</a>",
      section.level,
      encode_text(&section.title)
    );
    html.push_str("</div>");

    if has_children {
      write_toc_list(html, &section.children);
    }
    html.push_str("</li>");
  }
  html.push_str("</ul>");
}

/// Render the flat "on this page" list.
#[must_use]
pub fn render_headings_html(headings: &[HeadingNode]) -> String {
  if headings.is_empty() {
    return String::new();
  }

  let mut html = String::from("<ul class=\"heading-list\">");
  for heading in headings {
    let id = encode_double_quoted_attribute(&heading.id);
    let _ = writeln!(
      html,
      "<li data-level=\"{}\"><a class=\"heading-link\" href=\"#{id}\" data-target=\"{id}\">{}</a></li>",
      heading.level,
      encode_text(&heading.text)
    );
  }
  html.push_str("</ul>");
  html
}
