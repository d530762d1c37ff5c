use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

/// Command line interface for coursedoc
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "coursedoc: single-page course documentation generator"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`]). Builds the site when omitted.
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// Where the course content comes from.
#[derive(Args, Debug, Default, Clone)]
pub struct ContentArgs {
  /// Directory the read order is resolved against.
  #[arg(short, long = "input-dir")]
  pub input_dir: Option<PathBuf>,

  /// Files or directories to read, in order (can be specified multiple
  /// times). Replaces the configured read order.
  #[arg(short = 'r', long = "read", action = clap::ArgAction::Append)]
  pub read_order: Vec<String>,
}

/// Options of the `build` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
  #[command(flatten)]
  pub content: ContentArgs,

  /// Output directory for the generated site.
  #[arg(short, long)]
  pub output_dir: Option<PathBuf>,

  /// Title of the site.
  #[arg(short = 'T', long)]
  pub title: Option<String>,

  /// Footer text of the site.
  #[arg(short = 'f', long)]
  pub footer: Option<String>,

  /// Directory containing template overrides (default.html, default.css,
  /// main.js).
  #[arg(long = "template-dir")]
  pub template_dir: Option<PathBuf>,

  /// Number of threads to use for reading content.
  #[arg(short = 'p', long = "jobs")]
  pub jobs: Option<usize>,

  /// Skip generating search data and the search box.
  #[arg(long = "no-search", action = clap::ArgAction::SetTrue)]
  pub no_search: bool,

  /// Disable syntax highlighting for code blocks.
  #[arg(long = "no-highlight", action = clap::ArgAction::SetTrue)]
  pub no_highlight: bool,
}

/// All supported subcommands for the coursedoc CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Generate the documentation site.
  Build(BuildArgs),

  /// Print the table of contents as JSON.
  Toc {
    #[command(flatten)]
    content: ContentArgs,

    /// Print the flat "on this page" heading list instead of the tree.
    #[arg(long)]
    flat: bool,
  },

  /// Search the course content.
  Search {
    #[command(flatten)]
    content: ContentArgs,

    /// Query text.
    query: String,

    /// Maximum number of results (defaults to `search.result_limit`).
    #[arg(short = 'n', long)]
    limit: Option<usize>,
  },

  /// Initialize a new coursedoc configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "coursedoc.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(long)]
    force: bool,
  },

  /// Print shell completions to stdout.
  Completions {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    shell: Shell,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// The clap command, for completions.
  #[must_use]
  pub fn command_definition() -> clap::Command {
    Self::command()
  }
}
