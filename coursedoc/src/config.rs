//! Resolve the effective configuration: files, then `--config` overrides,
//! then command line flags.
use color_eyre::eyre::{Context, Result};
use coursedoc_config::Config;

use crate::cli::{BuildArgs, Cli, ContentArgs};

/// Load the configuration files and overrides named on the command line.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, or an override is
/// invalid.
pub fn load(cli: &Cli) -> Result<Config> {
  Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")
}

/// Apply content selection flags.
pub fn merge_content_args(config: &mut Config, args: &ContentArgs) {
  if let Some(ref input_dir) = args.input_dir {
    config.content_dir.clone_from(input_dir);
  }
  if !args.read_order.is_empty() {
    config.read_order.clone_from(&args.read_order);
  }
}

/// Apply `build` flags on top of the loaded configuration.
pub fn merge_build_args(config: &mut Config, args: &BuildArgs) {
  merge_content_args(config, &args.content);

  if let Some(ref output_dir) = args.output_dir {
    config.output_dir.clone_from(output_dir);
  }
  if let Some(ref title) = args.title {
    config.title.clone_from(title);
  }
  if let Some(ref footer) = args.footer {
    config.footer_text.clone_from(footer);
  }
  if let Some(ref template_dir) = args.template_dir {
    config.template_dir = Some(template_dir.clone());
  }
  if args.jobs.is_some() {
    config.jobs = args.jobs;
  }
  if args.no_search {
    config.search.enable = false;
  }
  if args.no_highlight {
    config.highlight_code = false;
  }
}
