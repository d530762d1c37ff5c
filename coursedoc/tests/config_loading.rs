#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{fs, path::PathBuf};

use clap::Parser;
use coursedoc::{
  cli::{Cli, Commands},
  config,
};
use tempfile::tempdir;

#[test]
fn test_files_merge_then_overrides_then_flags() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path().join("base.toml");
  let local = temp_dir.path().join("local.toml");
  fs::write(
    &base,
    "title = \"Base\"\noutput_dir = \"public\"\n\n[search]\nresult_limit = 5\n",
  )
  .expect("Failed to write base config in test");
  fs::write(&local, "[search]\nchunk_lines = 20\n")
    .expect("Failed to write local config in test");

  let cli = Cli::try_parse_from([
    "coursedoc".into(),
    "build".into(),
    "-c".into(),
    base.into_os_string(),
    "-c".into(),
    local.into_os_string(),
    "--config".into(),
    "search.enable=no".into(),
    "-T".into(),
    "Flag title".into(),
  ])
  .expect("Failed to parse arguments in test");

  let mut loaded = config::load(&cli).expect("Failed to load config in test");
  if let Some(Commands::Build(ref args)) = cli.command {
    config::merge_build_args(&mut loaded, args);
  }

  assert_eq!(loaded.title, "Flag title");
  assert_eq!(loaded.output_dir, PathBuf::from("public"));
  assert_eq!(loaded.search.result_limit, 5);
  assert_eq!(loaded.search.chunk_lines, 20);
  assert!(!loaded.is_search_enabled());
}

#[test]
fn test_unknown_override_is_rejected() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let file = temp_dir.path().join("coursedoc.toml");
  fs::write(&file, "").expect("Failed to write config in test");

  let cli = Cli::try_parse_from([
    "coursedoc".into(),
    "-c".into(),
    file.into_os_string(),
    "--config".into(),
    "no_such_key=1".into(),
  ])
  .expect("Failed to parse arguments in test");

  assert!(config::load(&cli).is_err());
}

#[test]
fn test_unknown_file_key_is_rejected() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let file = temp_dir.path().join("coursedoc.toml");
  fs::write(&file, "input_dir = \"docs\"\n")
    .expect("Failed to write config in test");

  let cli = Cli::try_parse_from([
    "coursedoc".into(),
    "-c".into(),
    file.into_os_string(),
  ])
  .expect("Failed to parse arguments in test");

  assert!(config::load(&cli).is_err());
}
