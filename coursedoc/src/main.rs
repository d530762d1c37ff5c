use std::io;

use color_eyre::eyre::Result;
use coursedoc::{
  cli::{BuildArgs, Cli, Commands},
  commands,
  config,
};
use log::{LevelFilter, debug};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  // Commands that do not need a configuration
  match cli.command {
    Some(Commands::Init {
      ref output,
      ref format,
      force,
    }) => return commands::init(output, format, force),
    Some(Commands::Completions { shell }) => {
      let mut cmd = Cli::command_definition();
      clap_complete::generate(shell, &mut cmd, "coursedoc", &mut io::stdout());
      return Ok(());
    },
    _ => {},
  }

  let mut config = config::load(&cli)?;

  match cli.command {
    Some(Commands::Build(ref args)) => config::merge_build_args(&mut config, args),
    None => config::merge_build_args(&mut config, &BuildArgs::default()),
    Some(Commands::Toc { ref content, .. } | Commands::Search { ref content, .. }) => {
      config::merge_content_args(&mut config, content);
    },
    Some(Commands::Init { .. } | Commands::Completions { .. }) => {},
  }

  // Setup thread pool once for all parallel operations
  let thread_count = config.jobs.unwrap_or_else(num_cpus::get);
  debug!("Using {thread_count} worker threads");
  rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build_global()?;

  let mut stdout = io::stdout().lock();
  match cli.command {
    Some(Commands::Toc { flat, .. }) => commands::toc(&config, flat, &mut stdout),
    Some(Commands::Search {
      ref query, limit, ..
    }) => commands::search(&config, query, limit, &mut stdout).map(|_| ()),
    _ => commands::build(&config).map(|_| ()),
  }
}
