//! Command-line entry point for config-profile.

use anyhow::Result;
use clap::Parser;

use config_profile::cli::{Cli, Command};
use config_profile::commands;
use config_profile::exec::SystemExecutor;
use config_profile::logging::{self, Logger};
use config_profile::resources::profiles_cmd::ProfilesCommandProvider;
use config_profile::resources::stamp::StampStore;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if matches!(args.command, Command::Version) {
        print_version();
        return Ok(());
    }

    let log_file = logging::log_file_path(args.command.name());
    logging::init_subscriber(args.verbose, log_file.as_deref());
    let log = Logger::new(log_file);

    let catalog = commands::load_catalog(&args.global, &log)?;
    let executor = SystemExecutor;
    let provider = ProfilesCommandProvider::new(&executor, StampStore::new(&args.global.state_dir));
    let dry_run = args.global.dry_run;

    match &args.command {
        Command::Apply => commands::apply::run(&catalog, &provider, &log, dry_run),
        Command::Refresh(opts) => commands::refresh::run(opts, &catalog, &provider, &log, dry_run),
        Command::Check => commands::check::run(&catalog, &log),
        Command::Version => Ok(()),
    }
}

#[allow(clippy::print_stdout)]
fn print_version() {
    let version = option_env!("CONFIG_PROFILE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    println!("config-profile {version}");
}
