//! Feature viewer CLI.

use std::io::{self, IsTerminal};

use clap::Parser;
use viewer_cli::cli::{Cli, Command, LogFormatArg};
use viewer_cli::commands::{run_inspect, run_upload};
use viewer_cli::logging::{init_logging, LogConfig, LogFormat};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Upload(args) => run_upload(args),
        Command::Inspect(args) => run_inspect(args),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
        },
        with_ansi: !cli.no_color && io::stderr().is_terminal(),
        use_env_filter: !cli.verbosity.is_present(),
    }
}
