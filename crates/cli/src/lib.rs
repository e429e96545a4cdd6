//! intray CLI library
//!
//! Argument parsing and command dispatch for the `intray` binary, kept in a
//! library so the commands can be driven from tests.

pub mod cmd;
pub mod command;
pub mod common;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intray_config::{Config, ConfigProvider};
use std::path::PathBuf;

use command::Command;
use common::RuntimeContext;

/// intray - tray notifications with user-defined hooks
#[derive(Debug, Parser)]
#[command(name = "intray")]
#[command(about = "Tray notifications with user-defined hooks")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging hooks)
    #[arg(long, env = "INTRAY_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage and fire hooks
    #[command(subcommand)]
    Hooks(HooksCommands),
}

/// Hook commands
#[derive(Debug, Subcommand)]
pub enum HooksCommands {
    /// Fire a hook point, exporting KEY=VALUE pairs to its scripts
    #[command(long_about = "Fire a hook point, exporting KEY=VALUE pairs to its scripts

Scripts are the executable files in <hooks_dir>/<POINT>/, run in filename
order. With hooks_failure_mode=abort a failing script stops the remaining
ones and this command exits non-zero.

Examples:
  • intray hooks run pre-add MESSAGE='build done' LEVEL=info
  • INTRAY_HOOKS_ASYNC=1 intray hooks run post-add ID=42")]
    Run(cmd::hooks::RunCommand),

    /// List hook scripts in execution order
    List(cmd::hooks::ListCommand),

    /// Create the hooks directory and one directory per hook point
    Init(cmd::hooks::InitCommand),

    /// Print the hooks directory
    Dir(cmd::hooks::DirCommand),
}

fn execute_command(command: &Commands, context: &RuntimeContext) -> Result<()> {
    match command {
        Commands::Hooks(hooks_cmd) => match hooks_cmd {
            HooksCommands::Run(run_cmd) => run_cmd.execute(context),
            HooksCommands::List(list_cmd) => list_cmd.execute(context),
            HooksCommands::Init(init_cmd) => init_cmd.execute(context),
            HooksCommands::Dir(dir_cmd) => dir_cmd.execute(context),
        },
    }
}

/// Main entry point for the CLI logic
///
/// Background hooks started by the command are always drained before this
/// returns, whether or not the command succeeded.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration loading fails
/// - Logging initialization fails
/// - The command fails (including a hook aborting)
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    intray_config::logging::init(
        cli.verbose || config.get_bool("debug", false),
        config.get_bool("quiet", false),
        cli.log_file.as_deref(),
    )?;

    let context = RuntimeContext::new(config);
    let result = execute_command(&cli.command, &context);

    intray_hooks::wait_for_pending_hooks();

    result
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_parse_run_with_vars() {
        let cli = Cli::try_parse_from([
            "intray",
            "hooks",
            "run",
            "pre-add",
            "MESSAGE=hello world",
            "LEVEL=info",
        ])
        .unwrap();

        let Commands::Hooks(HooksCommands::Run(run)) = cli.command else {
            panic!("expected hooks run");
        };
        assert_eq!(run.point, "pre-add");
        assert_eq!(run.vars, ["MESSAGE=hello world", "LEVEL=info"]);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "intray",
            "-v",
            "--log-file",
            "/tmp/intray.log",
            "hooks",
            "dir",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/intray.log")));
        assert!(matches!(cli.command, Commands::Hooks(HooksCommands::Dir(_))));
    }

    #[test]
    fn test_parse_list_optional_point() {
        let cli = Cli::try_parse_from(["intray", "hooks", "list"]).unwrap();
        let Commands::Hooks(HooksCommands::List(list)) = cli.command else {
            panic!("expected hooks list");
        };
        assert!(list.point.is_none());

        let cli =
            Cli::try_parse_from(["intray", "hooks", "list", "post-add", "--format", "json"])
                .unwrap();
        let Commands::Hooks(HooksCommands::List(list)) = cli.command else {
            panic!("expected hooks list");
        };
        assert_eq!(list.point.as_deref(), Some("post-add"));
        assert_eq!(list.format, "json");
    }

    #[test]
    fn test_run_requires_point() {
        assert!(Cli::try_parse_from(["intray", "hooks", "run"]).is_err());
    }
}
