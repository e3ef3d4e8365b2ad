#![forbid(unsafe_code)]

mod cmd;
mod github;
mod omnifocus;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use g2o_core::config::default_config_path;
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "github2omnifocus",
    author,
    version,
    about = "Mirror GitHub issues, pull requests and notifications into OmniFocus",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by G2O_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for --format json.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (default: <config dir>/github2omnifocus/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }

    /// Explicit `--config`, else the per-user default location.
    fn config_path(&self, output: OutputMode) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_config_path().or_else(|err| cmd::fail(output, err.code(), err.to_string())),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Sync GitHub into OmniFocus",
        long_about = "Fetch open work from GitHub, compare it with the tasks in OmniFocus, then create missing tasks and complete stale ones.",
        after_help = "EXAMPLES:\n    # Sync every profile\n    github2omnifocus sync\n\n    # Preview one profile's review queue\n    github2omnifocus sync --profile work --category review --dry-run"
    )]
    Sync(cmd::sync::SyncArgs),

    #[command(
        about = "Reconcile two JSON snapshots offline",
        long_about = "Compute the adds and removes that would bring a task snapshot in line with an item snapshot, without contacting GitHub or OmniFocus.",
        after_help = "EXAMPLES:\n    # Compare snapshots, ignoring bookkeeping tags\n    github2omnifocus diff --desired items.json --current tasks.json --ignore-tag github --ignore-tag assigned\n\n    # Emit machine-readable output\n    github2omnifocus diff --desired items.json --current tasks.json --json"
    )]
    Diff(cmd::diff::DiffArgs),

    #[command(
        about = "Inspect configuration",
        after_help = "EXAMPLES:\n    # Show every profile with defaults filled in\n    github2omnifocus config show\n\n    # Show one profile as JSON\n    github2omnifocus config show --profile work --json"
    )]
    Config(cmd::config::ConfigArgs),

    #[command(
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    github2omnifocus completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("G2O_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "g2o_core=debug,github2omnifocus=debug,info"
        } else {
            "g2o_core=info,github2omnifocus=info,warn"
        })
    });

    let format = env::var("G2O_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    debug!(?output, "resolved output mode");

    match &cli.command {
        Commands::Sync(args) => {
            let config_path = cli.config_path(output)?;
            cmd::sync::run_sync(args, &config_path, output)
        }
        Commands::Diff(args) => cmd::diff::run_diff(args, output),
        Commands::Config(args) => {
            let config_path = cli.config_path(output)?;
            cmd::config::run_config(args, &config_path, output)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use g2o_core::model::Category;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["github2omnifocus", "config", "show", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_wins_over_json() {
        let cli = Cli::parse_from(["github2omnifocus", "--json", "--format", "text", "config", "show"]);
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn sync_parses_repeated_categories() {
        let cli = Cli::parse_from([
            "github2omnifocus",
            "sync",
            "--profile",
            "work",
            "--category",
            "review",
            "-c",
            "notifications",
            "--dry-run",
        ]);
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.profile.as_deref(), Some("work"));
                assert_eq!(args.categories, vec![Category::Review, Category::Notifications]);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn sync_rejects_unknown_category() {
        let result = Cli::try_parse_from(["github2omnifocus", "sync", "--category", "stars"]);
        assert!(result.is_err());
    }

    #[test]
    fn diff_requires_both_snapshots() {
        assert!(Cli::try_parse_from(["github2omnifocus", "diff", "--desired", "a.json"]).is_err());
        let cli = Cli::parse_from([
            "github2omnifocus",
            "diff",
            "--desired",
            "a.json",
            "--current",
            "b.json",
            "--ignore-tag",
            "github",
            "--ignore-tag",
            "assigned",
        ]);
        match cli.command {
            Commands::Diff(args) => assert_eq!(args.ignore_tags, vec!["github", "assigned"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["github2omnifocus", "config", "show", "--config", "/tmp/g2o.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/g2o.toml")));
        let path = cli.config_path(OutputMode::Text).expect("path");
        assert_eq!(path, PathBuf::from("/tmp/g2o.toml"));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["github2omnifocus", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }
}
