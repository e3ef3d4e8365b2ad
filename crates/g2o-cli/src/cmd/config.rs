use anyhow::Result;
use clap::{Args, Subcommand};
use g2o_core::config::{Config, load_config};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use super::fail;
use crate::output::{OutputMode, render_mode};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show the resolved configuration with defaults filled in
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Only show this profile
    #[arg(long, short)]
    profile: Option<String>,
}

#[derive(Debug, Serialize)]
struct ShownConfig<'a> {
    path: &'a Path,
    #[serde(flatten)]
    config: Config,
}

pub fn run_config(args: &ConfigArgs, config_path: &Path, output: OutputMode) -> Result<()> {
    match &args.command {
        ConfigCommand::Show(show) => run_show(show, config_path, output),
    }
}

fn run_show(args: &ShowArgs, config_path: &Path, output: OutputMode) -> Result<()> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(err) => return fail(output, err.code(), err.to_string()),
    };

    let selected = match config.select(args.profile.as_deref()) {
        Ok(selected) => selected,
        Err(err) => return fail(output, err.code(), err.to_string()),
    };

    let profiles: BTreeMap<_, _> = selected
        .into_iter()
        .map(|(name, profile)| (name.to_string(), profile.redacted()))
        .collect();
    let shown = ShownConfig {
        path: config_path,
        config: Config { profiles },
    };

    render_mode(output, &shown, write_toml, |shown, w| {
        writeln!(w, "# {}", shown.path.display())?;
        write_toml(shown, w)
    })
}

fn write_toml(shown: &ShownConfig<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    let rendered = toml::to_string_pretty(&shown.config).map_err(std::io::Error::other)?;
    write!(w, "{rendered}")
}
