//! `github2omnifocus sync`: mirror GitHub into OmniFocus.

use anyhow::Result;
use chrono::Local;
use clap::Args;
use g2o_core::config::{ProfileConfig, load_config};
use g2o_core::error::ErrorCode;
use g2o_core::model::Category;
use g2o_core::reconcile::OperationKind;
use g2o_core::sync::{SyncReport, Synchronizer};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use super::fail;
use crate::github::GitHubClient;
use crate::omnifocus::Gateway;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Only sync this profile (default: every profile in the config).
    #[arg(long, short)]
    pub profile: Option<String>,

    /// Only sync these categories (default: the profile's `categories`).
    /// Repeatable.
    #[arg(long = "category", short, value_name = "CATEGORY")]
    pub categories: Vec<Category>,

    /// Report what would change without touching OmniFocus.
    #[arg(long)]
    pub dry_run: bool,
}

/// Result of one profile's run.
#[derive(Debug, Serialize)]
pub struct ProfileReport {
    pub profile: String,
    #[serde(flatten)]
    pub report: SyncReport,
}

#[derive(Debug, Default, Serialize)]
pub struct SyncOutput {
    pub profiles: Vec<ProfileReport>,
}

pub fn run_sync(args: &SyncArgs, config_path: &Path, output: OutputMode) -> Result<()> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(err) => return fail(output, err.code(), err.to_string()),
    };
    let profiles = match config.select(args.profile.as_deref()) {
        Ok(profiles) => profiles,
        Err(err) => return fail(output, err.code(), err.to_string()),
    };

    let now = Local::now();
    let mut result = SyncOutput::default();

    for (name, profile) in profiles {
        let Some(token) = profile.token() else {
            return fail(
                output,
                ErrorCode::MissingToken,
                format!("profile `{name}` has no GitHub access token"),
            );
        };
        let categories = categories_for(args, profile);
        info!(profile = name, dry_run = args.dry_run, ?categories, "syncing profile");

        let client = GitHubClient::new(&profile.api_url, token);
        let outcome = Synchronizer::new(profile, &client, Gateway::osascript())
            .dry_run(args.dry_run)
            .run(&categories, &now);
        debug!(profile = name, requests = client.request_count(), "GitHub requests made");

        match outcome {
            Ok(report) => result.profiles.push(ProfileReport {
                profile: name.to_string(),
                report,
            }),
            Err(err) => {
                let code = err.code();
                let err = anyhow::Error::new(err);
                return fail(output, code, format!("profile `{name}`: {err:#}"));
            }
        }
    }

    render_mode(output, &result, write_text, write_pretty)
}

fn categories_for(args: &SyncArgs, profile: &ProfileConfig) -> Vec<Category> {
    if args.categories.is_empty() {
        profile.categories.clone()
    } else {
        args.categories.clone()
    }
}

fn write_text(result: &SyncOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for profile in &result.profiles {
        for category in &profile.report.categories {
            for change in &category.changes {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}",
                    profile.profile, category.category, change.op, change.key, change.name
                )?;
            }
        }
    }
    Ok(())
}

fn write_pretty(result: &SyncOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for profile in &result.profiles {
        let heading = if profile.report.dry_run {
            format!("Profile {} (dry run)", profile.profile)
        } else {
            format!("Profile {}", profile.profile)
        };
        pretty_section(w, &heading)?;

        for category in &profile.report.categories {
            pretty_kv(
                w,
                category.category.label(),
                format!(
                    "{} on GitHub, {} in OmniFocus, +{} -{}",
                    category.desired,
                    category.current,
                    category.count(OperationKind::Add),
                    category.count(OperationKind::Remove)
                ),
            )?;
            for change in &category.changes {
                let marker = match change.op {
                    OperationKind::Add => '+',
                    OperationKind::Remove => '-',
                };
                writeln!(w, "    {marker} {}", change.name)?;
            }
        }
        writeln!(w)?;
    }
    Ok(())
}
