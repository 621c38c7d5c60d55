//! Sync command - rebuild the target document from the source, keeping the
//! configured ignore nodes from the target.

use anyhow::{Context, Result};
use colored::Colorize;
use mergekit::{DocumentFile, Settings, SyncOptions, format};
use std::fs;
use std::path::Path;

use crate::Context as AppContext;
use crate::cli::SyncArgs;
use crate::config;
use crate::ui;

pub fn run(ctx: &AppContext, args: SyncArgs) -> Result<()> {
    let settings = config::load_settings(&ctx.settings)?;
    synchronize(ctx, &settings, &args.source, &args.target, args.dry_run)
}

/// Merge `source` over `target` and write the result to `target`.
///
/// With `dry_run` the merged document is printed instead, and with `-v` the
/// lines that would change are shown as well.
pub fn synchronize(
    ctx: &AppContext,
    settings: &Settings,
    source: &Path,
    target: &Path,
    dry_run: bool,
) -> Result<()> {
    let source_file = DocumentFile::load(source)
        .with_context(|| format!("Could not load source {}", source.display()))?;
    let target_file = DocumentFile::load(target)
        .with_context(|| format!("Could not load target {}", target.display()))?;

    let options = SyncOptions {
        presence: settings.presence,
    };
    let (merged, report) = mergekit::synchronize(
        &source_file.value,
        &target_file.value,
        &settings.ignore_nodes,
        &options,
    );

    if !ctx.quiet {
        ui::header("Synchronize");
        ui::kv("Source", &source.display().to_string());
        ui::kv("Target", &target.display().to_string());
        ui::kv(
            "Ignore nodes",
            &format!(
                "{} preserved, {} absent, {} skipped",
                report.preserved(),
                report.absent(),
                report.skipped()
            ),
        );
        if ctx.verbose > 0 {
            for (node, outcome) in &report.nodes {
                ui::dim(&format!("{node}: {outcome:?}"));
            }
        }
        println!();
    }

    if dry_run {
        let content = format::to_string(&merged, target_file.format)?;
        println!("{}", "Would write:".yellow());
        ui::document(&content);
        if ctx.verbose > 0 {
            let current = fs::read_to_string(target).unwrap_or_default();
            ui::diff(&current, &content);
        }
        println!("{}", "Dry run - no changes made.".dimmed());
        return Ok(());
    }

    target_file
        .save(&merged)
        .with_context(|| format!("Could not write target {}", target.display()))?;

    ui::success(&format!(
        "Successfully synchronized from source {} to target {}",
        source.display(),
        target.display()
    ));

    Ok(())
}
