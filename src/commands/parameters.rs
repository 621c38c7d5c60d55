//! Parameters command - copy selected parameters from the distribution file
//! into the local parameters file, one confirmation per change.

use anyhow::{Context, Result};
use colored::Colorize;
use mergekit::{
    ConfirmCallback, DocumentFile, PlannedUpdate, Role, Settings, format, plan_update, validate,
};
use std::path::{Path, PathBuf};

use crate::Context as AppContext;
use crate::cli::ParametersArgs;
use crate::config;
use crate::prompt::Prompter;
use crate::ui;

pub fn run(ctx: &AppContext, args: ParametersArgs) -> Result<()> {
    let settings = config::load_settings(&ctx.settings)?;
    let (source, target) = files(&settings, args.source, args.target);
    let mut prompter = Prompter::from_context(ctx);
    update(ctx, &settings, &source, &target, args.dry_run, &mut prompter)
}

/// Source and target paths: explicit arguments win over settings.
pub fn files(
    settings: &Settings,
    source: Option<PathBuf>,
    target: Option<PathBuf>,
) -> (PathBuf, PathBuf) {
    let (default_source, default_target) = settings.parameter_files();
    (
        source.unwrap_or(default_source),
        target.unwrap_or(default_target),
    )
}

/// Plan the configured parameter updates, confirm each one and write the
/// target when at least one was accepted.
pub fn update(
    ctx: &AppContext,
    settings: &Settings,
    source: &Path,
    target: &Path,
    dry_run: bool,
    confirm: &mut dyn ConfirmCallback,
) -> Result<()> {
    let source_file = DocumentFile::load(source)
        .with_context(|| format!("Could not load source {}", source.display()))?;
    let target_file = DocumentFile::load(target)
        .with_context(|| format!("Could not load target {}", target.display()))?;

    validate(&source_file.value, Role::Source, source)?;
    validate(&target_file.value, Role::Target, target)?;

    if settings.update_parameters.is_empty() {
        ui::warn("No parameters configured for update. See docsync parameters --help");
    }

    let plan = plan_update(
        &source_file.value,
        &target_file.value,
        &settings.update_parameters,
    );

    if !ctx.quiet {
        ui::header("Update parameters");
        ui::kv("Source", &source.display().to_string());
        ui::kv("Target", &target.display().to_string());
        println!();
    }

    for entry in &plan.entries {
        match entry {
            PlannedUpdate::MissingInSource(key) => {
                ui::warn(&format!("Parameter {key} does not exist in source."));
            }
            PlannedUpdate::MissingInTarget(key) => {
                ui::warn(&format!("Parameter {key} does not exist in target."));
            }
            PlannedUpdate::Change { key, from, to } if !ctx.quiet => {
                let marker = if entry.is_effective() {
                    "~".yellow()
                } else {
                    "=".dimmed()
                };
                println!("  {marker} {key}: {from} {} {to}", "→".dimmed());
            }
            PlannedUpdate::Change { .. } => {}
        }
    }

    if plan.is_empty() && !ctx.quiet {
        ui::dim("No parameter changes to confirm.");
    }

    let mut updated = target_file.value.clone();
    let outcome = mergekit::apply_with_confirmation(&plan, &mut updated, confirm)?;
    log::debug!(
        "{} of {} parameter(s) applied",
        outcome.applied.len(),
        outcome.total()
    );

    if dry_run {
        let content = format::to_string(&updated, target_file.format)?;
        println!("{}", "Would write:".yellow());
        ui::document(&content);
        println!("{}", "Dry run - no changes made.".dimmed());
        return Ok(());
    }

    if outcome.applied.is_empty() {
        ui::info("No parameters updated.");
        return Ok(());
    }

    target_file
        .save(&updated)
        .with_context(|| format!("Could not write target {}", target.display()))?;

    ui::success(&format!(
        "Successfully updated {} parameter(s) from {} to {}",
        outcome.applied.len(),
        source.display(),
        target.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergekit::{AutoConfirm, AutoDecline};
    use std::fs;
    use tempfile::TempDir;

    fn ctx() -> AppContext {
        AppContext {
            verbose: 0,
            quiet: true,
            no_interaction: true,
            assume_no: false,
            settings: PathBuf::from("composer.json"),
        }
    }

    fn settings(keys: &[&str]) -> Settings {
        Settings {
            update_parameters: keys.iter().map(|k| (*k).to_string()).collect(),
            ..Settings::default()
        }
    }

    fn fixtures(temp: &TempDir) -> (PathBuf, PathBuf) {
        let source = temp.path().join("parameters.yml.dist");
        let target = temp.path().join("parameters.yml");
        fs::write(
            &source,
            "parameters:\n  database_host: db.internal\n  mailer: smtp\n",
        )
        .unwrap();
        fs::write(
            &target,
            "parameters:\n  database_host: localhost\n  secret: s3cr3t\n",
        )
        .unwrap();
        (source, target)
    }

    #[test]
    fn test_files_prefer_arguments() {
        let settings = Settings {
            parameters_file: Some(PathBuf::from("local.yml")),
            ..Settings::default()
        };
        let (source, target) = files(&settings, Some(PathBuf::from("a.yml")), None);
        assert_eq!(source, PathBuf::from("a.yml"));
        assert_eq!(target, PathBuf::from("local.yml"));
    }

    #[test]
    fn test_update_writes_confirmed_parameters() {
        let temp = TempDir::new().unwrap();
        let (source, target) = fixtures(&temp);

        update(
            &ctx(),
            &settings(&["database_host", "mailer"]),
            &source,
            &target,
            false,
            &mut AutoConfirm,
        )
        .unwrap();

        let written = DocumentFile::load(&target).unwrap().value;
        assert_eq!(written["parameters"]["database_host"], "db.internal");
        assert_eq!(written["parameters"]["secret"], "s3cr3t");
        assert!(written["parameters"].get("mailer").is_none());
    }

    #[test]
    fn test_declined_update_leaves_file_untouched() {
        let temp = TempDir::new().unwrap();
        let (source, target) = fixtures(&temp);
        let before = fs::read_to_string(&target).unwrap();

        update(
            &ctx(),
            &settings(&["database_host"]),
            &source,
            &target,
            false,
            &mut AutoDecline,
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), before);
    }

    #[test]
    fn test_empty_update_set_still_validates_target() {
        let temp = TempDir::new().unwrap();
        let (source, target) = fixtures(&temp);
        fs::write(&target, "other: 1\n").unwrap();

        let err = update(&ctx(), &settings(&[]), &source, &target, false, &mut AutoConfirm)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<mergekit::Error>(),
            Some(mergekit::Error::Structural {
                role: Role::Target,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_update_set_still_requires_source() {
        let temp = TempDir::new().unwrap();
        let (_, target) = fixtures(&temp);

        let err = update(
            &ctx(),
            &settings(&[]),
            &temp.path().join("missing.yml.dist"),
            &target,
            false,
            &mut AutoConfirm,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<mergekit::Error>(),
            Some(mergekit::Error::NotFound(_))
        ));
    }

    #[test]
    fn test_dry_run_without_changes_leaves_file_untouched() {
        let temp = TempDir::new().unwrap();
        let (source, target) = fixtures(&temp);
        let before = fs::read_to_string(&target).unwrap();

        update(
            &ctx(),
            &settings(&["database_host"]),
            &source,
            &target,
            true,
            &mut AutoDecline,
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), before);
    }

    #[test]
    fn test_missing_parameters_key_is_structural() {
        let temp = TempDir::new().unwrap();
        let (source, target) = fixtures(&temp);
        fs::write(&target, "other: 1\n").unwrap();

        let err = update(
            &ctx(),
            &settings(&["database_host"]),
            &source,
            &target,
            false,
            &mut AutoConfirm,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<mergekit::Error>(),
            Some(mergekit::Error::Structural {
                role: Role::Target,
                ..
            })
        ));
    }
}
