//! Hook command - interactive flows for the package manager's post-install
//! and post-update events.

use anyhow::Result;
use mergekit::{ConfirmCallback, DocumentFile, QuestionCallback, Settings};
use std::path::{Path, PathBuf};

use crate::Context as AppContext;
use crate::cli::HookCommand;
use crate::commands::{parameters, sync};
use crate::config;
use crate::prompt::Prompter;
use crate::ui;

/// Attempts allowed for each file question.
const ATTEMPTS: usize = 3;

pub fn run(ctx: &AppContext, cmd: HookCommand) -> Result<()> {
    let settings = config::load_settings(&ctx.settings)?;
    let mut prompter = Prompter::from_context(ctx);

    match cmd {
        HookCommand::Sync { no_dev } => sync_files(ctx, &settings, no_dev, &mut prompter),
        HookCommand::Parameters => update_parameters(ctx, &settings, &mut prompter),
    }
}

/// Ask for the source and target files, then synchronize them.
pub fn sync_files<P>(
    ctx: &AppContext,
    settings: &Settings,
    no_dev: bool,
    prompter: &mut P,
) -> Result<()>
where
    P: ConfirmCallback + QuestionCallback,
{
    if no_dev {
        ui::info("You are not running in dev mode. Skipping composer.json sync.");
        return Ok(());
    }

    if ctx.settings.file_name().is_some_and(|name| name == "composer.json") {
        ui::warn("You are using the default composer.json file. Synchronize manually in case you need it.");
        ui::dim("See docsync sync --help for more.");
    }

    if !prompter.confirm("Do you want to synchronize your composer.json file?", true)? {
        log::debug!("Synchronization declined");
        return Ok(());
    }

    let source = prompter.ask_and_validate(
        "What is the source composer file?",
        &validate_document,
        ATTEMPTS,
        &ctx.settings.display().to_string(),
    )?;
    let default_target = default_target(Path::new(&source));
    let target = prompter.ask_and_validate(
        "What is the target composer file?",
        &validate_document,
        ATTEMPTS,
        &default_target.display().to_string(),
    )?;

    sync::synchronize(ctx, settings, Path::new(&source), Path::new(&target), false)
}

/// Confirm, then update the configured parameters.
pub fn update_parameters<P>(ctx: &AppContext, settings: &Settings, prompter: &mut P) -> Result<()>
where
    P: ConfirmCallback,
{
    let (source, target) = parameters::files(settings, None, None);

    let question = format!(
        "Do you want to update configured parameters from {} to {} file?",
        source.display(),
        target.display()
    );
    if !prompter.confirm(&question, true)? {
        log::debug!("Parameter update declined");
        return Ok(());
    }

    parameters::update(ctx, settings, &source, &target, false, prompter)
}

/// `composer.json` next to the source file.
fn default_target(source: &Path) -> PathBuf {
    source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(mergekit::settings::DEFAULT_SYNC_TARGET)
}

/// Accept a path to an existing, parsable document.
fn validate_document(answer: &str) -> std::result::Result<String, String> {
    let path = Path::new(answer);
    if !path.exists() {
        return Err(format!("File {answer} does not exist."));
    }
    DocumentFile::load(path)
        .map(|_| answer.to_string())
        .map_err(|e| format!("File {answer} is not a valid document: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergekit::{Unattended, Validator};
    use std::fs;
    use tempfile::TempDir;

    fn ctx(settings: PathBuf) -> AppContext {
        AppContext {
            verbose: 0,
            quiet: true,
            no_interaction: true,
            assume_no: false,
            settings,
        }
    }

    /// Confirms everything and answers questions from a queue.
    struct Scripted {
        answers: Vec<String>,
    }

    impl ConfirmCallback for Scripted {
        fn confirm(&mut self, _prompt: &str, _default: bool) -> mergekit::Result<bool> {
            Ok(true)
        }
    }

    impl QuestionCallback for Scripted {
        fn ask_and_validate(
            &mut self,
            _prompt: &str,
            validator: Validator<'_>,
            _attempts: usize,
            _default: &str,
        ) -> mergekit::Result<String> {
            let answer = self.answers.remove(0);
            validator(answer.as_str()).map_err(mergekit::Error::Prompt)
        }
    }

    #[test]
    fn test_default_target_is_sibling_composer_json() {
        assert_eq!(
            default_target(Path::new("project/dev.json")),
            PathBuf::from("project/composer.json")
        );
        assert_eq!(
            default_target(Path::new("dev.json")),
            PathBuf::from("composer.json")
        );
    }

    #[test]
    fn test_validate_document() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("dev.json");
        let bad = temp.path().join("broken.json");
        fs::write(&good, "{}").unwrap();
        fs::write(&bad, "{").unwrap();

        assert!(validate_document(good.to_str().unwrap()).is_ok());
        assert!(validate_document(bad.to_str().unwrap()).unwrap_err().contains("not a valid"));
        assert!(
            validate_document(temp.path().join("nope.json").to_str().unwrap())
                .unwrap_err()
                .contains("does not exist")
        );
    }

    #[test]
    fn test_sync_files_skips_without_dev() {
        let temp = TempDir::new().unwrap();
        let mut prompter = Scripted { answers: vec![] };
        sync_files(
            &ctx(temp.path().join("dev.json")),
            &Settings::default(),
            true,
            &mut prompter,
        )
        .unwrap();
    }

    #[test]
    fn test_sync_files_uses_answers() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("dev.json");
        let target = temp.path().join("composer.json");
        fs::write(&source, r#"{"name": "acme/app"}"#).unwrap();
        fs::write(&target, r#"{"name": "old"}"#).unwrap();

        let mut prompter = Scripted {
            answers: vec![
                source.display().to_string(),
                target.display().to_string(),
            ],
        };
        sync_files(&ctx(source.clone()), &Settings::default(), false, &mut prompter).unwrap();

        let written = DocumentFile::load(&target).unwrap().value;
        assert_eq!(written["name"], "acme/app");
    }

    #[test]
    fn test_unattended_sync_defaults_to_sibling_target() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("dev.json");
        let target = temp.path().join("composer.json");
        fs::write(&source, r#"{"name": "acme/app"}"#).unwrap();
        fs::write(&target, r#"{"name": "old"}"#).unwrap();

        let mut prompter = Unattended { answer: true };
        sync_files(&ctx(source), &Settings::default(), false, &mut prompter).unwrap();

        let written = DocumentFile::load(&target).unwrap().value;
        assert_eq!(written["name"], "acme/app");
    }

    #[test]
    fn test_declined_parameter_update_does_nothing() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            update_parameters: vec!["a".to_string()],
            parameters_dist_file: Some(temp.path().join("missing.yml.dist")),
            parameters_file: Some(temp.path().join("missing.yml")),
            ..Settings::default()
        };

        let mut prompter = Unattended { answer: false };
        update_parameters(&ctx(temp.path().join("composer.json")), &settings, &mut prompter)
            .unwrap();
    }
}
