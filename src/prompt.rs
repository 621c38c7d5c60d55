//! Terminal prompts for the merge engine's confirmation callbacks.

use dialoguer::{Confirm, Input};
use mergekit::{ConfirmCallback, QuestionCallback, Unattended, Validator};
use std::io::IsTerminal;

use crate::Context;
use crate::ui;

/// Answers the engine's questions, either on the terminal or unattended.
pub enum Prompter {
    Interactive,
    Unattended(Unattended),
}

impl Prompter {
    /// Interactive unless `--no-interaction` was given or stdin is not a
    /// terminal, so a piped run never blocks on input.
    pub fn from_context(ctx: &Context) -> Self {
        if ctx.no_interaction || !std::io::stdin().is_terminal() {
            log::debug!(
                "Running unattended, confirmations answer {}",
                if ctx.assume_no { "no" } else { "yes" }
            );
            Self::Unattended(Unattended {
                answer: !ctx.assume_no,
            })
        } else {
            Self::Interactive
        }
    }
}

impl ConfirmCallback for Prompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> mergekit::Result<bool> {
        match self {
            Self::Interactive => Confirm::new()
                .with_prompt(prompt)
                .default(default)
                .interact()
                .map_err(prompt_error),
            Self::Unattended(unattended) => unattended.confirm(prompt, default),
        }
    }
}

impl QuestionCallback for Prompter {
    fn ask_and_validate(
        &mut self,
        prompt: &str,
        validator: Validator<'_>,
        attempts: usize,
        default: &str,
    ) -> mergekit::Result<String> {
        match self {
            Self::Interactive => ask_interactive(prompt, validator, attempts, default),
            Self::Unattended(unattended) => {
                unattended.ask_and_validate(prompt, validator, attempts, default)
            }
        }
    }
}

fn ask_interactive(
    prompt: &str,
    validator: Validator<'_>,
    attempts: usize,
    default: &str,
) -> mergekit::Result<String> {
    let attempts = attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()
            .map_err(prompt_error)?;

        match validator(answer.trim()) {
            Ok(accepted) => return Ok(accepted),
            Err(message) => {
                ui::error(&message);
                log::debug!("Answer rejected ({attempt}/{attempts})");
                last_error = message;
            }
        }
    }

    Err(mergekit::Error::Prompt(last_error))
}

fn prompt_error(e: dialoguer::Error) -> mergekit::Error {
    mergekit::Error::Prompt(format!("Failed to read answer: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ctx(assume_no: bool) -> Context {
        Context {
            verbose: 0,
            quiet: true,
            no_interaction: true,
            assume_no,
            settings: PathBuf::from("composer.json"),
        }
    }

    #[test]
    fn test_unattended_answers_follow_assume_no() {
        let mut prompter = Prompter::from_context(&ctx(true));
        assert!(!prompter.confirm("Continue?", true).unwrap());

        let mut prompter = Prompter::from_context(&ctx(false));
        assert!(prompter.confirm("Continue?", false).unwrap());
    }
}
