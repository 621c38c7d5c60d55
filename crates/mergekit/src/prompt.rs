//! Operator interaction traits.
//!
//! The merge engine never talks to a terminal. Callers pass an
//! implementation of these traits; the command line wires in dialoguer,
//! tests and batch runs use the fixed-answer implementations below.

use crate::error::{Error, Result};

/// Validator used by [`QuestionCallback::ask_and_validate`].
///
/// Returns the accepted (possibly normalized) answer, or a message shown
/// to the operator before asking again.
pub type Validator<'a> = &'a dyn Fn(&str) -> std::result::Result<String, String>;

/// Yes/no confirmation.
pub trait ConfirmCallback {
    /// Ask the operator to confirm `prompt`; `default` is the answer on
    /// empty input.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Free-form question with validation.
pub trait QuestionCallback {
    /// Ask until `validator` accepts the answer, at most `attempts` times.
    fn ask_and_validate(
        &mut self,
        prompt: &str,
        validator: Validator<'_>,
        attempts: usize,
        default: &str,
    ) -> Result<String>;
}

/// Always answers yes.
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str, _default: bool) -> Result<bool> {
        Ok(true)
    }
}

/// Always answers no.
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str, _default: bool) -> Result<bool> {
        Ok(false)
    }
}

/// Non-interactive answers: a fixed reply to confirmations and the default
/// to questions.
#[derive(Debug, Clone, Copy)]
pub struct Unattended {
    pub answer: bool,
}

impl ConfirmCallback for Unattended {
    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
        log::debug!("{prompt} -> {}", if self.answer { "yes" } else { "no" });
        Ok(self.answer)
    }
}

impl QuestionCallback for Unattended {
    fn ask_and_validate(
        &mut self,
        prompt: &str,
        validator: Validator<'_>,
        _attempts: usize,
        default: &str,
    ) -> Result<String> {
        log::debug!("{prompt} -> {default}");
        validator(default).map_err(Error::Prompt)
    }
}
