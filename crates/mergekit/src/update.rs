//! Selective parameter update.
//!
//! Planning is pure: [`plan_update`] compares the `parameters` mappings of
//! two documents and lists what would change. Applying goes through a
//! [`ConfirmCallback`] so the operator can accept or decline each change.

use log::debug;
use serde_json::Value;
use std::fmt;
use std::path::Path as FsPath;

use crate::error::{Error, Result};
use crate::path::{self, Path};
use crate::prompt::ConfirmCallback;

/// Top-level key holding the parameters.
pub const PARAMETERS: &str = "parameters";

/// Which side of a merge a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Target,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => f.write_str("source"),
            Role::Target => f.write_str("target"),
        }
    }
}

/// One entry of an update plan.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedUpdate {
    /// Key is not in the source parameters
    MissingInSource(String),
    /// Key is not in the target parameters
    MissingInTarget(String),
    /// Key exists on both sides; `to` replaces `from` if confirmed
    Change { key: String, from: Value, to: Value },
}

impl PlannedUpdate {
    pub fn key(&self) -> &str {
        match self {
            Self::MissingInSource(key) | Self::MissingInTarget(key) => key,
            Self::Change { key, .. } => key,
        }
    }

    /// Whether applying this entry would alter the target.
    pub fn is_effective(&self) -> bool {
        matches!(self, Self::Change { from, to, .. } if from != to)
    }
}

/// Ordered list of planned updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePlan {
    pub entries: Vec<PlannedUpdate>,
}

impl UpdatePlan {
    pub fn changes(&self) -> impl Iterator<Item = &PlannedUpdate> {
        self.entries
            .iter()
            .filter(|e| matches!(e, PlannedUpdate::Change { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.changes().next().is_none()
    }
}

/// Counts from applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub applied: Vec<String>,
    pub declined: Vec<String>,
    pub missing: Vec<String>,
}

impl UpdateOutcome {
    pub fn total(&self) -> usize {
        self.applied.len() + self.declined.len() + self.missing.len()
    }
}

/// Check that `document` has a top-level `parameters` mapping.
pub fn validate(document: &Value, role: Role, file: &FsPath) -> Result<()> {
    match document.get(PARAMETERS) {
        Some(Value::Object(_)) => Ok(()),
        _ => Err(Error::Structural {
            role,
            key: PARAMETERS.to_string(),
            file: file.to_path_buf(),
        }),
    }
}

/// Compare the parameters of `source` and `target` for each key.
///
/// A key is present when it exists in the mapping, whatever its value.
pub fn plan_update(source: &Value, target: &Value, keys: &[String]) -> UpdatePlan {
    let source_params = source.get(PARAMETERS).and_then(Value::as_object);
    let target_params = target.get(PARAMETERS).and_then(Value::as_object);

    let entries = keys
        .iter()
        .map(|key| {
            let Some(to) = source_params.and_then(|p| p.get(key)) else {
                return PlannedUpdate::MissingInSource(key.clone());
            };
            let Some(from) = target_params.and_then(|p| p.get(key)) else {
                return PlannedUpdate::MissingInTarget(key.clone());
            };
            PlannedUpdate::Change {
                key: key.clone(),
                from: from.clone(),
                to: to.clone(),
            }
        })
        .collect();

    UpdatePlan { entries }
}

/// Apply `plan` to `target`, asking `confirm` for each change.
pub fn apply_with_confirmation(
    plan: &UpdatePlan,
    target: &mut Value,
    confirm: &mut dyn ConfirmCallback,
) -> Result<UpdateOutcome> {
    let mut outcome = UpdateOutcome::default();

    for entry in &plan.entries {
        match entry {
            PlannedUpdate::MissingInSource(key) => {
                debug!("Parameter {key} does not exist in source.");
                outcome.missing.push(key.clone());
            }
            PlannedUpdate::MissingInTarget(key) => {
                debug!("Parameter {key} does not exist in target.");
                outcome.missing.push(key.clone());
            }
            PlannedUpdate::Change { key, to, .. } => {
                let prompt = format!("Do you want to update parameter {key}?");
                if !confirm.confirm(&prompt, true)? {
                    debug!("Declined update of {key}");
                    outcome.declined.push(key.clone());
                    continue;
                }

                let path = Path::key(PARAMETERS).child(key.as_str());
                path::set(target, &path, to.clone())?;
                outcome.applied.push(key.clone());
            }
        }
    }

    Ok(outcome)
}

/// Validate both documents, plan, and apply in one step.
pub fn update_parameters(
    source: &Value,
    source_file: &FsPath,
    target: &mut Value,
    target_file: &FsPath,
    keys: &[String],
    confirm: &mut dyn ConfirmCallback,
) -> Result<UpdateOutcome> {
    validate(source, Role::Source, source_file)?;
    validate(target, Role::Target, target_file)?;
    let plan = plan_update(source, target, keys);
    apply_with_confirmation(&plan, target, confirm)
}
