//! # mergekit
//!
//! Path-addressed merge engine for JSON and YAML configuration documents.
//!
//! This crate provides functionality for:
//! - Reading, writing and testing values at bracketed paths (`[a][b][c]`)
//! - Ordering dependency maps the way the host package manager does
//! - Synchronizing a template document over a customized one while keeping
//!   selected local overrides
//! - Selectively updating parameters with per-key confirmation
//! - Resolving the engine's settings from a host configuration document
//!
//! ## Example
//!
//! ```
//! use mergekit::{Path, SyncOptions, synchronize};
//! use serde_json::json;
//!
//! let source = json!({"require": {"vendor/b": "^1", "php": ">=8.1"}, "extra": {"a": 1}});
//! let target = json!({"extra": {"a": 2}});
//! let ignore = vec![Path::parse("[extra][a]").unwrap()];
//!
//! let (result, _report) = synchronize(&source, &target, &ignore, &SyncOptions::default());
//! assert_eq!(result["extra"]["a"], 2);
//!
//! let order: Vec<_> = result["require"].as_object().unwrap().keys().collect();
//! assert_eq!(order, ["php", "vendor/b"]);
//! ```
//!
//! ## Selective Update
//!
//! Planning is separate from applying, so a plan can be shown before any
//! question is asked:
//!
//! ```
//! use mergekit::{AutoConfirm, apply_with_confirmation, plan_update};
//! use serde_json::json;
//!
//! let source = json!({"parameters": {"a": 1, "b": 2}});
//! let mut target = json!({"parameters": {"a": 0}});
//! let keys = vec!["a".to_string(), "b".to_string()];
//!
//! let plan = plan_update(&source, &target, &keys);
//! let outcome = apply_with_confirmation(&plan, &mut target, &mut AutoConfirm).unwrap();
//! assert_eq!(target["parameters"]["a"], 1);
//! assert_eq!(outcome.missing, ["b"]);
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod format;
pub mod order;
pub mod path;
pub mod prompt;
pub mod settings;
pub mod sync;
pub mod update;

pub use error::{Error, ErrorCategory, Result};
pub use format::{DocumentFile, Format};
pub use path::{Path, PathError};
pub use prompt::{AutoConfirm, AutoDecline, ConfirmCallback, QuestionCallback, Unattended, Validator};
pub use settings::Settings;
pub use sync::{NodeOutcome, Presence, SyncOptions, SyncReport, synchronize};
pub use update::{
    PlannedUpdate, Role, UpdateOutcome, UpdatePlan, apply_with_confirmation, plan_update,
    update_parameters, validate,
};
