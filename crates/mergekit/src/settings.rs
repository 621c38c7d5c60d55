//! Operating settings.
//!
//! Everything the engine is told to do lives under one namespace key of the
//! host's settings document:
//!
//! ```json
//! {
//!     "composer-utilities": {
//!         "sync": {
//!             "ignore": {
//!                 "nodes": ["[require][acme/lib]", "[repositories]"],
//!                 "presence": "exists"
//!             }
//!         },
//!         "parameters-update": {
//!             "dist-file": "app/config/parameters.yml.dist",
//!             "file": "app/config/parameters.yml",
//!             "parameters": ["database_driver", "cross_app_urls"]
//!         }
//!     }
//! }
//! ```
//!
//! Missing entries are normal and resolve to empty lists or defaults.

use serde_json::Value;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::path::{self, Path};
use crate::sync::Presence;

/// Top-level key of the settings namespace.
pub const NAMESPACE: &str = "composer-utilities";

/// Default source for a full synchronize.
pub const DEFAULT_SYNC_SOURCE: &str = "dev.json";
/// Default target for a full synchronize.
pub const DEFAULT_SYNC_TARGET: &str = "composer.json";
/// Default source for a parameters update.
pub const DEFAULT_PARAMETERS_SOURCE: &str = "app/config/parameters.yml.dist";
/// Default target for a parameters update.
pub const DEFAULT_PARAMETERS_TARGET: &str = "app/config/parameters.yml";

const PATH_IGNORE_NODES: &str = "[sync][ignore][nodes]";
const PATH_IGNORE_PRESENCE: &str = "[sync][ignore][presence]";
const PATH_UPDATE_PARAMETERS: &str = "[parameters-update][parameters]";
const PATH_PARAMETERS_DIST_FILE: &str = "[parameters-update][dist-file]";
const PATH_PARAMETERS_FILE: &str = "[parameters-update][file]";

/// Resolved operating settings for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Paths whose target values survive a synchronize
    pub ignore_nodes: Vec<Path>,
    /// How ignore-node presence is decided
    pub presence: Presence,
    /// Parameter keys eligible for update
    pub update_parameters: Vec<String>,
    /// Override for the parameters source file
    pub parameters_dist_file: Option<PathBuf>,
    /// Override for the parameters target file
    pub parameters_file: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from the host configuration document.
    pub fn resolve(config: &Value) -> Result<Self> {
        let Some(namespace) = config.get(NAMESPACE) else {
            log::debug!("No {NAMESPACE} settings found, using defaults");
            return Ok(Self::default());
        };
        if namespace.is_null() {
            return Ok(Self::default());
        }
        if !namespace.is_object() {
            return Err(Error::settings(
                &format!("[{NAMESPACE}]"),
                "expected a mapping",
            ));
        }

        let ignore_nodes = string_list(namespace, PATH_IGNORE_NODES)?
            .into_iter()
            .filter_map(|text| match Path::parse(&text) {
                Ok(node) => Some(node),
                Err(e) => {
                    log::warn!("Skipping ignore node {text:?}: {e}");
                    None
                }
            })
            .collect();

        let presence = match string(namespace, PATH_IGNORE_PRESENCE)? {
            None => Presence::default(),
            Some(text) => Presence::from_setting(&text).ok_or_else(|| {
                Error::settings(
                    PATH_IGNORE_PRESENCE,
                    format!("expected \"exists\" or \"truthy\", found {text:?}"),
                )
            })?,
        };

        Ok(Self {
            ignore_nodes,
            presence,
            update_parameters: string_list(namespace, PATH_UPDATE_PARAMETERS)?,
            parameters_dist_file: string(namespace, PATH_PARAMETERS_DIST_FILE)?.map(PathBuf::from),
            parameters_file: string(namespace, PATH_PARAMETERS_FILE)?.map(PathBuf::from),
        })
    }

    /// Source and target of a parameters update, with defaults applied.
    pub fn parameter_files(&self) -> (PathBuf, PathBuf) {
        (
            self.parameters_dist_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PARAMETERS_SOURCE)),
            self.parameters_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PARAMETERS_TARGET)),
        )
    }
}

fn lookup<'a>(namespace: &'a Value, location: &str) -> Option<&'a Value> {
    let p = Path::parse(location).ok()?;
    path::get(namespace, &p).ok().filter(|v| !v.is_null())
}

fn string(namespace: &Value, location: &str) -> Result<Option<String>> {
    match lookup(namespace, location) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::settings(
            location,
            format!("expected a string, found {}", path::kind(other)),
        )),
    }
}

fn string_list(namespace: &Value, location: &str) -> Result<Vec<String>> {
    let items = match lookup(namespace, location) {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::settings(
                location,
                format!("expected a sequence, found {}", path::kind(other)),
            ));
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::settings(
                location,
                format!("expected strings, found {}", path::kind(other)),
            )),
        })
        .collect()
}
