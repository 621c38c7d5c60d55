//! Full-document synchronize.
//!
//! Copies a source document forward, keeping the values found at a list of
//! ignore paths from the target, then re-sorts the two dependency maps.

use log::{debug, warn};
use serde_json::Value;

use crate::order;
use crate::path::{self, Path};

/// Key of the runtime dependency map.
pub const REQUIRE: &str = "require";

/// Key of the development dependency map.
pub const REQUIRE_DEV: &str = "require-dev";

/// How to decide whether a value read from the target counts as present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Presence {
    /// Any readable value is present, including `false`, `0`, `""` and `null`
    #[default]
    Exists,
    /// Only truthy values are present (legacy behaviour)
    Truthy,
}

impl Presence {
    /// Parse a setting value.
    pub fn from_setting(value: &str) -> Option<Self> {
        match value {
            "exists" => Some(Self::Exists),
            "truthy" => Some(Self::Truthy),
            _ => None,
        }
    }

    /// Whether `value` counts as present under this policy.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Exists => true,
            Self::Truthy => is_truthy(value),
        }
    }
}

/// Options for [`synchronize`].
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub presence: Presence,
}

/// What happened to a single ignore path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    /// Value copied from the target
    Preserved,
    /// Nothing (present) at this path in the target; source value kept
    Absent,
    /// Value found but could not be written into the result
    Skipped { reason: String },
}

/// Per-path outcomes of a synchronize pass, in ignore-list order.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub nodes: Vec<(Path, NodeOutcome)>,
}

impl SyncReport {
    pub fn preserved(&self) -> usize {
        self.count(|o| matches!(o, NodeOutcome::Preserved))
    }

    pub fn absent(&self) -> usize {
        self.count(|o| matches!(o, NodeOutcome::Absent))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, NodeOutcome::Skipped { .. }))
    }

    fn count(&self, predicate: impl Fn(&NodeOutcome) -> bool) -> usize {
        self.nodes.iter().filter(|(_, o)| predicate(o)).count()
    }
}

/// Synchronize `source` over `target`.
///
/// Everything comes from `source` except the values at `ignore` paths,
/// which come from `target` when present there. `require` and
/// `require-dev` are re-sorted with [`order::order`].
pub fn synchronize(
    source: &Value,
    target: &Value,
    ignore: &[Path],
    options: &SyncOptions,
) -> (Value, SyncReport) {
    let mut result = source.clone();
    let mut report = SyncReport::default();

    for node in ignore {
        let outcome = match path::get(target, node) {
            Ok(value) if options.presence.accepts(value) => {
                match path::set(&mut result, node, value.clone()) {
                    Ok(()) => {
                        debug!("Preserved {node} from target");
                        NodeOutcome::Preserved
                    }
                    Err(e) => {
                        warn!("Skipping ignore node {node}: {e}");
                        NodeOutcome::Skipped {
                            reason: e.to_string(),
                        }
                    }
                }
            }
            Ok(_) => {
                debug!("Ignore node {node} is empty in target, keeping source value");
                NodeOutcome::Absent
            }
            Err(e) => {
                debug!("Ignore node {node} not in target: {e}");
                NodeOutcome::Absent
            }
        };
        report.nodes.push((node.clone(), outcome));
    }

    sort_dependencies(&mut result, REQUIRE);
    sort_dependencies(&mut result, REQUIRE_DEV);

    (result, report)
}

fn sort_dependencies(doc: &mut Value, key: &str) {
    if let Some(Value::Object(packages)) = doc.get_mut(key) {
        debug!("Sorting {} entries in {key}", packages.len());
        *packages = order::order(std::mem::take(packages));
    }
}

/// Truthiness as the original host language defines it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
