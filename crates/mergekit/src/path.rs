//! Bracketed path expressions and the accessor that follows them.
//!
//! A path such as `[require][vendor/lib]` addresses
//! `doc["require"]["vendor/lib"]`. Segments are taken verbatim between
//! bracket pairs; inside a sequence a segment is read as a zero-based index.
//!
//! Segments cannot contain `[` or `]`. There is no escape syntax, so a key
//! holding a bracket cannot be addressed.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing or following a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path has no segments
    #[error("path must contain at least one segment")]
    Empty,

    /// Bracket syntax is broken
    #[error("malformed path {path:?} at position {position}: {reason}")]
    Malformed {
        /// The text that failed to parse
        path: String,
        /// Byte offset of the offending character
        position: usize,
        /// What went wrong
        reason: &'static str,
    },

    /// A segment could not be followed while reading
    #[error("cannot read {path} at [{segment}]: {reason}")]
    NotReadable {
        /// Full path being read
        path: String,
        /// Segment that failed
        segment: String,
        /// Why it failed
        reason: String,
    },

    /// A segment could not be followed or assigned while writing
    #[error("cannot write {path} at [{segment}]: {reason}")]
    NotWritable {
        /// Full path being written
        path: String,
        /// Segment that failed
        segment: String,
        /// Why it failed
        reason: String,
    },
}

/// A parsed, non-empty path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parse `[a][b][c]` into `["a", "b", "c"]`.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let malformed = |position, reason| PathError::Malformed {
            path: text.to_string(),
            position,
            reason,
        };

        let mut segments = Vec::new();
        let mut chars = text.char_indices();

        while let Some((open, c)) = chars.next() {
            if c != '[' {
                return Err(malformed(open, "expected '['"));
            }

            let mut close = None;
            for (i, c) in chars.by_ref() {
                match c {
                    ']' => {
                        close = Some(i);
                        break;
                    }
                    '[' => return Err(malformed(i, "unexpected '[' inside segment")),
                    _ => {}
                }
            }

            let Some(close) = close else {
                return Err(malformed(open, "unclosed '['"));
            };

            let segment = &text[open + 1..close];
            if segment.is_empty() {
                if text == "[]" {
                    return Err(PathError::Empty);
                }
                return Err(malformed(open, "empty segment"));
            }
            segments.push(segment.to_string());
        }

        if segments.is_empty() {
            return Err(PathError::Empty);
        }

        Ok(Self { segments })
    }

    /// Build a path from raw segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self { segments })
    }

    /// Single-segment path addressing a top-level key.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            segments: vec![key.into()],
        }
    }

    /// Extend this path by one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether `prefix` addresses this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "[{segment}]")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Accessor
// ============================================================================

/// Read the value at `path`.
pub fn get<'a>(doc: &'a Value, path: &Path) -> Result<&'a Value, PathError> {
    let mut current = doc;
    for segment in &path.segments {
        current = child(current, segment).map_err(|reason| PathError::NotReadable {
            path: path.to_string(),
            segment: segment.clone(),
            reason,
        })?;
    }
    Ok(current)
}

/// Whether [`get`] would succeed.
pub fn is_readable(doc: &Value, path: &Path) -> bool {
    get(doc, path).is_ok()
}

/// Write `value` at `path`.
///
/// Missing keys on the way down are created as empty mappings. Existing
/// scalars are never replaced by a mapping; they fail the write instead.
/// Assigning to an existing key keeps that key's position in the mapping.
pub fn set(doc: &mut Value, path: &Path, value: Value) -> Result<(), PathError> {
    let Some((last, parents)) = path.segments.split_last() else {
        return Err(PathError::Empty);
    };

    let not_writable = |segment: &str, reason| PathError::NotWritable {
        path: path.to_string(),
        segment: segment.to_string(),
        reason,
    };

    let mut current = doc;
    for segment in parents {
        current = child_or_create(current, segment).map_err(|r| not_writable(segment, r))?;
    }

    assign(current, last, value).map_err(|r| not_writable(last, r))
}

fn child<'a>(value: &'a Value, segment: &str) -> Result<&'a Value, String> {
    match value {
        Value::Object(map) => map
            .get(segment)
            .ok_or_else(|| "key does not exist".to_string()),
        Value::Array(items) => {
            let index = parse_index(segment)?;
            items
                .get(index)
                .ok_or_else(|| format!("index {index} out of bounds (length {})", items.len()))
        }
        other => Err(format!("{} is not a mapping or sequence", kind(other))),
    }
}

fn child_or_create<'a>(value: &'a mut Value, segment: &str) -> Result<&'a mut Value, String> {
    match value {
        Value::Object(map) => Ok(map
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let len = items.len();
            let index = parse_index(segment)?;
            items
                .get_mut(index)
                .ok_or_else(|| format!("index {index} out of bounds (length {len})"))
        }
        other => Err(format!("{} is not a mapping or sequence", kind(other))),
    }
}

fn assign(parent: &mut Value, segment: &str, value: Value) -> Result<(), String> {
    match parent {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(segment)?;
            if index < items.len() {
                items[index] = value;
                Ok(())
            } else if index == items.len() {
                items.push(value);
                Ok(())
            } else {
                Err(format!(
                    "index {index} out of bounds (length {})",
                    items.len()
                ))
            }
        }
        other => Err(format!("{} is not a mapping or sequence", kind(other))),
    }
}

fn parse_index(segment: &str) -> Result<usize, String> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{segment:?} is not a sequence index"));
    }
    segment
        .parse()
        .map_err(|_| format!("{segment:?} is not a sequence index"))
}

/// Human name of a value's variant, for messages.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(text: &str) -> Path {
        Path::parse(text).unwrap()
    }

    #[test]
    fn test_parse_segments() {
        assert_eq!(path("[a][b][c]").segments(), ["a", "b", "c"]);
        assert_eq!(path("[require][vendor/lib]").segments(), ["require", "vendor/lib"]);
        assert_eq!(path("[with space][x.y]").segments(), ["with space", "x.y"]);
    }

    #[test]
    fn test_parse_display_roundtrip() {
        let p = path("[require][vendor/lib]");
        assert_eq!(p.to_string(), "[require][vendor/lib]");
        assert_eq!("[a]".parse::<Path>().unwrap(), Path::key("a"));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Path::parse(""), Err(PathError::Empty));
        assert_eq!(Path::parse("[]"), Err(PathError::Empty));
        assert_eq!(
            Path::from_segments(Vec::<String>::new()),
            Err(PathError::Empty)
        );
    }

    #[test]
    fn test_parse_malformed() {
        for text in ["a", "[a", "[a]b", "a]", "[a][", "[a[b]]", "[a][]", " [a]"] {
            assert!(
                matches!(Path::parse(text), Err(PathError::Malformed { .. })),
                "{text} should be malformed"
            );
        }
    }

    #[test]
    fn test_malformed_reports_position() {
        let err = Path::parse("[a]x").unwrap_err();
        assert_eq!(
            err,
            PathError::Malformed {
                path: "[a]x".to_string(),
                position: 3,
                reason: "expected '['",
            }
        );
    }

    #[test]
    fn test_get_nested() {
        let doc = json!({"require": {"vendor/lib": "^1.0"}, "list": [10, {"x": true}]});
        assert_eq!(get(&doc, &path("[require][vendor/lib]")).unwrap(), "^1.0");
        assert_eq!(get(&doc, &path("[list][0]")).unwrap(), 10);
        assert_eq!(get(&doc, &path("[list][1][x]")).unwrap(), true);
    }

    #[test]
    fn test_get_missing() {
        let doc = json!({"require": {"vendor/lib": "^1.0"}});
        let err = get(&doc, &path("[require][other/lib]")).unwrap_err();
        assert!(matches!(err, PathError::NotReadable { ref segment, .. } if segment == "other/lib"));
        assert!(!is_readable(&doc, &path("[missing][deeper]")));
    }

    #[test]
    fn test_get_through_scalar_fails() {
        let doc = json!({"name": "vendor/project", "list": [1]});
        assert!(!is_readable(&doc, &path("[name][first]")));
        assert!(!is_readable(&doc, &path("[list][first]")));
        assert!(!is_readable(&doc, &path("[list][5]")));
    }

    #[test]
    fn test_readable_falsy_values() {
        let doc = json!({"a": null, "b": false, "c": 0, "d": "", "e": []});
        for key in ["a", "b", "c", "d", "e"] {
            assert!(is_readable(&doc, &Path::key(key)));
        }
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut doc = json!({"a": 1, "b": 2, "c": 3});
        set(&mut doc, &Path::key("b"), json!(20)).unwrap();
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(doc["b"], 20);
    }

    #[test]
    fn test_set_appends_new_key() {
        let mut doc = json!({"a": 1});
        set(&mut doc, &Path::key("z"), json!("new")).unwrap();
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["a", "z"]);
    }

    #[test]
    fn test_set_creates_intermediate_mappings() {
        let mut doc = json!({});
        set(&mut doc, &path("[extra][branch-alias][dev-master]"), json!("1.0-dev")).unwrap();
        assert_eq!(doc, json!({"extra": {"branch-alias": {"dev-master": "1.0-dev"}}}));
    }

    #[test]
    fn test_set_sequence_index() {
        let mut doc = json!({"list": [1, 2]});
        set(&mut doc, &path("[list][0]"), json!(9)).unwrap();
        set(&mut doc, &path("[list][2]"), json!(3)).unwrap();
        assert_eq!(doc["list"], json!([9, 2, 3]));
        assert!(set(&mut doc, &path("[list][7]"), json!(0)).is_err());
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut doc = json!({"name": "vendor/project"});
        let err = set(&mut doc, &path("[name][first]"), json!(1)).unwrap_err();
        assert!(matches!(err, PathError::NotWritable { .. }));
        assert_eq!(doc, json!({"name": "vendor/project"}));
    }

    #[test]
    fn test_starts_with() {
        let p = path("[require][vendor/lib]");
        assert!(p.starts_with(&Path::key("require")));
        assert!(p.starts_with(&p));
        assert!(!Path::key("require").starts_with(&p));
        assert_eq!(Path::key("require").child("vendor/lib"), p);
    }
}
