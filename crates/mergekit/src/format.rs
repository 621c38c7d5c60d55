//! Reading and writing documents as JSON or YAML.
//!
//! Documents are `serde_json::Value`s with insertion-ordered mappings, so a
//! file that is parsed and written back keeps its key order. YAML input is
//! deserialized into the same type.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Notation a document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Detect the format from a file name.
    ///
    /// `.yml` and `.yaml` (optionally followed by `.dist`) are YAML,
    /// everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".dist").unwrap_or(&name);

        if name.ends_with(".yml") || name.ends_with(".yaml") {
            Self::Yaml
        } else {
            Self::Json
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// A document together with where it came from.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub path: PathBuf,
    pub format: Format,
    pub value: Value,
}

impl DocumentFile {
    /// Read and parse `path`, detecting the format from its name.
    ///
    /// A missing file is reported as [`Error::NotFound`] before any read.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let format = Format::from_path(path);
        let content = fs::read_to_string(path)?;
        let value = parse(&content, format).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        log::debug!("Loaded {} ({})", path.display(), format.name());

        Ok(Self {
            path: path.to_path_buf(),
            format,
            value,
        })
    }

    /// Serialize `value` in this file's format and write it to this file.
    pub fn save(&self, value: &Value) -> Result<()> {
        save(value, &self.path, self.format)
    }
}

/// Parse text into a document.
pub fn parse(content: &str, format: Format) -> Result<Value> {
    match format {
        Format::Json => Ok(serde_json::from_str(content)?),
        Format::Yaml if content.trim().is_empty() => Ok(Value::Null),
        Format::Yaml => Ok(serde_yaml::from_str(content)?),
    }
}

/// Serialize a document.
///
/// JSON is indented with four spaces and ends with a newline, the layout the
/// host package manager uses for its own files. YAML multi-line strings are
/// written as literal blocks.
pub fn to_string(value: &Value, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut serializer)?;
            let mut text = String::from_utf8(buf)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            text.push('\n');
            Ok(text)
        }
        Format::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

/// Serialize and write a document, creating parent directories.
pub fn save(value: &Value, path: &Path, format: Format) -> Result<()> {
    let content = to_string(value, format)?;

    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, content).map_err(write_error)?;

    log::debug!("Wrote {} ({})", path.display(), format.name());
    Ok(())
}
