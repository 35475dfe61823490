//! Output rendering and file writers

use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;
use types::{EnvflatError, FlatConfig, Result};

/// Fixed name of the dotenv output in the working directory
pub const ENV_FILE_NAME: &str = ".env";

/// Fixed name of the JSON output in the working directory
pub const JSON_FILE_NAME: &str = "env.json";

/// Export targets accepted by [`crate::ConfigLoader::export`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Env,
    Json,
}

impl ExportFormat {
    /// Output file written by the fixed-name export
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Env => ENV_FILE_NAME,
            ExportFormat::Json => JSON_FILE_NAME,
        }
    }

    /// Render `config` in this format
    pub fn render(self, config: &FlatConfig) -> Result<String> {
        match self {
            ExportFormat::Env => Ok(render_env(config)),
            ExportFormat::Json => render_json(config),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = EnvflatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "env" => Ok(ExportFormat::Env),
            "json" => Ok(ExportFormat::Json),
            other => Err(EnvflatError::InvalidFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Env => write!(f, "env"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// One `KEY=value` line per entry, in iteration order
pub fn render_env(config: &FlatConfig) -> String {
    let mut out = String::new();
    for (key, value) in config {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// A flat JSON object with 4-space indentation and a trailing newline
pub fn render_json(config: &FlatConfig) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut serializer)?;
    buf.push(b'\n');

    String::from_utf8(buf).map_err(|e| EnvflatError::Serialization(e.to_string()))
}

/// Replace `path` with `content` via a temp file in the same directory
///
/// The destination is either fully rewritten or left as it was.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let io_error = |source: std::io::Error| EnvflatError::Io {
        path: path.display().to_string(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent).map_err(io_error)?;
    temp_file.write_all(content.as_bytes()).map_err(io_error)?;
    temp_file.flush().map_err(io_error)?;
    temp_file.persist(path).map_err(|e| io_error(e.error))?;

    Ok(())
}
