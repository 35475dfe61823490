//! Input format detection
//!
//! Formats are chosen by file extension through a static registry; adding a
//! format means adding a [`FormatEntry`] and a parse function.

use crate::parsers;
use std::fmt;
use std::path::Path;
use types::{ConfigTable, EnvflatError, Result};

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Yaml,
    Ini,
}

/// Registry entry binding a set of extensions to a parser
pub struct FormatEntry {
    pub format: SourceFormat,
    pub extensions: &'static [&'static str],
    pub parse: fn(&Path) -> Result<ConfigTable>,
}

/// Extension registry, matched case-sensitively
pub const FORMATS: &[FormatEntry] = &[
    FormatEntry {
        format: SourceFormat::Yaml,
        extensions: &[".yaml", ".yml"],
        parse: parsers::parse_yaml,
    },
    FormatEntry {
        format: SourceFormat::Ini,
        extensions: &[".conf", ".cfg", ".ini"],
        parse: parsers::parse_ini,
    },
];

impl SourceFormat {
    /// Look up the format registered for `extension` (including the dot)
    pub fn from_extension(extension: &str) -> Result<Self> {
        Self::entry_for(extension)
            .map(|entry| entry.format)
            .ok_or_else(|| EnvflatError::UnsupportedFormat {
                extension: extension.to_string(),
            })
    }

    fn entry_for(extension: &str) -> Option<&'static FormatEntry> {
        FORMATS
            .iter()
            .find(|entry| entry.extensions.iter().any(|ext| *ext == extension))
    }

    fn entry(self) -> &'static FormatEntry {
        match self {
            SourceFormat::Yaml => &FORMATS[0],
            SourceFormat::Ini => &FORMATS[1],
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        self.entry().extensions
    }

    /// Parse `path` into a nested tree with this format's parser
    pub fn parse(self, path: &Path) -> Result<ConfigTable> {
        (self.entry().parse)(path)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Yaml => write!(f, "yaml"),
            SourceFormat::Ini => write!(f, "ini"),
        }
    }
}

/// Split a path into `(base_name, extension)`
///
/// Only the final path component is considered. Leading dots of that
/// component never start an extension, so `.env` has none, and a trailing
/// dot is an extension of its own (`file.` -> `("file", ".")`).
pub fn get_extension(path: &str) -> (String, String) {
    let name_start = path.rfind(std::path::is_separator).map_or(0, |i| i + 1);
    let name = &path[name_start..];
    let leading_dots = name.len() - name.trim_start_matches('.').len();

    match name[leading_dots..].rfind('.') {
        Some(dot) => {
            let split = name_start + leading_dots + dot;
            (path[..split].to_string(), path[split..].to_string())
        }
        None => (path.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(path: &str) -> (String, String) {
        get_extension(path)
    }

    #[test]
    fn test_get_extension() {
        assert_eq!(split("testfile.txt"), ("testfile".into(), ".txt".into()));
        assert_eq!(split("archive.tar.gz"), ("archive.tar".into(), ".gz".into()));
        assert_eq!(split("conf/app.yaml"), ("conf/app".into(), ".yaml".into()));
    }

    #[test]
    fn test_get_extension_without_extension() {
        assert_eq!(split("Makefile"), ("Makefile".into(), String::new()));
        assert_eq!(split(".env"), (".env".into(), String::new()));
        assert_eq!(split("..hidden"), ("..hidden".into(), String::new()));
        assert_eq!(split("dir.d/file"), ("dir.d/file".into(), String::new()));
        assert_eq!(split(""), (String::new(), String::new()));
    }

    #[test]
    fn test_get_extension_edge_cases() {
        assert_eq!(split("file."), ("file".into(), ".".into()));
        assert_eq!(split(".config.yml"), (".config".into(), ".yml".into()));
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(SourceFormat::from_extension(".yaml").unwrap(), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_extension(".yml").unwrap(), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_extension(".conf").unwrap(), SourceFormat::Ini);
        assert_eq!(SourceFormat::from_extension(".cfg").unwrap(), SourceFormat::Ini);
        assert_eq!(SourceFormat::from_extension(".ini").unwrap(), SourceFormat::Ini);
    }

    #[test]
    fn test_registry_rejects_unknown_extensions() {
        for ext in [".txt", "", ".YAML", ".json"] {
            match SourceFormat::from_extension(ext) {
                Err(EnvflatError::UnsupportedFormat { extension }) => assert_eq!(extension, ext),
                other => panic!("expected unsupported format for {:?}, got {:?}", ext, other),
            }
        }
    }

    #[test]
    fn test_registry_entries_match_their_format() {
        assert_eq!(SourceFormat::Yaml.entry().format, SourceFormat::Yaml);
        assert_eq!(SourceFormat::Ini.entry().format, SourceFormat::Ini);
    }

    #[test]
    fn test_every_format_has_an_entry() {
        assert_eq!(SourceFormat::Yaml.extensions(), &[".yaml", ".yml"]);
        assert_eq!(SourceFormat::Ini.extensions(), &[".conf", ".cfg", ".ini"]);
    }
}
