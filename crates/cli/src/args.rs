//! Command-line arguments

use clap::Parser;
use std::path::{Path, PathBuf};
use types::EnvflatError;

/// Sample configuration compiled into the binary
pub const SAMPLE_CONFIG: &str = include_str!("../configurations/sample.yaml");

/// Base name reported for the bundled sample
pub const SAMPLE_CONFIG_NAME: &str = "sample";

/// Where the configuration comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    File(&'a Path),
    Bundled,
}

/// Command-line interface definition
#[derive(Parser, Debug)]
#[command(
    name = "envflat",
    author,
    version,
    about = "Flatten a YAML or INI configuration file into env.json and .env"
)]
pub struct Cli {
    /// Configuration file to flatten
    #[arg(
        long = "path",
        env = "ENVFLAT_CONFIG_PATH",
        value_name = "FILE",
        value_parser = existing_file,
        help = "Path to a .yaml, .yml, .conf, .cfg or .ini file; defaults to the bundled sample"
    )]
    pub path: Option<PathBuf>,
}

impl Cli {
    /// The file to read, falling back to the bundled sample
    pub fn source(&self) -> Source<'_> {
        match &self.path {
            Some(path) => Source::File(path),
            None => Source::Bundled,
        }
    }
}

/// Accept only paths naming an existing regular file
pub fn existing_file(raw: &str) -> Result<PathBuf, EnvflatError> {
    let path = PathBuf::from(raw);
    if path.is_file() {
        Ok(path)
    } else {
        Err(EnvflatError::InvalidPath {
            path: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_existing_file() {
        let file = NamedTempFile::new().unwrap();
        let raw = file.path().to_str().unwrap();
        assert_eq!(existing_file(raw).unwrap(), file.path());
    }

    #[test]
    fn test_existing_file_rejects_missing_and_directories() {
        assert!(matches!(
            existing_file("/nonexistent/envflat.yaml"),
            Err(EnvflatError::InvalidPath { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(existing_file(dir.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_source_defaults_to_sample() {
        let cli = Cli { path: None };
        assert_eq!(cli.source(), Source::Bundled);

        let file = NamedTempFile::new().unwrap();
        let cli = Cli {
            path: Some(file.path().to_path_buf()),
        };
        assert_eq!(cli.source(), Source::File(file.path()));
    }

    #[test]
    fn test_bundled_sample_parses() {
        let tree = config::parsers::parse_yaml_str(SAMPLE_CONFIG).unwrap();
        assert!(tree.contains_key("database"));
    }
}
