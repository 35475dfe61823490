//! Configuration loader implementation

use crate::export::{self, ExportFormat};
use crate::flatten::Flattener;
use crate::format::{self, SourceFormat};
use crate::parsers;
use crate::settings::Settings;
use std::path::Path;
use tracing::{debug, info};
use types::{ConfigTable, EnvflatError, FlatConfig, Result};

/// Loader lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum LoaderState {
    /// No configuration read yet
    #[default]
    Empty,
    /// Flattened configuration from the last successful read
    Loaded(FlatConfig),
}

/// Reads configuration files, flattens them and exports the result
///
/// A failed [`read`](Self::read) leaves the previously loaded configuration
/// in place. Exports fail with [`EnvflatError::NotLoaded`] until a read has
/// succeeded.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    flattener: Flattener,
    state: LoaderState,
}

impl ConfigLoader {
    /// Create a loader with the default `.` separator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader using a custom flattener
    pub fn with_flattener(flattener: Flattener) -> Self {
        Self {
            flattener,
            state: LoaderState::Empty,
        }
    }

    /// Create a loader from tool settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_flattener(settings.flattener())
    }

    /// Create a loader already holding `config`
    pub fn from_config(config: FlatConfig) -> Self {
        Self {
            flattener: Flattener::default(),
            state: LoaderState::Loaded(config),
        }
    }

    /// Split a path into `(base_name, extension)`
    pub fn get_extension(path: &str) -> (String, String) {
        format::get_extension(path)
    }

    /// Read a YAML file into a nested tree
    pub fn parse_yaml<P: AsRef<Path>>(path: P) -> Result<ConfigTable> {
        parsers::parse_yaml(path.as_ref())
    }

    /// Read an INI-style file into a nested tree
    pub fn parse_ini<P: AsRef<Path>>(path: P) -> Result<ConfigTable> {
        parsers::parse_ini(path.as_ref())
    }

    /// Parse, flatten and store a configuration file
    ///
    /// Returns the path with its extension stripped.
    pub fn read<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let path = path.as_ref();
        let (base_name, extension) = Self::get_extension(&path.to_string_lossy());
        let format = SourceFormat::from_extension(&extension)?;
        debug!(path = %path.display(), %format, "Dispatching configuration parser");

        let tree = format.parse(path)?;
        self.load_tree(&tree)?;
        info!(path = %path.display(), "Configuration loaded");

        Ok(base_name)
    }

    /// Flatten and store an already parsed tree
    ///
    /// On error the previously loaded configuration is kept.
    pub fn load_tree(&mut self, tree: &ConfigTable) -> Result<()> {
        let flat = self.flattener.flatten(tree)?;
        debug!(entries = flat.len(), "Configuration flattened");
        self.state = LoaderState::Loaded(flat);
        Ok(())
    }

    /// The loaded configuration, if any
    pub fn config(&self) -> Option<&FlatConfig> {
        match &self.state {
            LoaderState::Loaded(config) => Some(config),
            LoaderState::Empty => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoaderState::Loaded(_))
    }

    pub fn flattener(&self) -> &Flattener {
        &self.flattener
    }

    /// Write `./.env`
    pub fn export_env_file(&self) -> Result<()> {
        self.export_env_file_to(export::ENV_FILE_NAME)
    }

    /// Write the `.env` rendering to `path`
    pub fn export_env_file_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_export(ExportFormat::Env, path.as_ref())
    }

    /// Write `./env.json`
    pub fn export_json_file(&self) -> Result<()> {
        self.export_json_file_to(export::JSON_FILE_NAME)
    }

    /// Write the JSON rendering to `path`
    pub fn export_json_file_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_export(ExportFormat::Json, path.as_ref())
    }

    /// Export by format name (`"env"` or `"json"`)
    pub fn export(&self, format: &str) -> Result<()> {
        self.export_as(format.parse()?)
    }

    /// Export to the fixed output file of `format`
    pub fn export_as(&self, format: ExportFormat) -> Result<()> {
        self.write_export(format, Path::new(format.file_name()))
    }

    /// Set one process environment variable per entry
    ///
    /// Existing variables with the same name are overwritten. Every entry is
    /// checked before the first variable is set, so a rejected entry leaves the
    /// environment untouched.
    pub fn apply_to_environment(&self) -> Result<()> {
        let config = self.loaded()?;

        for (key, value) in config {
            check_variable(key, value)?;
        }
        for (key, value) in config {
            std::env::set_var(key, value);
        }

        info!(variables = config.len(), "Applied configuration to process environment");
        Ok(())
    }

    fn loaded(&self) -> Result<&FlatConfig> {
        self.config().ok_or(EnvflatError::NotLoaded)
    }

    fn write_export(&self, format: ExportFormat, path: &Path) -> Result<()> {
        let config = self.loaded()?;
        let content = format.render(config)?;
        export::write_atomic(path, &content)?;

        info!(
            path = %path.display(),
            %format,
            entries = config.len(),
            "Configuration exported"
        );
        Ok(())
    }
}

fn check_variable(key: &str, value: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "name is empty"
    } else if key.contains('=') {
        "name contains '='"
    } else if key.contains('\0') {
        "name contains a NUL byte"
    } else if value.contains('\0') {
        "value contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(EnvflatError::InvalidVariable {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}
