//! Read-then-export workflow run by the binary

use crate::args::{Source, SAMPLE_CONFIG, SAMPLE_CONFIG_NAME};
use anyhow::{Context, Result};
use config::{parsers, ConfigLoader, ExportFormat, Settings};
use tracing::info;

/// Output order of a run
const EXPORT_ORDER: [ExportFormat; 2] = [ExportFormat::Json, ExportFormat::Env];

pub struct Application {
    loader: ConfigLoader,
}

impl Application {
    pub fn new(settings: &Settings) -> Self {
        Self {
            loader: ConfigLoader::from_settings(settings),
        }
    }

    /// Load `source` and write `env.json` then `.env` in the working directory
    pub fn run(&mut self, source: Source<'_>) -> Result<String> {
        let base_name = match source {
            Source::File(path) => self
                .loader
                .read(path)
                .with_context(|| format!("Failed to read configuration from {}", path.display()))?,
            Source::Bundled => {
                let tree = parsers::parse_yaml_str(SAMPLE_CONFIG)
                    .context("Failed to parse the bundled sample configuration")?;
                self.loader
                    .load_tree(&tree)
                    .context("Failed to flatten the bundled sample configuration")?;
                SAMPLE_CONFIG_NAME.to_string()
            }
        };
        info!("Flattened configuration: {}", base_name);

        for format in EXPORT_ORDER {
            self.loader
                .export_as(format)
                .with_context(|| format!("Failed to write {}", format.file_name()))?;
        }

        Ok(base_name)
    }
}
