//! Configuration flattening for envflat
//!
//! This crate reads YAML and INI configuration files, flattens their nested
//! keys into dotted paths and exports the result as a `.env` file, a JSON
//! file, or process environment variables.

pub mod export;
pub mod flatten;
pub mod format;
pub mod loader;
pub mod parsers;
pub mod settings;
pub mod validation;

pub use export::{ExportFormat, ENV_FILE_NAME, JSON_FILE_NAME};
pub use flatten::{flatten, CollisionPolicy, Flattener, DEFAULT_SEPARATOR};
pub use format::{get_extension, SourceFormat};
pub use loader::ConfigLoader;
pub use settings::Settings;
pub use validation::*;
