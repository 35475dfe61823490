//! Shared types for envflat
//!
//! This crate contains the configuration data model (nested trees and their
//! flattened form) and the error types used across the workspace.

pub mod error;
pub mod flat;
pub mod node;

// Re-export commonly used types
pub use error::{EnvflatError, Result, SettingsError};
pub use flat::FlatConfig;
pub use node::{ConfigNode, ConfigTable};
