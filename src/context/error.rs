//! Error types for context operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors during configuration loading, validation and persistence
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration from {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to save configuration to {path}")]
    Save {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to resolve default configuration path")]
    ResolvePath(#[source] confy::ConfyError),

    #[error("rotation interval must be a positive, representable number of seconds, got {seconds}")]
    InvalidInterval { seconds: f32 },

    #[error("at least one gear set must be configured")]
    NoGearSets,

    #[error("gear set name at position {index} is blank")]
    BlankGearSet { index: usize },
}

/// Errors surfaced by the plugin lifecycle
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("{name} is not loaded. Download it from {url}.")]
    MissingDependency { name: &'static str, url: &'static str },

    #[error("plugin has not been initialized")]
    NotInitialized,

    #[error("plugin has been unloaded")]
    Unloaded,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
