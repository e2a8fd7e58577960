//! Error types for Worktally core.
//!
//! Recalculation never fails; these errors come from building the marker
//! configuration a pass runs with.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring Worktally
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid marker `{field}`: {message}")]
    Marker { field: String, message: String },

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Refusing to read {}: config file too large ({size} bytes, max {max})", path.display())]
    ConfigTooLarge { path: PathBuf, size: u64, max: u64 },
}

pub type Result<T> = std::result::Result<T, TallyError>;
