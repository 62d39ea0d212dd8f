//! Error types for the bazaar-tools library
//!
//! Environment failures (file I/O, JSON decoding, subprocesses, HTTP) surface
//! as [`BazaarError`]. Document-level problems are never errors: validators
//! report them as findings instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BazaarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering front matter as YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unreadable, unparsable or out-of-range configuration
    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// Marketplace manifest missing or unreadable
    #[error("{path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    /// An external program failed or could not be started
    #[error("`{program}` failed: {reason}")]
    Command { program: String, reason: String },

    /// Bad user input, such as an invalid name
    #[error("{message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, BazaarError>;

impl BazaarError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn command(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Command {
            program: program.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
