//! Error types shared by the naming engine and the session layer.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while touching the target directory.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Listing the directory failed
    #[error("Cannot read folder {path}: {source}")]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// `rename(from, to)` was refused by the OS
    #[error("Failed to rename {from} to {to}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// `remove(path)` was refused by the OS
    #[error("Failed to remove {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Target name is already taken; nothing was touched
    #[error("Target already exists: {0}")]
    Collision(PathBuf),
    /// Hand-edited name would leave the folder
    #[error("Invalid file name: {0}")]
    InvalidName(String),
    /// Nothing to do: empty name or empty selection
    #[error("Empty input")]
    EmptyInput,
    /// No folder has been selected yet
    #[error("No folder selected")]
    NoFolder,
    /// Path given as a folder is missing or not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    /// Trim replacement stopped part way through the batch
    #[error("Trim replacement aborted after {completed} replacement(s): {source}")]
    TrimAborted {
        completed: usize,
        #[source]
        source: Box<EngineError>,
    },
}

/// Failures loading or saving the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Rejected vocabulary edits.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("Invalid tag {tag:?}: {reason}")]
    InvalidTag { tag: String, reason: &'static str },
}

/// Errors surfaced by [`crate::session::Session`].
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}
