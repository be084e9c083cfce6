//! Naming engine for locally recorded replay clips.
//!
//! Parses the `<name> <yyyy>.<mm>.<dd> - <n>[-tag...].mp4` convention, plans
//! bulk renames (DVR renumbering, trimmed-copy substitution) as plain values
//! and applies them through a [`file_scanner::Filesystem`] adapter.

pub mod config;
pub mod error;
pub mod file_scanner;
pub mod grammar;
pub mod logging;
pub mod plan;
pub mod renumber;
pub mod session;
pub mod tags;
pub mod trim;
pub mod vocabulary;

#[cfg(test)]
mod testing;

pub use config::{Config, LoggingConfig};
pub use error::{ConfigError, EngineError, SessionError, VocabularyError};
pub use file_scanner::{DirEntry, Filesystem, StdFilesystem};
pub use grammar::{parse_filename, FileName, VIDEO_EXTENSION};
pub use plan::{Rename, RenameBatch};
pub use renumber::{plan_batch_renumber, RecordingGroup, RenumberPlan, RenumberReport};
pub use session::Session;
pub use tags::{compose_tags, decompose_tags};
pub use trim::{plan_trim_replace, TrimPlan, TrimReplacement};
pub use vocabulary::{cycle, TagVocabulary};
