//! Application state: the chosen folder, the tag vocabulary and the
//! configuration file they are persisted to.
//!
//! Every mutation of the folder or the vocabulary is saved immediately.

use crate::config::Config;
use crate::error::{EngineError, SessionError};
use crate::file_scanner::{scan_video_files, DirEntry, Filesystem};
use crate::renumber::{commit_renames, plan_batch_renumber, RenumberPlan, RenumberReport};
use crate::tags;
use crate::trim::{commit_trim_replace, plan_trim_replace, TrimPlan};
use crate::vocabulary::TagVocabulary;
use log::{info, warn};
use std::path::{Path, PathBuf};

pub struct Session<F: Filesystem> {
    config: Config,
    config_path: PathBuf,
    vocabulary: TagVocabulary,
    fs: F,
}

impl<F: Filesystem> Session<F> {
    pub fn new(config: Config, config_path: impl Into<PathBuf>, fs: F) -> Self {
        let vocabulary = TagVocabulary::new(config.tags.clone());
        Self {
            config,
            config_path: config_path.into(),
            vocabulary,
            fs,
        }
    }

    /// Load the configuration at `config_path` (defaults on failure).
    pub fn open(config_path: impl Into<PathBuf>, fs: F) -> Self {
        let config_path = config_path.into();
        let config = Config::load_or_default(&config_path);
        Self::new(config, config_path, fs)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    /// The remembered folder, if it still exists.
    pub fn folder(&self) -> Option<PathBuf> {
        self.config.last_folder().filter(|p| {
            let ok = self.fs.is_dir(p);
            if !ok {
                warn!("Remembered folder {} no longer exists", p.display());
            }
            ok
        })
    }

    fn require_folder(&self) -> Result<PathBuf, EngineError> {
        self.folder().ok_or(EngineError::NoFolder)
    }

    pub fn select_folder(&mut self, path: &Path) -> Result<PathBuf, SessionError> {
        if !self.fs.is_dir(path) {
            return Err(EngineError::NotADirectory(path.to_path_buf()).into());
        }
        let folder = self.fs.canonicalize(path)?;
        info!("Selected folder {}", folder.display());
        self.config.last_folder = folder.to_string_lossy().to_string();
        self.save()?;
        Ok(folder)
    }

    pub fn list_videos(&self) -> Result<Vec<DirEntry>, EngineError> {
        let folder = self.require_folder()?;
        scan_video_files(&self.fs, &folder)
    }

    pub fn plan_batch_format(&self) -> Result<RenumberPlan, EngineError> {
        let folder = self.require_folder()?;
        let entries = self.fs.list_entries(&folder)?;
        Ok(plan_batch_renumber(&folder, &entries))
    }

    /// Renumber DVR captures; individual failures do not stop the batch.
    pub fn batch_format(&self) -> Result<RenumberReport, EngineError> {
        let plan = self.plan_batch_format()?;
        let report = commit_renames(&self.fs, &plan.renames);
        info!("Formatted {} video files", report.renamed);
        Ok(report)
    }

    pub fn plan_replace_trimmed(&self) -> Result<TrimPlan, EngineError> {
        let folder = self.require_folder()?;
        let entries = self.fs.list_entries(&folder)?;
        Ok(plan_trim_replace(&folder, &entries))
    }

    /// Swap trimmed copies in for their originals; stops at the first failure.
    pub fn replace_trimmed(&self) -> Result<usize, EngineError> {
        let plan = self.plan_replace_trimmed()?;
        let replaced = commit_trim_replace(&self.fs, &plan.replacements)?;
        if replaced == 0 {
            info!("No matching Trim files and originals found");
        }
        Ok(replaced)
    }

    /// Vocabulary spelling of `input`, or the trimmed input if unknown.
    /// Nothing is added or saved. Blank input returns `None`.
    pub fn resolve_tag(&self, input: &str) -> Option<String> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        Some(self.vocabulary.find(input).unwrap_or(input).to_string())
    }

    /// Resolve `input` to a vocabulary tag, adding it if unknown.
    ///
    /// Blank input returns `Ok(None)`.
    pub fn add_or_select_tag(&mut self, input: &str) -> Result<Option<String>, SessionError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        if let Some(existing) = self.vocabulary.find(input) {
            return Ok(Some(existing.to_string()));
        }
        self.vocabulary.add(input)?;
        self.save()?;
        Ok(Some(input.to_string()))
    }

    pub fn delete_tag(&mut self, tag: &str) -> Result<bool, SessionError> {
        let removed = self.vocabulary.remove(tag);
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// Preview of `file` renamed with `active_tags`, in vocabulary display order.
    ///
    /// Unknown tags are kept after the known ones, in the order given.
    pub fn preview<S: AsRef<str>>(&self, file: &str, active_tags: &[S]) -> String {
        let mut ordered: Vec<String> = self
            .vocabulary
            .sorted()
            .into_iter()
            .filter(|known| {
                active_tags
                    .iter()
                    .any(|t| self.vocabulary.find(t.as_ref()) == Some(known.as_str()))
            })
            .collect();
        for tag in active_tags {
            let tag = tag.as_ref();
            if self.vocabulary.find(tag).is_none() && !ordered.iter().any(|t| t == tag) {
                ordered.push(tag.to_string());
            }
        }
        tags::preview_name(file, &ordered)
    }

    pub fn checked_tags(&self, file: &str) -> Vec<String> {
        tags::checked_tags(file, &self.vocabulary)
    }

    /// Rename `old_name` to `new_name` inside the folder.
    ///
    /// `Ok(false)` when the name is unchanged. Never overwrites and never
    /// moves the file out of the folder.
    pub fn apply_rename(&self, old_name: &str, new_name: &str) -> Result<bool, EngineError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        if new_name.contains(['/', '\\']) || new_name == "." || new_name == ".." {
            return Err(EngineError::InvalidName(new_name.to_string()));
        }
        if old_name == new_name {
            return Ok(false);
        }
        let folder = self.require_folder()?;
        let from = folder.join(old_name);
        let to = folder.join(new_name);
        if self.fs.exists(&to) {
            return Err(EngineError::Collision(to));
        }
        self.fs.rename(&from, &to)?;
        info!("Renamed {} -> {}", old_name, new_name);
        Ok(true)
    }

    fn save(&mut self) -> Result<(), SessionError> {
        self.config.tags = self.vocabulary.items().to_vec();
        self.config.save(&self.config_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_scanner::StdFilesystem;
    use crate::testing::MemoryFs;
    use tempfile::TempDir;

    const FOLDER: &str = "/v";

    fn session_in(temp_dir: &TempDir, tags: &[&str]) -> Session<MemoryFs> {
        let config = Config {
            last_folder: FOLDER.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Config::default()
        };
        let fs = MemoryFs::default();
        fs.add_dir(Path::new(FOLDER));
        Session::new(config, temp_dir.path().join("config.toml"), fs)
    }

    #[test]
    fn test_preview_orders_by_vocabulary() {
        let temp_dir = TempDir::new().unwrap();
        let session = session_in(&temp_dir, &["funny", "ace", "clutch"]);
        let preview = session.preview("Game 2024.01.01 - 3.mp4", &["clutch", "ace"]);
        assert_eq!(preview, "Game 2024.01.01 - 3-ace-clutch.mp4");
    }

    #[test]
    fn test_preview_with_no_tags_strips_existing_ones() {
        let temp_dir = TempDir::new().unwrap();
        let session = session_in(&temp_dir, &["ace"]);
        let none: [&str; 0] = [];
        assert_eq!(
            session.preview("Game 2024.01.01 - 3-ace.mp4", &none),
            "Game 2024.01.01 - 3.mp4"
        );
    }

    #[test]
    fn test_add_or_select_tag_persists_new_tags() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session_in(&temp_dir, &["Ace"]);

        assert_eq!(session.add_or_select_tag("ace").unwrap(), Some("Ace".to_string()));
        assert!(!temp_dir.path().join("config.toml").exists());

        assert_eq!(session.add_or_select_tag(" entry ").unwrap(), Some("entry".to_string()));
        let saved = Config::load(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.tags, vec!["Ace", "entry"]);

        assert_eq!(session.add_or_select_tag("   ").unwrap(), None);
        assert!(matches!(
            session.add_or_select_tag("two-words"),
            Err(SessionError::Vocabulary(_))
        ));
    }

    #[test]
    fn test_resolve_tag_does_not_touch_vocabulary() {
        let temp_dir = TempDir::new().unwrap();
        let session = session_in(&temp_dir, &["Ace"]);

        assert_eq!(session.resolve_tag("ace"), Some("Ace".to_string()));
        assert_eq!(session.resolve_tag(" fresh "), Some("fresh".to_string()));
        assert_eq!(session.resolve_tag("  "), None);
        assert_eq!(session.vocabulary().items(), ["Ace"]);
        assert!(!temp_dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_delete_tag_persists() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session_in(&temp_dir, &["ace", "3k"]);
        assert!(session.delete_tag("ace").unwrap());
        assert!(!session.delete_tag("ace").unwrap());
        let saved = Config::load(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.tags, vec!["3k"]);
    }

    #[test]
    fn test_apply_rename_rules() {
        let temp_dir = TempDir::new().unwrap();
        let session = session_in(&temp_dir, &[]);
        session.fs.add(Path::new(FOLDER), "a.mp4", 0);
        session.fs.add(Path::new(FOLDER), "b.mp4", 0);

        assert!(matches!(session.apply_rename("a.mp4", "  "), Err(EngineError::EmptyInput)));
        assert!(!session.apply_rename("a.mp4", "a.mp4").unwrap());
        assert!(matches!(
            session.apply_rename("a.mp4", "b.mp4"),
            Err(EngineError::Collision(_))
        ));
        assert!(session.apply_rename("a.mp4", " c.mp4 ").unwrap());
        assert_eq!(session.fs.names(), vec!["b.mp4", "c.mp4"]);
    }

    #[test]
    fn test_apply_rename_stays_in_folder() {
        let temp_dir = TempDir::new().unwrap();
        let session = session_in(&temp_dir, &[]);
        session.fs.add(Path::new(FOLDER), "a.mp4", 0);

        for bad in ["../a.mp4", "sub/a.mp4", "sub\\a.mp4", "/tmp/a.mp4", "..", "."] {
            assert!(
                matches!(session.apply_rename("a.mp4", bad), Err(EngineError::InvalidName(_))),
                "{bad} accepted"
            );
        }
        assert!(session.fs.calls.borrow().is_empty());
        assert_eq!(session.fs.names(), vec!["a.mp4"]);
    }

    #[test]
    fn test_operations_need_a_folder() {
        let session = Session::new(Config::default(), "unused.toml", StdFilesystem);
        assert!(matches!(session.list_videos(), Err(EngineError::NoFolder)));
        assert!(matches!(session.batch_format(), Err(EngineError::NoFolder)));
        assert!(matches!(session.replace_trimmed(), Err(EngineError::NoFolder)));
    }

    #[test]
    fn test_remembered_folder_checked_through_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        let session = session_in(&temp_dir, &[]);
        assert_eq!(session.folder(), Some(PathBuf::from(FOLDER)));

        let config = Config {
            last_folder: "/gone".to_string(),
            ..Config::default()
        };
        let session = Session::new(config, temp_dir.path().join("c.toml"), MemoryFs::default());
        assert_eq!(session.folder(), None);
        assert!(matches!(session.list_videos(), Err(EngineError::NoFolder)));
    }

    #[test]
    fn test_select_folder_uses_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session_in(&temp_dir, &[]);
        session.fs.add_dir(Path::new("/w"));
        session.fs.add(Path::new("/w"), "x.mp4", 0);

        assert_eq!(session.select_folder(Path::new("/w")).unwrap(), PathBuf::from("/w"));
        assert_eq!(session.config().last_folder, "/w");
        assert_eq!(session.list_videos().unwrap()[0].name, "x.mp4");
        let saved = Config::load(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.last_folder, "/w");

        assert!(matches!(
            session.select_folder(Path::new("/w/x.mp4")),
            Err(SessionError::Engine(EngineError::NotADirectory(_)))
        ));
    }

    #[test]
    fn test_select_folder_rejects_files() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("x.mp4");
        std::fs::write(&file, b"").unwrap();
        let config_path = temp_dir.path().join("c.toml");
        let mut session = Session::new(Config::default(), config_path, StdFilesystem);
        assert!(matches!(
            session.select_folder(&file),
            Err(SessionError::Engine(EngineError::NotADirectory(_)))
        ));
    }
}
