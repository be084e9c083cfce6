//! Known tag vocabulary.

use crate::error::VocabularyError;
use crate::grammar::TAG_DELIMITER;
use log::{debug, info};

/// Tag set with case-insensitive identity. The first spelling wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagVocabulary {
    items: Vec<String>,
}

/// Tags offered when no configuration exists yet.
pub const DEFAULT_TAGS: [&str; 7] = ["3k", "4k", "ace", "clutch", "funny", "marshal", "airshot"];

impl TagVocabulary {
    pub fn new(items: Vec<String>) -> Self {
        let mut vocab = Self { items };
        vocab.normalize();
        vocab
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_TAGS.iter().map(|t| t.to_string()).collect())
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display order: case-insensitive alphabetical.
    pub fn sorted(&self) -> Vec<String> {
        let mut sorted = self.items.clone();
        sorted.sort_by_key(|t| t.to_lowercase());
        sorted
    }

    /// The stored spelling of `tag`, compared case-insensitively.
    pub fn find(&self, tag: &str) -> Option<&str> {
        let needle = tag.to_lowercase();
        self.items
            .iter()
            .find(|t| t.to_lowercase() == needle)
            .map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.find(tag).is_some()
    }

    /// Add `tag`. Returns `Ok(false)` if an equal entry already exists.
    pub fn add(&mut self, tag: &str) -> Result<bool, VocabularyError> {
        let tag = validate_tag(tag)?;
        if self.contains(tag) {
            debug!("Tag {} already in vocabulary", tag);
            return Ok(false);
        }
        info!("Adding tag {}", tag);
        self.items.push(tag.to_string());
        Ok(true)
    }

    /// Remove `tag` if present. Returns whether anything was removed.
    pub fn remove(&mut self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        let before = self.items.len();
        self.items.retain(|t| t.to_lowercase() != needle);
        let removed = self.items.len() != before;
        if removed {
            info!("Removed tag {}", tag.trim());
        }
        removed
    }

    /// Entries containing `query` (case-insensitive), in vocabulary order.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|t| t.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn normalize(&mut self) {
        let mut seen = Vec::<String>::new();
        self.items.retain(|tag| {
            let lower = tag.trim().to_lowercase();
            if lower.is_empty() || seen.contains(&lower) {
                false
            } else {
                seen.push(lower);
                true
            }
        });
    }
}

/// Next entry after `previous` in `matches`, wrapping around.
///
/// `previous == None` starts from the first entry. Returns `None` for an
/// empty list.
pub fn cycle<S: AsRef<str>>(matches: &[S], previous: Option<usize>) -> Option<(usize, &str)> {
    if matches.is_empty() {
        return None;
    }
    let next = previous.map_or(0, |i| (i + 1) % matches.len());
    Some((next, matches[next].as_ref()))
}

fn validate_tag(tag: &str) -> Result<&str, VocabularyError> {
    let tag = tag.trim();
    let reason = if tag.is_empty() {
        Some("tag is empty")
    } else if tag.contains(TAG_DELIMITER) {
        Some("tag must not contain '-'")
    } else if tag.contains(['/', '\\']) {
        Some("tag must not contain a path separator")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(VocabularyError::InvalidTag {
            tag: tag.to_string(),
            reason,
        }),
        None => Ok(tag),
    }
}
