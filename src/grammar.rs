//! Filename grammar for recorded clips.
//!
//! Three shapes are recognized, all restricted to [`VIDEO_EXTENSION`]:
//!
//! - canonical: `<name> <yyyy>.<mm>.<dd> - <n>` optionally followed by `-tag1-tag2...`
//! - DVR capture: `<name> <yyyy>.<mm>.<dd> - ...DVR....mp4`, keyed by the dated prefix
//! - trim copy: `<core>[ _-]Trim.mp4`, keyed by `<core>`
//!
//! Keywords (`DVR`, `Trim`, the extension) match case-insensitively; captured
//! free text keeps its case.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// The one container extension the engine works with, without the dot.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Separator between the session date and the sequence number.
pub const SEQUENCE_SEPARATOR: &str = " - ";

/// Delimiter of the tag suffix.
pub const TAG_DELIMITER: char = '-';

static CANONICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<core>(?P<base>.+ \d{4}\.\d{2}\.\d{2}) - (?P<seq>\d+))(?P<tags>(?:-[^-]+)*)$")
        .expect("Invalid canonical name regex")
});

static DVR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(.+ \d{{4}}\.\d{{2}}\.\d{{2}}) - .*DVR.*\.{}$",
        regex::escape(VIDEO_EXTENSION)
    ))
    .expect("Invalid DVR name regex")
});

static TRIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(.+?)[\s_-]+Trim\.{}$",
        regex::escape(VIDEO_EXTENSION)
    ))
    .expect("Invalid trim name regex")
});

/// A file name broken into its naming-convention parts.
///
/// For names that do not follow the canonical scheme `sequence_label` is
/// `None`, `tags` is empty and `base_identity` is the stem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileName {
    pub base_identity: String,
    pub sequence_label: Option<String>,
    pub tags: Vec<String>,
    /// Extension including the leading dot, or empty.
    pub extension: String,
}

/// Borrowed captures of a canonical stem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CanonicalParts<'a> {
    pub core: &'a str,
    pub base: &'a str,
    pub sequence: &'a str,
    pub tag_suffix: &'a str,
}

pub(crate) fn match_canonical(stem: &str) -> Option<CanonicalParts<'_>> {
    let caps = CANONICAL_RE.captures(stem)?;
    Some(CanonicalParts {
        core: caps.name("core")?.as_str(),
        base: caps.name("base")?.as_str(),
        sequence: caps.name("seq")?.as_str(),
        tag_suffix: caps.name("tags").map_or("", |m| m.as_str()),
    })
}

pub(crate) fn split_tag_suffix(suffix: &str) -> Vec<String> {
    suffix
        .split(TAG_DELIMITER)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl FileName {
    /// Decompose `name`. Never fails: unrecognized names fall back to the stem.
    pub fn parse(name: &str) -> Self {
        let (stem, extension) = split_extension(name);
        let canonical = if has_video_extension(extension) {
            match_canonical(stem)
        } else {
            None
        };

        match canonical {
            Some(parts) => Self {
                base_identity: parts.base.to_string(),
                sequence_label: Some(parts.sequence.to_string()),
                tags: split_tag_suffix(parts.tag_suffix),
                extension: extension.to_string(),
            },
            None => Self {
                base_identity: stem.to_string(),
                sequence_label: None,
                tags: Vec::new(),
                extension: extension.to_string(),
            },
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.sequence_label.is_some()
    }

    /// Base identity plus sequence, i.e. the name without tags or extension.
    pub fn core(&self) -> String {
        match &self.sequence_label {
            Some(seq) => format!("{}{}{}", self.base_identity, SEQUENCE_SEPARATOR, seq),
            None => self.base_identity.clone(),
        }
    }

    /// Rebuild the full file name.
    pub fn compose(&self) -> String {
        crate::tags::compose_tags(&self.core(), &self.tags, &self.extension)
    }
}

/// Entry point used by callers that only hold a raw name.
pub fn parse_filename(name: &str) -> FileName {
    FileName::parse(name)
}

/// Split `name` into stem and extension (with the dot). Leading dots do not
/// start an extension, so `.mp4` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(idx) => name.split_at(leading + idx),
        None => (name, ""),
    }
}

fn has_video_extension(extension: &str) -> bool {
    extension
        .strip_prefix('.')
        .is_some_and(|ext| ext.eq_ignore_ascii_case(VIDEO_EXTENSION))
}

pub fn is_video_file(name: &str) -> bool {
    has_video_extension(split_extension(name).1)
}

/// `<name> <date>` of a DVR capture, or `None` if `name` is not one.
pub fn dvr_group_key(name: &str) -> Option<&str> {
    DVR_RE.captures(name).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// `<core>` of a trimmed copy, without the separator, or `None`.
pub fn trim_core(name: &str) -> Option<&str> {
    TRIM_RE.captures(name).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// `<stem>.mp4`
pub fn video_file_name(stem: &str) -> String {
    format!("{stem}.{VIDEO_EXTENSION}")
}
