//! Tag suffix composition and decomposition.

use crate::grammar::{self, FileName, TAG_DELIMITER};
use crate::vocabulary::TagVocabulary;

/// Split a stem into its core (`<name> <date> - <n>`) and the tags after it.
///
/// Stems that are not canonical come back whole with no tags.
pub fn decompose_tags(base_without_ext: &str) -> (String, Vec<String>) {
    match grammar::match_canonical(base_without_ext) {
        Some(parts) => (
            parts.core.to_string(),
            grammar::split_tag_suffix(parts.tag_suffix),
        ),
        None => (base_without_ext.to_string(), Vec::new()),
    }
}

/// Append `-tag1-tag2...` and `extension` to `core`, in the order given.
pub fn compose_tags<I, S>(core: &str, active_tags: I, extension: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut name = core.to_string();
    for tag in active_tags {
        name.push(TAG_DELIMITER);
        name.push_str(tag.as_ref());
    }
    name.push_str(extension);
    name
}

/// The name `original` would get with exactly `active_tags` attached.
///
/// Tags already present in `original` are replaced, not merged.
pub fn preview_name<I, S>(original: &str, active_tags: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = FileName::parse(original);
    compose_tags(&parsed.core(), active_tags, &parsed.extension)
}

/// Tags embedded in `file_name` that the vocabulary knows, spelled the way
/// the vocabulary spells them.
pub fn checked_tags(file_name: &str, vocabulary: &TagVocabulary) -> Vec<String> {
    let mut checked: Vec<String> = Vec::new();
    for tag in FileName::parse(file_name).tags {
        if let Some(known) = vocabulary.find(&tag) {
            if !checked.iter().any(|t| t == known) {
                checked.push(known.to_string());
            }
        }
    }
    checked
}
