//! Substitution of trimmed copies (`<core> Trim.mp4`) for their originals.
//!
//! Each replacement is remove-then-rename. The pair is not atomic: if the
//! rename fails after the remove succeeded, the original is gone and the
//! trimmed copy keeps its suffixed name. The batch stops at the first
//! failure and the error says how many replacements finished before it.

use crate::error::EngineError;
use crate::file_scanner::{DirEntry, Filesystem};
use crate::grammar::{trim_core, video_file_name};
use log::{debug, error, info};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrimReplacement {
    pub trimmed: PathBuf,
    pub original: PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TrimPlan {
    pub replacements: Vec<TrimReplacement>,
    /// Trim copies without an original next to them.
    pub orphans: Vec<String>,
    /// Trim copies whose original or own name is already used by another
    /// replacement (a second copy of one original, or a trim of a trim).
    pub duplicates: Vec<String>,
}

/// Plan the replacements for every trim copy in `entries`.
///
/// Copies closest to their root (shortest core) are planned first, so in a
/// chain like `Clip Trim Trim.mp4` / `Clip Trim.mp4` / `Clip.mp4` only the
/// single trim replaces `Clip.mp4`. A name is never used by two steps.
pub fn plan_trim_replace(dir: &Path, entries: &[DirEntry]) -> TrimPlan {
    let existing: HashSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let mut used: HashSet<String> = HashSet::new();
    let mut plan = TrimPlan::default();

    let mut candidates: Vec<(&str, &str)> = entries
        .iter()
        .filter_map(|e| trim_core(&e.name).map(|core| (e.name.as_str(), core)))
        .collect();
    candidates.sort_by_key(|(_, core)| core.len());

    for (name, core) in candidates {
        let original = video_file_name(core);

        if !existing.contains(original.as_str()) {
            debug!("No original {} for {}", original, name);
            plan.orphans.push(name.to_string());
            continue;
        }
        if used.contains(name) || used.contains(&original) {
            debug!("{} or {} already used by another trim copy", name, original);
            plan.duplicates.push(name.to_string());
            continue;
        }

        used.insert(name.to_string());
        used.insert(original.clone());
        plan.replacements.push(TrimReplacement {
            trimmed: dir.join(name),
            original: dir.join(&original),
        });
    }

    plan
}

/// Run `replacements` in order; stop at the first failure.
pub fn commit_trim_replace<F: Filesystem + ?Sized>(
    fs: &F,
    replacements: &[TrimReplacement],
) -> Result<usize, EngineError> {
    let mut completed = 0;

    for step in replacements {
        let outcome = fs
            .remove(&step.original)
            .and_then(|()| fs.rename(&step.trimmed, &step.original));
        if let Err(e) = outcome {
            error!("Error replacing {}: {}", step.original.display(), e);
            return Err(EngineError::TrimAborted {
                completed,
                source: Box::new(e),
            });
        }
        info!(
            "Replaced {} with {}",
            step.original.display(),
            step.trimmed.display()
        );
        completed += 1;
    }

    Ok(completed)
}
