//! Renumbering of DVR captures into `<name> <date> - <n>.mp4` sequences.
//!
//! Planning is a pure function of the directory snapshot: captures are
//! grouped by their dated prefix, ordered oldest first and numbered from 1.
//! A target that already exists in the snapshot blocks only that one rename.

use crate::file_scanner::{DirEntry, Filesystem};
use crate::grammar::{dvr_group_key, video_file_name, SEQUENCE_SEPARATOR};
use crate::plan::{Rename, RenameBatch};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Captures of one recording session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordingGroup {
    pub date_prefix: String,
    /// Oldest first; equal times keep listing order.
    pub members: Vec<DirEntry>,
}

impl RecordingGroup {
    /// `<prefix> - <n>.mp4` for the 1-based position `n`.
    pub fn target_name(&self, position: usize) -> String {
        video_file_name(&format!("{}{}{}", self.date_prefix, SEQUENCE_SEPARATOR, position))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenumberPlan {
    pub renames: RenameBatch,
    /// Renames withheld because the target was already taken.
    pub collisions: Vec<Rename>,
    /// Members already carrying their target name.
    pub unchanged: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct RenameFailure {
    pub rename: Rename,
    pub error: String,
}

/// Outcome of applying a [`RenameBatch`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct RenumberReport {
    pub renamed: usize,
    pub skipped: Vec<Rename>,
    pub failures: Vec<RenameFailure>,
}

/// Group DVR captures by dated prefix, groups in order of first appearance.
pub fn group_recordings(entries: &[DirEntry]) -> Vec<RecordingGroup> {
    let mut groups: Vec<RecordingGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let Some(prefix) = dvr_group_key(&entry.name) else {
            continue;
        };
        let slot = *index.entry(prefix).or_insert_with(|| {
            groups.push(RecordingGroup {
                date_prefix: prefix.to_string(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(entry.clone());
    }

    for group in &mut groups {
        group.members.sort_by_key(|m| m.modified);
    }
    groups
}

/// Compute the renames for every DVR capture in `entries`.
pub fn plan_batch_renumber(dir: &Path, entries: &[DirEntry]) -> RenumberPlan {
    let existing: HashSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let mut plan = RenumberPlan::default();

    for group in group_recordings(entries) {
        debug!(
            "Group {} has {} capture(s)",
            group.date_prefix,
            group.members.len()
        );
        for (idx, member) in group.members.iter().enumerate() {
            let target = group.target_name(idx + 1);
            if member.name == target {
                plan.unchanged += 1;
                continue;
            }
            let rename = Rename::new(dir.join(&member.name), dir.join(&target));
            if existing.contains(target.as_str()) {
                warn!("Not renaming {}: {} already exists", member.name, target);
                plan.collisions.push(rename);
            } else {
                plan.renames.push(rename);
            }
        }
    }

    plan
}

/// Apply `batch` in order. Failures are logged and the rest still run.
pub fn commit_renames<F: Filesystem + ?Sized>(fs: &F, batch: &[Rename]) -> RenumberReport {
    let mut report = RenumberReport::default();

    for rename in batch {
        if fs.exists(&rename.to) {
            warn!("Skipping {}: target appeared since planning", rename.to.display());
            report.skipped.push(rename.clone());
            continue;
        }
        match fs.rename(&rename.from, &rename.to) {
            Ok(()) => {
                info!(
                    "Renamed {} -> {}",
                    rename.from.display(),
                    rename.to.display()
                );
                report.renamed += 1;
            }
            Err(e) => {
                error!("{}", e);
                report.failures.push(RenameFailure {
                    rename: rename.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    report
}
