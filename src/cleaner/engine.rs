use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use super::retry::RetryPolicy;
use crate::common::config::{Config, ExclusionSet};
use crate::common::format;
use crate::common::fs::list_children;
use crate::server::ServerController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    File,
    Directory,
}

/// A path queued for deletion in the current clean pass
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRemoval {
    pub path: PathBuf,
    pub kind: RemovalKind,
    /// Byte size, files only
    pub size: Option<u64>,
}

/// An item that could not be removed after every retry
#[derive(Debug, Clone)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub error: String,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// Nothing matched; no filesystem changes were made
    AlreadyClean,
    Cleaned,
}

/// What a clean pass is about to remove, before anything is touched
#[derive(Debug, Clone, Default)]
pub struct CleanPlan {
    /// Execution order: files smallest first, then directories
    pub planned: Vec<PendingRemoval>,
    /// Matches dropped because their metadata was unreadable
    pub skipped: Vec<PathBuf>,
}

/// Result of deleting a plan
#[derive(Debug, Clone, Default)]
pub struct Execution {
    pub removed: Vec<PathBuf>,
    pub failures: Vec<RemovalFailure>,
    pub file_bytes_freed: u64,
}

/// Report from a clean operation
#[derive(Debug, Clone)]
pub struct CleanReport {
    pub outcome: CleanOutcome,
    /// Execution order: files smallest first, then directories
    pub planned: Vec<PendingRemoval>,
    pub removed: Vec<PathBuf>,
    pub failures: Vec<RemovalFailure>,
    /// Matches dropped from the plan because their metadata was unreadable
    pub skipped: Vec<PathBuf>,
    /// Bytes of removed files (directory contents are never measured)
    pub file_bytes_freed: u64,
}

impl CleanReport {
    fn already_clean(skipped: Vec<PathBuf>) -> Self {
        Self {
            outcome: CleanOutcome::AlreadyClean,
            planned: Vec::new(),
            removed: Vec::new(),
            failures: Vec::new(),
            skipped,
            file_bytes_freed: 0,
        }
    }
}

/// Removes excluded build artifacts and dependency folders from a project
pub struct Cleaner {
    exclusions: ExclusionSet,
    policy: RetryPolicy,
}

impl Cleaner {
    pub fn new(config: &Config) -> Self {
        Self::with_policy(config.exclusions(), RetryPolicy::from_config(config))
    }

    pub fn with_policy(exclusions: ExclusionSet, policy: RetryPolicy) -> Self {
        Self { exclusions, policy }
    }

    /// Stop servers, then remove every excluded path under `root`.
    ///
    /// Per-item failures are contained in the report; this never aborts halfway.
    pub fn clean(&self, root: &Path, server: &ServerController, show_progress: bool) -> CleanReport {
        let plan = self.prepare(root, server, show_progress);
        self.apply(plan, root, show_progress)
    }

    /// Stop servers and work out what to remove, without removing anything
    pub fn prepare(&self, root: &Path, server: &ServerController, show_progress: bool) -> CleanPlan {
        if show_progress {
            println!("{}", "Preparing to clean project...".cyan());
        }

        // Live dev servers hold file locks on dist/ and node_modules/
        server.stop(show_progress);

        let (planned, skipped) = plan_removals(find_excluded(root, &self.exclusions));
        CleanPlan { planned, skipped }
    }

    /// Delete everything in `plan`. An empty plan touches nothing.
    pub fn apply(&self, plan: CleanPlan, root: &Path, show_progress: bool) -> CleanReport {
        if plan.planned.is_empty() {
            tracing::debug!("nothing to clean under {}", root.display());
            return CleanReport::already_clean(plan.skipped);
        }

        let execution = self.execute(&plan.planned, root, show_progress);

        CleanReport {
            outcome: CleanOutcome::Cleaned,
            planned: plan.planned,
            removed: execution.removed,
            failures: execution.failures,
            skipped: plan.skipped,
            file_bytes_freed: execution.file_bytes_freed,
        }
    }

    /// Delete planned items in order, retrying each per the policy
    pub fn execute(
        &self,
        planned: &[PendingRemoval],
        root: &Path,
        show_progress: bool,
    ) -> Execution {
        let mut execution = Execution::default();

        let pb = if show_progress {
            let pb = ProgressBar::new(planned.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.red} [{bar:40.red/blue}] {pos}/{len} Removing... {msg}")
            {
                pb.set_style(style.progress_chars("━━░"));
            }
            Some(pb)
        } else {
            None
        };

        for item in planned {
            let shown = format::format_path(&item.path, root);
            if let Some(ref pb) = pb {
                pb.set_message(format::truncate(&shown, 40));
            }

            // Gone since planning (e.g. removed with a parent or by another tool)
            if std::fs::symlink_metadata(&item.path).is_err() {
                if let Some(ref pb) = pb {
                    pb.inc(1);
                }
                continue;
            }

            let result = self.policy.run(
                || remove_path(item),
                |attempt, e| {
                    tracing::warn!("could not remove {} (attempt {}): {}", shown, attempt, e);
                    if let Some(ref pb) = pb {
                        pb.println(format!(
                            "{}",
                            format!("Could not remove {}, retrying... ({})", shown, e).yellow()
                        ));
                    }
                },
            );

            match result {
                Ok(()) => {
                    tracing::debug!("removed {}", item.path.display());
                    if let Some(ref pb) = pb {
                        pb.println(format!("{}", format!("Removed: {}", shown).green()));
                    }
                    execution.file_bytes_freed += item.size.unwrap_or(0);
                    execution.removed.push(item.path.clone());
                }
                Err((e, attempts)) => {
                    if let Some(ref pb) = pb {
                        pb.println(format!(
                            "{}",
                            format!("Failed to remove {}: {}", shown, e).red()
                        ));
                    }
                    execution.failures.push(RemovalFailure {
                        path: item.path.clone(),
                        error: e.to_string(),
                        attempts,
                    });
                }
            }

            if let Some(ref pb) = pb {
                pb.inc(1);
            }
        }

        if let Some(ref pb) = pb {
            pb.finish_and_clear();
        }

        execution
    }
}

/// Collect every excluded path under `root`, in discovery order.
///
/// Top-down: in each directory, excluded subdirectories are recorded first and
/// never entered, then excluded files, then the remaining subdirectories are
/// walked. The root itself is never matched. Symlinks are not followed.
pub fn find_excluded(root: &Path, exclusions: &ExclusionSet) -> Vec<PathBuf> {
    let mut found = Vec::new();
    visit(root, exclusions, &mut found);
    found
}

fn visit(dir: &Path, exclusions: &ExclusionSet, found: &mut Vec<PathBuf>) {
    let mut matched_files = Vec::new();
    let mut descend = Vec::new();

    for entry in list_children(dir) {
        let excluded = exclusions.contains(entry.file_name());
        match (entry.file_type().is_dir(), excluded) {
            (true, true) => found.push(entry.into_path()),
            (true, false) => descend.push(entry.into_path()),
            (false, true) => matched_files.push(entry.into_path()),
            (false, false) => {}
        }
    }

    found.append(&mut matched_files);
    for sub in descend {
        visit(&sub, exclusions, found);
    }
}

/// Split matches into files and directories and order them for deletion.
///
/// Files come first, smallest to largest; directories follow in discovery
/// order. Paths whose metadata cannot be read are returned separately.
pub fn plan_removals(found: Vec<PathBuf>) -> (Vec<PendingRemoval>, Vec<PathBuf>) {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    let mut skipped = Vec::new();

    for path in found {
        match std::fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => dirs.push(PendingRemoval {
                path,
                kind: RemovalKind::Directory,
                size: None,
            }),
            Ok(meta) => files.push(PendingRemoval {
                path,
                kind: RemovalKind::File,
                size: Some(meta.len()),
            }),
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
                skipped.push(path);
            }
        }
    }

    files.sort_by_key(|f| f.size);
    files.extend(dirs);
    (files, skipped)
}

/// Single removal attempt. A path that is already gone counts as removed.
fn remove_path(item: &PendingRemoval) -> std::io::Result<()> {
    let result = match item.kind {
        RemovalKind::Directory => std::fs::remove_dir_all(&item.path),
        RemovalKind::File => std::fs::remove_file(&item.path),
    };
    match result {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
