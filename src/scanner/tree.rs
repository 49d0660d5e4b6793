use colored::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::languages::language_for;
use super::walker::count_lines;
use crate::common::fs::list_children;
use crate::common::config::ExclusionSet;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// Aggregate statistics for a project tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeStats {
    pub folders: usize,
    pub files: FileStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileStats {
    pub total: usize,
    /// Keyed by language name; ordered for stable output
    pub by_type: BTreeMap<String, LanguageStats>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub files: usize,
    pub lines: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    Directory,
    File { lines: usize },
}

/// One rendered row of the tree, below the root label
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLine {
    pub prefix: String,
    pub connector: &'static str,
    pub name: String,
    pub kind: EntryKind,
}

/// The annotated tree and its statistics, produced together but usable apart
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTree {
    pub root_label: String,
    pub lines: Vec<TreeLine>,
    pub stats: TreeStats,
}

impl ProjectTree {
    /// Tree text without color codes
    pub fn to_plain_string(&self) -> String {
        let mut out = vec![format!("{}/", self.root_label)];
        for line in &self.lines {
            out.push(match &line.kind {
                EntryKind::Directory => {
                    format!("{}{}{}/", line.prefix, line.connector, line.name)
                }
                EntryKind::File { lines } => format!(
                    "{}{}{} :: {} lines",
                    line.prefix, line.connector, line.name, lines
                ),
            });
        }
        out.join("\n")
    }

    /// Tree text with directory names and line counts highlighted
    pub fn render_colored(&self) -> String {
        let mut out = vec![format!("{}/", self.root_label.blue())];
        for line in &self.lines {
            out.push(match &line.kind {
                EntryKind::Directory => format!(
                    "{}{}{}/",
                    line.prefix,
                    line.connector,
                    line.name.bold().blue()
                ),
                EntryKind::File { lines } => format!(
                    "{}{}{} :: {} lines",
                    line.prefix,
                    line.connector,
                    line.name,
                    lines.to_string().green()
                ),
            });
        }
        out.join("\n")
    }

    pub fn stats_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.stats)
    }
}

/// Walk `root` and build its annotated tree.
///
/// Children are ordered directories first, then files, each group by
/// lowercased name. Excluded basenames are skipped without being entered.
pub fn scan(root: &Path, exclusions: &ExclusionSet) -> ProjectTree {
    let abs_root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let root_label = abs_root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut tree = ProjectTree {
        root_label,
        lines: Vec::new(),
        stats: TreeStats::default(),
    };

    process_directory(&abs_root, "", exclusions, &mut tree);
    tree
}

struct Child {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

fn process_directory(dir: &Path, prefix: &str, exclusions: &ExclusionSet, tree: &mut ProjectTree) {
    let mut children: Vec<Child> = list_children(dir)
        .into_iter()
        .filter(|e| !exclusions.contains(e.file_name()))
        .map(|e| Child {
            name: e.file_name().to_string_lossy().to_string(),
            // Follows symlinks, so a link to a directory is shown as one
            is_dir: e.path().is_dir(),
            path: e.into_path(),
        })
        .collect();

    // Anything that is not a regular file sorts with the directories
    children.sort_by_cached_key(|c| (c.path.is_file(), c.name.to_lowercase()));

    let line_counts: Vec<Option<usize>> = children
        .par_iter()
        .map(|c| (!c.is_dir).then(|| count_lines(&c.path)))
        .collect();

    let last_index = children.len().saturating_sub(1);
    for (i, (child, lines)) in children.iter().zip(line_counts).enumerate() {
        let is_last = i == last_index;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };

        match lines {
            None => {
                tree.stats.folders += 1;
                tree.lines.push(TreeLine {
                    prefix: prefix.to_string(),
                    connector,
                    name: child.name.clone(),
                    kind: EntryKind::Directory,
                });
                let extension = if is_last { SPACE_INDENT } else { PIPE_INDENT };
                process_directory(&child.path, &format!("{}{}", prefix, extension), exclusions, tree);
            }
            Some(lines) => {
                tree.stats.files.total += 1;
                if let Some(lang) = language_for(&child.path) {
                    let entry = tree.stats.files.by_type.entry(lang.to_string()).or_default();
                    entry.files += 1;
                    entry.lines += lines;
                }
                tree.lines.push(TreeLine {
                    prefix: prefix.to_string(),
                    connector,
                    name: child.name.clone(),
                    kind: EntryKind::File { lines },
                });
            }
        }
    }
}
