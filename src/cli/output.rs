use colored::*;
use std::path::Path;

use crate::cleaner::{CleanOutcome, CleanReport, PendingRemoval, RemovalKind};
use crate::common::errors::DevError;
use crate::common::format::{self, format_path, format_size};
use crate::scanner::ProjectTree;
use crate::server::{Capability, StopReport};

/// Print the tree command output: statistics as JSON, then the tree
pub fn print_tree(tree: &ProjectTree, stats_only: bool) {
    match tree.stats_json() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing statistics: {}", e),
    }
    if !stats_only {
        println!("{}", tree.render_colored());
    }
}

/// List what a clean pass is about to remove
pub fn print_removal_plan(planned: &[PendingRemoval], root: &Path) {
    println!(
        "{}",
        "The following items will be removed (files first, then folders):".yellow()
    );
    for item in planned {
        match item.kind {
            RemovalKind::File => println!(
                "  - {} {}",
                format_path(&item.path, root),
                format!("({})", format_size(item.size.unwrap_or(0))).dimmed()
            ),
            RemovalKind::Directory => {
                println!("  - {}/", format_path(&item.path, root))
            }
        }
    }
}

/// Print a clean operation report
pub fn print_clean_report(report: &CleanReport, root: &Path) {
    if report.outcome == CleanOutcome::AlreadyClean {
        println!("{}", "Project is already clean. No items to remove.".green());
        return;
    }

    println!(
        "{} {} {}",
        "✓".green(),
        format!("Removed {}", format::format_count(report.removed.len(), "item")).bold(),
        format!("({} in files)", format_size(report.file_bytes_freed)).dimmed()
    );

    if !report.failures.is_empty() {
        println!(
            "  {} {}",
            "⚠".yellow(),
            format!("{} could not be removed:", format::format_count(report.failures.len(), "item"))
                .yellow()
        );
        for failure in report.failures.iter().take(10) {
            println!(
                "    {} {} {}",
                "→".dimmed(),
                format_path(&failure.path, root),
                format!(
                    "({} after {})",
                    failure.error,
                    format::format_count(failure.attempts as usize, "attempt")
                )
                .dimmed()
            );
        }
        if report.failures.len() > 10 {
            println!(
                "    ... and {} more",
                (report.failures.len() - 10).to_string().dimmed()
            );
        }
    }

    if !report.skipped.is_empty() {
        println!(
            "  {} {}",
            "⚠".yellow(),
            format!("{} skipped (unreadable)", format::format_count(report.skipped.len(), "item"))
                .dimmed()
        );
    }
}

/// Summarize a stop pass
pub fn print_stop_report(report: &StopReport) {
    let terminated: Vec<&str> = report.terminated().collect();
    if report.capability == Capability::Unsupported {
        println!("{}", "Process termination is not supported on this system.".dimmed());
    } else if terminated.is_empty() {
        println!("{}", "No lingering development servers were running.".green());
    } else {
        println!(
            "{} {}",
            "✓".green(),
            format!("Stopped: {}", terminated.join(", ")).bold()
        );
    }
    if report.pid_file_removed {
        println!("{}", "Removed stale PID file.".dimmed());
    }
}

/// Explain a build that exited cleanly but left an artifact unwritten
pub fn print_missing_artifact(artifact: &Path, root: &Path, log_path: &Path) {
    let name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| format_path(artifact, root));
    println!(
        "{}",
        format!("CRITICAL ERROR: '{}' was not created by the build process.", name)
            .red()
            .bold()
    );
    println!(
        "{}",
        format!(
            "Please check '{}' for compilation errors.",
            log_path.display()
        )
        .yellow()
    );
}

/// Print a fatal stage failure, pointing at the log where relevant
pub fn print_fatal(context: &str, err: &DevError, log_path: &Path) {
    eprintln!();
    eprintln!("{}", format!("{}: {}", context, err).red());
    if err.is_command_failure() || matches!(err, DevError::ArtifactMissing { .. }) {
        eprintln!(
            "{}",
            format!("Check '{}' for the complete log.", log_path.display()).yellow()
        );
    }
}
