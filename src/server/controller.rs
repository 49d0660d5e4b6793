use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::terminator::{platform_terminator, Capability, ProcessTerminator, TerminateOutcome};
use crate::common::config::Config;

/// Stops lingering dev servers and clears the PID marker
pub struct ServerController {
    processes: Vec<String>,
    pid_file: PathBuf,
    settle_delay: Duration,
    terminator: Box<dyn ProcessTerminator>,
    capability: Capability,
}

/// What a stop pass did
#[derive(Debug, Clone)]
pub struct StopReport {
    pub capability: Capability,
    pub attempts: Vec<(String, TerminateOutcome)>,
    pub pid_file_removed: bool,
}

impl StopReport {
    pub fn terminated(&self) -> impl Iterator<Item = &str> {
        self.attempts
            .iter()
            .filter(|(_, o)| *o == TerminateOutcome::Terminated)
            .map(|(name, _)| name.as_str())
    }
}

impl ServerController {
    /// Controller using the platform's termination tool
    pub fn new(config: &Config, root: &Path) -> Self {
        Self::with_terminator(config, root, platform_terminator())
    }

    /// Controller with an explicit terminator. The capability is probed here, once.
    pub fn with_terminator(
        config: &Config,
        root: &Path,
        terminator: Box<dyn ProcessTerminator>,
    ) -> Self {
        let capability = terminator.probe();
        if capability == Capability::Unsupported {
            tracing::debug!(
                "{} not available; process termination disabled",
                terminator.tool()
            );
        }
        Self {
            processes: config.lingering_processes.clone(),
            pid_file: config.pid_path(root),
            settle_delay: config.settle_delay(),
            terminator,
            capability,
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn pid_file(&self) -> &Path {
        &self.pid_file
    }

    /// Best-effort stop. Never fails the caller.
    ///
    /// Terminates every registered process name, removes the PID marker,
    /// then waits the settle delay so file handles are released before any
    /// following filesystem work.
    pub fn stop(&self, show_progress: bool) -> StopReport {
        if show_progress {
            println!("{}", "Stopping any running development servers...".cyan());
        }

        let mut attempts = Vec::new();
        match self.capability {
            Capability::Supported => {
                for name in &self.processes {
                    let outcome = self.terminator.terminate_by_name(name);
                    match &outcome {
                        TerminateOutcome::Failed(reason) => {
                            tracing::debug!("could not terminate {}: {}", name, reason)
                        }
                        other => tracing::debug!("{}: {:?}", name, other),
                    }
                    if show_progress {
                        println!("{}", format!("Attempted forced shutdown of {}", name).dimmed());
                    }
                    attempts.push((name.clone(), outcome));
                }
            }
            Capability::Unsupported => {
                if show_progress && !self.processes.is_empty() {
                    println!(
                        "{}",
                        format!(
                            "'{}' is not available; skipping process termination",
                            self.terminator.tool()
                        )
                        .dimmed()
                    );
                }
            }
        }

        let pid_file_removed = match std::fs::remove_file(&self.pid_file) {
            Ok(()) => {
                tracing::debug!("removed {}", self.pid_file.display());
                true
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("could not remove {}: {}", self.pid_file.display(), e);
                }
                false
            }
        };

        if show_progress {
            println!("{}", "Waiting for processes to terminate fully...".cyan());
        }
        std::thread::sleep(self.settle_delay);

        StopReport {
            capability: self.capability,
            attempts,
            pid_file_removed,
        }
    }
}
