use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cleaner::{CleanReport, Cleaner};
use crate::cli::output;
use crate::common::config::Config;
use crate::common::errors::{DevError, DevResult};
use crate::common::format;
use crate::runner::{rotate_if_oversized, CommandRunner, CommandSpec};
use crate::server::{ServerController, StopReport};

/// Where the project stands in the stop → install → build → dev sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Stopped,
    DependenciesChecked,
    Built,
    DevRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The dependency marker already existed; nothing was run
    AlreadyInstalled,
    Installed,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub log_rotated: bool,
    pub duration_secs: f64,
}

/// Sequences the project lifecycle stages for one project root
pub struct Orchestrator<'a> {
    root: PathBuf,
    config: &'a Config,
    runner: CommandRunner,
    server: ServerController,
    cleaner: Cleaner,
    show_output: bool,
    interrupted: Arc<AtomicBool>,
    stage: Option<Stage>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(root: &Path, config: &'a Config, show_output: bool) -> Self {
        Self::with_server(root, config, ServerController::new(config, root), show_output)
    }

    pub fn with_server(
        root: &Path,
        config: &'a Config,
        server: ServerController,
        show_output: bool,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            runner: CommandRunner::new(config.log_path(root)),
            server,
            cleaner: Cleaner::new(config),
            show_output,
            interrupted: Arc::new(AtomicBool::new(false)),
            stage: None,
        }
    }

    /// Shared flag an interrupt handler sets; checked between and after stages
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.interrupted.clone()
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn log_path(&self) -> &Path {
        self.runner.log_path()
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!("stage {:?} -> {:?}", self.stage, stage);
        self.stage = Some(stage);
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// A failure that happened because the operator hit Ctrl-C is reported as such
    fn settle<T>(&self, result: DevResult<T>) -> DevResult<T> {
        match result {
            _ if self.is_interrupted() => Err(DevError::Interrupted),
            other => other,
        }
    }

    pub fn stop(&mut self) -> StopReport {
        let report = self.server.stop(self.show_output);
        self.enter(Stage::Stopped);
        report
    }

    pub fn clean(&mut self) -> CleanReport {
        let plan = self.cleaner.prepare(&self.root, &self.server, self.show_output);
        if self.show_output && !plan.planned.is_empty() {
            output::print_removal_plan(&plan.planned, &self.root);
        }
        let report = self.cleaner.apply(plan, &self.root, self.show_output);
        self.enter(Stage::Stopped);
        report
    }

    /// Install dependencies unless the marker directory already exists.
    ///
    /// Installer output goes to the log only; a spinner stands in for it.
    pub fn install(&mut self) -> DevResult<InstallOutcome> {
        let marker = self.config.deps_marker_path(&self.root);
        if marker.exists() {
            if self.show_output {
                println!(
                    "{}",
                    "Dependencies already exist. Skipping install.".green()
                );
            }
            self.enter(Stage::DependenciesChecked);
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        let command = self.command(&self.config.install_command())?;

        let spinner = if self.show_output {
            println!(
                "{}",
                "Dependencies not found. Installing... (this may take a moment)".cyan()
            );
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg} {elapsed}") {
                pb.set_style(style);
            }
            pb.set_message(command.display());
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };

        let result = self.runner.run(&command, &self.root, false);
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        self.settle(result)?;

        if self.show_output {
            println!("{}", "Dependencies installed successfully.".green());
        }
        self.enter(Stage::DependenciesChecked);
        Ok(InstallOutcome::Installed)
    }

    /// Clean everything, then install from scratch
    pub fn force_reinstall(&mut self) -> DevResult<(CleanReport, InstallOutcome)> {
        if self.show_output {
            format::print_banner("Force Reinstalling Dependencies");
        }
        let report = self.clean();
        if self.show_output {
            output::print_clean_report(&report, &self.root);
        }
        let outcome = self.install()?;
        Ok((report, outcome))
    }

    /// Production build, verified by the presence of every expected artifact.
    ///
    /// A zero exit code alone is not success: the bundler can exit cleanly
    /// after a compile error that left an artifact unwritten.
    pub fn build(&mut self) -> DevResult<BuildReport> {
        if self.show_output {
            println!("{}", "Building project for production...".cyan());
        }

        let log_rotated = rotate_if_oversized(self.runner.log_path(), self.config.log_rotate_bytes)?;

        let command = self.command(&self.config.build_command())?;
        let started = Instant::now();
        let result = self.runner.run(&command, &self.root, self.show_output);
        self.settle(result)?;

        for artifact in self.config.artifact_paths(&self.root) {
            if !artifact.exists() {
                if self.show_output {
                    output::print_missing_artifact(&artifact, &self.root, self.runner.log_path());
                }
                return Err(DevError::ArtifactMissing { path: artifact });
            }
        }

        let duration_secs = started.elapsed().as_secs_f64();
        if self.show_output {
            println!(
                "{} {}",
                "Production build completed successfully.".green(),
                format!("({})", format::format_duration(duration_secs)).dimmed()
            );
        }
        self.enter(Stage::Built);
        Ok(BuildReport {
            log_rotated,
            duration_secs,
        })
    }

    /// Run the dev server in the foreground until it exits or is interrupted
    pub fn dev_start(&mut self) -> DevResult<()> {
        if self.show_output {
            println!();
            format::print_banner("Starting Development Environment");
            println!("{}", "The server is now running and watching for file changes.".yellow());
            println!("{}", "Press Ctrl+C in this terminal to stop the server.".yellow());
        }

        let command = self.command(&self.config.dev_command())?;
        self.enter(Stage::DevRunning);
        let result = self.runner.run(&command, &self.root, self.show_output);
        let result = self.settle(result);

        if self.show_output {
            println!();
            println!("{}", "Development server process ended.".green());
        }
        result
    }

    /// stop → install → build → dev, aborting at the first failure.
    ///
    /// An interrupt at any point triggers a best-effort stop before
    /// `Interrupted` is returned.
    pub fn init(&mut self) -> DevResult<()> {
        if self.show_output {
            println!("{}", "--- Initiating Full Project Setup ---".bold().magenta());
        }

        let result = self.init_chain();
        if let Err(DevError::Interrupted) = result {
            if self.show_output {
                println!();
                println!(
                    "{}",
                    "Interrupt detected. Stopping development servers...".yellow()
                );
            }
            self.stop();
        }
        result
    }

    fn init_chain(&mut self) -> DevResult<()> {
        self.stop();
        self.settle(Ok(()))?;
        self.install()?;
        self.build()?;
        self.dev_start()
    }

    fn command(&self, argv: &[String]) -> DevResult<CommandSpec> {
        CommandSpec::from_argv(argv)
            .filter(|spec| !spec.program.is_empty())
            .ok_or_else(|| DevError::Config {
            path: self.root.join(crate::common::config::CONFIG_FILE_NAME),
            message: "package_manager must not be empty".to_string(),
        })
    }
}
