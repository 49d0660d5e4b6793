use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use devcycle::cli::args::{Action, Cli, CompletionShell};
use devcycle::cli::output;
use devcycle::common::config::Config;
use devcycle::common::errors::DevError;
use devcycle::lifecycle::Orchestrator;
use devcycle::scanner;

/// Exit status after an operator interrupt (128 + SIGINT)
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose);

    if let Some(shell) = cli.completions.clone() {
        let mut cmd = Cli::command();
        let shell = match shell {
            CompletionShell::Bash => clap_complete::Shell::Bash,
            CompletionShell::Zsh => clap_complete::Shell::Zsh,
            CompletionShell::Fish => clap_complete::Shell::Fish,
        };
        clap_complete::generate(shell, &mut cmd, "devcycle", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    let Some(action) = cli.action() else {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    match run(&cli, action) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "devcycle=debug" } else { "devcycle=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, action: Action) -> Result<ExitCode> {
    if !cli.root.is_dir() {
        anyhow::bail!("Project root does not exist: {}", cli.root.display());
    }
    let root = std::path::absolute(&cli.root)
        .with_context(|| format!("Failed to resolve project root: {}", cli.root.display()))?;
    let config = Config::load(&root, cli.config.as_deref())?;
    let show = !cli.quiet;

    // ─── Tree ─────────────────────────────────────────────────────────────────
    if action == Action::Tree {
        let tree = scanner::scan(&root, &config.exclusions());
        output::print_tree(&tree, cli.json);
        return Ok(ExitCode::SUCCESS);
    }

    let mut orchestrator = Orchestrator::new(&root, &config, show);

    if matches!(action, Action::Dev | Action::Init) {
        let flag = orchestrator.interrupt_flag();
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("Failed to install Ctrl-C handler")?;
    }

    let log_path = orchestrator.log_path().to_path_buf();
    let fatal = |context: &str, err: DevError| -> ExitCode {
        if matches!(err, DevError::Interrupted) {
            return ExitCode::from(EXIT_INTERRUPTED);
        }
        output::print_fatal(context, &err, &log_path);
        ExitCode::FAILURE
    };

    let code = match action {
        Action::Tree => ExitCode::SUCCESS,

        // ─── Clean ────────────────────────────────────────────────────────────
        Action::Clean => {
            let report = orchestrator.clean();
            if show {
                output::print_clean_report(&report, &root);
            }
            ExitCode::SUCCESS
        }

        // ─── Stop ─────────────────────────────────────────────────────────────
        Action::Stop => {
            let report = orchestrator.stop();
            if show {
                output::print_stop_report(&report);
            }
            ExitCode::SUCCESS
        }

        // ─── Deps ─────────────────────────────────────────────────────────────
        Action::Deps => match orchestrator.force_reinstall() {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => fatal("Dependency install failed", e),
        },

        // ─── Build ────────────────────────────────────────────────────────────
        Action::Build => match orchestrator.build() {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => fatal("Build failed", e),
        },

        // ─── Dev ──────────────────────────────────────────────────────────────
        Action::Dev => match orchestrator.dev_start() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fatal("Development server failed", e),
        },

        // ─── Init ─────────────────────────────────────────────────────────────
        Action::Init => match orchestrator.init() {
            Ok(()) => {
                if show {
                    println!("{}", "--- Project setup complete. Happy coding! ---".bold().green());
                }
                ExitCode::SUCCESS
            }
            Err(e) => fatal("Project initialization failed", e),
        },
    };

    Ok(code)
}
