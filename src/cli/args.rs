use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// devcycle: clean, build, and run an Electron/SvelteKit project
#[derive(Parser, Debug)]
#[command(
    name = "devcycle",
    version,
    about = "A utility for managing your Electron/SvelteKit project",
    long_about = "devcycle wraps the npm build and dev commands of an Electron/SvelteKit\n\
                  project: clean artifacts, stop lingering dev servers, reinstall\n\
                  dependencies, build for production, and run the dev server.",
    after_help = "EXAMPLES:\n  \
        devcycle --tree                  Show the file tree with statistics\n  \
        devcycle --clean                 Remove build artifacts and dependencies\n  \
        devcycle --deps                  Clean and reinstall dependencies\n  \
        devcycle --build                 Production build with artifact check\n  \
        devcycle --init                  Stop, install, build, then start dev\n  \
        devcycle --root ../app --stop    Stop dev servers for another project"
)]
pub struct Cli {
    /// Display the project's file tree with statistics
    #[arg(short = 't', long)]
    pub tree: bool,

    /// Clean all build artifacts and dependencies
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Stop any running development servers
    #[arg(short = 'x', long)]
    pub stop: bool,

    /// Clean and reinstall all npm dependencies
    #[arg(short = 'f', long)]
    pub deps: bool,

    /// Build the project for production
    #[arg(short = 'b', long)]
    pub build: bool,

    /// Start the live development server
    #[arg(short = 'd', long)]
    pub dev: bool,

    /// Initialize the project fully (stop, deps, build, dev)
    #[arg(short = 'i', long)]
    pub init: bool,

    /// Project root
    #[arg(long, global = true, value_name = "DIR", default_value = ".", env = "DEVCYCLE_ROOT")]
    pub root: PathBuf,

    /// Config file (defaults to <root>/devcycle.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// With --tree, print only the statistics as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<CompletionShell>,
}

/// The operation selected by the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Tree,
    Clean,
    Stop,
    Deps,
    Build,
    Dev,
    Init,
}

impl Cli {
    /// First set flag wins, in the order tree, clean, stop, deps, build, dev, init
    pub fn action(&self) -> Option<Action> {
        [
            (self.tree, Action::Tree),
            (self.clean, Action::Clean),
            (self.stop, Action::Stop),
            (self.deps, Action::Deps),
            (self.build, Action::Build),
            (self.dev, Action::Dev),
            (self.init, Action::Init),
        ]
        .into_iter()
        .find_map(|(set, action)| set.then_some(action))
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_no_action() {
        let cli = Cli::parse_from(["devcycle"]);
        assert_eq!(cli.action(), None);
    }

    #[test]
    fn test_first_match_wins() {
        let cli = Cli::parse_from(["devcycle", "--init", "--build"]);
        assert_eq!(cli.action(), Some(Action::Build));

        let cli = Cli::parse_from(["devcycle", "-i", "-t"]);
        assert_eq!(cli.action(), Some(Action::Tree));
    }

    #[test]
    fn test_short_flags() {
        assert_eq!(Cli::parse_from(["devcycle", "-x"]).action(), Some(Action::Stop));
        assert_eq!(Cli::parse_from(["devcycle", "-f"]).action(), Some(Action::Deps));
        assert_eq!(Cli::parse_from(["devcycle", "-d"]).action(), Some(Action::Dev));
    }

    #[test]
    fn test_root_option() {
        let cli = Cli::parse_from(["devcycle", "--root", "/tmp/app", "-c"]);
        assert_eq!(cli.root, PathBuf::from("/tmp/app"));
        assert_eq!(cli.action(), Some(Action::Clean));
    }
}
