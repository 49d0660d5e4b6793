use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the per-project config file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "devcycle.toml";

/// Rotation threshold for the build log (5 MiB)
pub const DEFAULT_LOG_ROTATE_BYTES: u64 = 5 * 1024 * 1024;

/// Global devcycle configuration.
///
/// Built once at startup and passed by reference into every component.
/// Every key is optional in `devcycle.toml`; missing keys take the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Basenames never traversed by `tree` and always removed by `clean`
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Executable names treated as lingering dev servers
    #[serde(default = "default_lingering_processes")]
    pub lingering_processes: Vec<String>,

    /// PID marker file, relative to the project root
    #[serde(default = "default_pid_file")]
    pub pid_file: PathBuf,

    /// Build log, relative to the project root
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Log is truncated at build time once it grows past this many bytes
    #[serde(default = "default_log_rotate_bytes")]
    pub log_rotate_bytes: u64,

    /// Directory whose presence means dependencies are installed
    #[serde(default = "default_deps_marker")]
    pub deps_marker: PathBuf,

    /// Files a successful build must leave behind
    #[serde(default = "default_artifacts")]
    pub artifacts: Vec<PathBuf>,

    /// Package manager executable (differs by platform)
    #[serde(default = "default_package_manager")]
    pub package_manager: String,

    #[serde(default = "default_install_args")]
    pub install_args: Vec<String>,

    #[serde(default = "default_build_args")]
    pub build_args: Vec<String>,

    #[serde(default = "default_dev_args")]
    pub dev_args: Vec<String>,

    /// Attempts per removal before an item is skipped
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Pause between removal attempts
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Pause after stopping servers so the OS can release file handles
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_exclude() -> Vec<String> {
    [
        // general
        "build.log",
        ".vscode",
        "dox",
        // python
        "__pycache__",
        "venv",
        // js
        ".svelte-kit",
        "dist",
        "node_modules",
        "package-lock.json",
        // rust
        "target",
        "Cargo.lock",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_lingering_processes() -> Vec<String> {
    let names: &[&str] = if cfg!(windows) {
        &["electron.exe", "node.exe", "electronmon.exe", "vite.exe"]
    } else {
        &["electron", "node", "electronmon", "vite"]
    };
    names.iter().map(|s| s.to_string()).collect()
}

fn default_pid_file() -> PathBuf {
    PathBuf::from(".pids.json")
}
fn default_log_file() -> PathBuf {
    PathBuf::from("build.log")
}
fn default_log_rotate_bytes() -> u64 {
    DEFAULT_LOG_ROTATE_BYTES
}
fn default_deps_marker() -> PathBuf {
    PathBuf::from("node_modules")
}
fn default_artifacts() -> Vec<PathBuf> {
    vec![PathBuf::from("dist/main/preload.js")]
}
fn default_package_manager() -> String {
    if cfg!(windows) {
        "npm.cmd".to_string()
    } else {
        "npm".to_string()
    }
}
fn default_install_args() -> Vec<String> {
    vec!["install".to_string()]
}
fn default_build_args() -> Vec<String> {
    vec!["run".to_string(), "build".to_string()]
}
fn default_dev_args() -> Vec<String> {
    vec!["run".to_string(), "dev".to_string()]
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    2000
}
fn default_settle_delay_ms() -> u64 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            lingering_processes: default_lingering_processes(),
            pid_file: default_pid_file(),
            log_file: default_log_file(),
            log_rotate_bytes: default_log_rotate_bytes(),
            deps_marker: default_deps_marker(),
            artifacts: default_artifacts(),
            package_manager: default_package_manager(),
            install_args: default_install_args(),
            build_args: default_build_args(),
            dev_args: default_dev_args(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl Config {
    /// User-level fallback config (~/.config/devcycle/config.toml on Linux)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("devcycle").join("config.toml"))
    }

    /// Load config for a project.
    ///
    /// Lookup order: the explicit path if given, `<root>/devcycle.toml`,
    /// then the user-level config. Falls back to defaults when none exist.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let project = root.join(CONFIG_FILE_NAME);
        if project.exists() {
            return Self::load_from(&project);
        }

        match Self::user_config_path() {
            Some(user) if user.exists() => Self::load_from(&user),
            _ => Ok(Config::default()),
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    pub fn exclusions(&self) -> ExclusionSet {
        ExclusionSet::new(self.exclude.iter().cloned())
    }

    pub fn log_path(&self, root: &Path) -> PathBuf {
        root.join(&self.log_file)
    }

    pub fn pid_path(&self, root: &Path) -> PathBuf {
        root.join(&self.pid_file)
    }

    pub fn deps_marker_path(&self, root: &Path) -> PathBuf {
        root.join(&self.deps_marker)
    }

    pub fn artifact_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.artifacts.iter().map(|a| root.join(a)).collect()
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Full argv for the dependency install
    pub fn install_command(&self) -> Vec<String> {
        self.argv(&self.install_args)
    }

    /// Full argv for the production build
    pub fn build_command(&self) -> Vec<String> {
        self.argv(&self.build_args)
    }

    /// Full argv for the dev server
    pub fn dev_command(&self) -> Vec<String> {
        self.argv(&self.dev_args)
    }

    fn argv(&self, args: &[String]) -> Vec<String> {
        std::iter::once(self.package_manager.clone())
            .chain(args.iter().cloned())
            .collect()
    }
}

/// Basenames matched exactly at every level of a tree walk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact basename match; never compares full paths
    pub fn contains(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.names.contains(n))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
