use std::path::PathBuf;

/// Typed failures for devcycle operations.
/// We use `anyhow` at the top level for CLI error handling,
/// but stages return these so callers can branch on the kind.
#[derive(Debug, thiserror::Error)]
pub enum DevError {
    /// The executable could not be located or spawned
    #[error("Command '{program}' not found. Is it in your PATH?")]
    CommandNotFound { program: String },

    /// The command ran but exited unsuccessfully
    #[error("Error running command: {command}. Return code: {}", display_code(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// A build finished without producing an expected file
    #[error("Build process failed to create critical file: {}", .path.display())]
    ArtifactMissing { path: PathBuf },

    /// The operator cancelled a running stage
    #[error("Interrupted by user")]
    Interrupted,

    /// File system operation failed
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is invalid
    #[error("Config error in '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl DevError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DevError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure came from the external toolchain (as opposed to our own I/O)
    pub fn is_command_failure(&self) -> bool {
        matches!(
            self,
            DevError::CommandNotFound { .. } | DevError::CommandFailed { .. }
        )
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "terminated by signal".to_string(),
    }
}

pub type DevResult<T> = std::result::Result<T, DevError>;
