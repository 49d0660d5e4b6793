use std::process::Command;

/// Whether this platform can terminate processes by name at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Supported,
    Unsupported,
}

/// Result of one terminate-by-name attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminateOutcome {
    Terminated,
    NotRunning,
    Failed(String),
}

/// Forced termination of processes by executable name.
///
/// `probe` is called once when a controller is built; `terminate_by_name`
/// is only called when the probe reported `Supported`.
pub trait ProcessTerminator {
    /// Tool used, for messages
    fn tool(&self) -> &str;

    fn probe(&self) -> Capability;

    fn terminate_by_name(&self, process: &str) -> TerminateOutcome;
}

/// POSIX: sends SIGKILL to every process whose name matches exactly
pub struct PkillTerminator;

impl ProcessTerminator for PkillTerminator {
    fn tool(&self) -> &str {
        "pkill"
    }

    fn probe(&self) -> Capability {
        probe_tool(self.tool())
    }

    fn terminate_by_name(&self, process: &str) -> TerminateOutcome {
        // pkill: 0 = signalled, 1 = nothing matched
        run_tool(self.tool(), &["-KILL", "-x", process], 1)
    }
}

/// Windows: forced kill by image name
pub struct TaskkillTerminator;

impl ProcessTerminator for TaskkillTerminator {
    fn tool(&self) -> &str {
        "taskkill"
    }

    fn probe(&self) -> Capability {
        probe_tool(self.tool())
    }

    fn terminate_by_name(&self, process: &str) -> TerminateOutcome {
        // taskkill: 128 = no process with that image name
        run_tool(self.tool(), &["/F", "/IM", process], 128)
    }
}

/// The terminator for the platform we were built for
pub fn platform_terminator() -> Box<dyn ProcessTerminator> {
    if cfg!(windows) {
        Box::new(TaskkillTerminator)
    } else {
        Box::new(PkillTerminator)
    }
}

fn probe_tool(tool: &str) -> Capability {
    match which::which(tool) {
        Ok(path) => {
            tracing::debug!("process termination via {}", path.display());
            Capability::Supported
        }
        Err(_) => Capability::Unsupported,
    }
}

fn run_tool(tool: &str, args: &[&str], not_running_code: i32) -> TerminateOutcome {
    let output = match Command::new(tool).args(args).output() {
        Ok(o) => o,
        Err(e) => return TerminateOutcome::Failed(e.to_string()),
    };

    match output.status.code() {
        Some(0) => TerminateOutcome::Terminated,
        Some(code) if code == not_running_code => TerminateOutcome::NotRunning,
        code => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            TerminateOutcome::Failed(if stderr.is_empty() {
                format!("{} exited with {:?}", tool, code)
            } else {
                stderr
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_pkill_unknown_process_is_not_running() {
        let terminator = PkillTerminator;
        if terminator.probe() == Capability::Unsupported {
            return;
        }
        let outcome = terminator.terminate_by_name("dcyc-none");
        assert_eq!(outcome, TerminateOutcome::NotRunning);
    }

    #[test]
    fn test_missing_tool_fails_softly() {
        let outcome = run_tool("devcycle-no-such-tool", &[], 1);
        assert!(matches!(outcome, TerminateOutcome::Failed(_)));
    }
}
