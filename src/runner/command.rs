use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::sink::{ConsoleSink, LineSink, LogSink};
use crate::common::errors::{DevError, DevResult};

/// An external command: program plus arguments
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Build from a full argv; `None` when argv is empty
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Space-joined form used in headers and diagnostics
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs external commands, mirroring their output to the console and a log file
#[derive(Debug, Clone)]
pub struct CommandRunner {
    log_path: PathBuf,
}

impl CommandRunner {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Run a command to completion.
    ///
    /// Every output line is appended to the log. When `show_output` is set the
    /// same lines are echoed to stdout as they are produced.
    pub fn run(&self, command: &CommandSpec, cwd: &Path, show_output: bool) -> DevResult<()> {
        let mut log = LogSink::open(&self.log_path).map_err(|e| DevError::io(&self.log_path, e))?;
        let header = format!("--- Running Command: {} ---", command.display());

        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        log.write_line("")
            .and_then(|_| log.write_line(&format!("{} [{}]", header, stamp)))
            .map_err(|e| DevError::io(log.path(), e))?;

        let mut console = ConsoleSink::stdout();
        if show_output {
            let _ = console.write_dimmed(&header);
        }

        let result = if show_output {
            run_with_sinks(command, cwd, &mut [&mut log, &mut console])
        } else {
            run_with_sinks(command, cwd, &mut [&mut log])
        };

        log.flush().map_err(|e| DevError::io(log.path(), e))?;
        result
    }
}

/// Spawn `command` with stdout and stderr sharing one pipe, and hand each line to every sink in order.
///
/// Both streams of the child write into the same pipe, so lines reach the
/// sinks interleaved exactly as the child produced them. A sink failure does
/// not stop the drain; the first one is reported after the child exits.
pub fn run_with_sinks(
    command: &CommandSpec,
    cwd: &Path,
    sinks: &mut [&mut dyn LineSink],
) -> DevResult<()> {
    if !cwd.is_dir() {
        return Err(DevError::io(
            cwd,
            io::Error::new(io::ErrorKind::NotFound, "working directory does not exist"),
        ));
    }

    tracing::debug!("spawning `{}` in {}", command.display(), cwd.display());

    let (reader, stdout_writer) = io::pipe().map_err(|e| DevError::io(cwd, e))?;
    let stderr_writer = stdout_writer
        .try_clone()
        .map_err(|e| DevError::io(cwd, e))?;

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(stdout_writer)
        .stderr(stderr_writer);
    let spawned = cmd.spawn();
    // Our copies of the write end must close or the read loop never sees EOF
    drop(cmd);

    let mut child = spawned.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DevError::CommandNotFound {
            program: command.program.clone(),
        },
        _ => DevError::io(PathBuf::from(&command.program), e),
    })?;

    let mut sink_error: Option<(usize, io::Error)> = None;
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = decode_line(&buf);
                for (index, sink) in sinks.iter_mut().enumerate() {
                    if let Err(e) = sink.write_line(&line) {
                        sink_error.get_or_insert((index, e));
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!("stopped reading output of `{}`: {}", command.display(), e);
                break;
            }
        }
    }

    let status = child
        .wait()
        .map_err(|e| DevError::io(PathBuf::from(&command.program), e))?;

    for (index, sink) in sinks.iter_mut().enumerate() {
        if let Err(e) = sink.flush() {
            sink_error.get_or_insert((index, e));
        }
    }

    if !status.success() {
        return Err(DevError::CommandFailed {
            command: command.display(),
            code: status.code(),
        });
    }

    match sink_error {
        Some((index, e)) => {
            let location = sinks[index]
                .location()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("<stdout>"));
            Err(DevError::io(location, e))
        }
        None => Ok(()),
    }
}

/// Lossy UTF-8 decode with the trailing line terminator removed
fn decode_line(raw: &[u8]) -> String {
    let mut line = String::from_utf8_lossy(raw).into_owned();
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
