use colored::*;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A destination for subprocess output, one line at a time.
///
/// Lines arrive without their trailing newline; each sink adds its own.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// File behind the sink, named in errors when a write fails
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Echoes lines to stdout immediately
pub struct ConsoleSink {
    out: io::Stdout,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }

    /// Dimmed informational line, e.g. the command header
    pub fn write_dimmed(&mut self, line: &str) -> io::Result<()> {
        let mut lock = self.out.lock();
        writeln!(lock, "{}", line.dimmed())?;
        lock.flush()
    }
}

impl LineSink for ConsoleSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut lock = self.out.lock();
        writeln!(lock, "{}", line)?;
        // Flush per line so a long-running dev server shows output in real time
        lock.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Append-only log file, opened once per command run
pub struct LogSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LogSink {
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSink for LogSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// In-memory capture, used when output is inspected after the run
impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_sink_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("build.log");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "existing\n").unwrap();

        let mut sink = LogSink::open(&path).unwrap();
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();
        sink.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "existing\nfirst\nsecond\n");
    }

    #[test]
    fn test_log_sink_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/build.log");
        let mut sink = LogSink::open(&path).unwrap();
        sink.write_line("hello").unwrap();
        sink.flush().unwrap();
        assert!(path.exists());
        assert_eq!(sink.location(), Some(path.as_path()));
    }

    #[test]
    fn test_vec_sink_collects_lines() {
        let mut lines: Vec<String> = Vec::new();
        lines.write_line("a").unwrap();
        lines.write_line("b").unwrap();
        assert_eq!(lines, vec!["a", "b"]);
    }
}
