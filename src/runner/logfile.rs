use std::io::Write;
use std::path::Path;

use crate::common::errors::{DevError, DevResult};

/// Line left at the top of a log after it has been truncated
pub const ROTATION_MARKER: &str = "Log file cleared due to size.";

/// Truncate the log if it is strictly larger than `threshold` bytes.
///
/// Returns `true` when the file was rotated. A missing log is not an error.
pub fn rotate_if_oversized(path: &Path, threshold: u64) -> DevResult<bool> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(DevError::io(path, e)),
    };

    if size <= threshold {
        return Ok(false);
    }

    let mut file = std::fs::File::create(path).map_err(|e| DevError::io(path, e))?;
    writeln!(file, "{}", ROTATION_MARKER).map_err(|e| DevError::io(path, e))?;

    tracing::debug!(
        "rotated {} ({} bytes > {} threshold)",
        path.display(),
        size,
        threshold
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_log_is_not_rotated() {
        let dir = TempDir::new().unwrap();
        let rotated = rotate_if_oversized(&dir.path().join("build.log"), 10).unwrap();
        assert!(!rotated);
        assert!(!dir.path().join("build.log").exists());
    }

    #[test]
    fn test_small_threshold_rotation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.log");
        std::fs::write(&path, "0123456789A").unwrap(); // 11 bytes

        assert!(rotate_if_oversized(&path, 10).unwrap());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, format!("{}\n", ROTATION_MARKER));
    }

    #[test]
    fn test_exact_threshold_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.log");
        std::fs::write(&path, "0123456789").unwrap(); // 10 bytes

        assert!(!rotate_if_oversized(&path, 10).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0123456789");
    }
}
