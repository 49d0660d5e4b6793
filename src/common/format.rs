use bytesize::ByteSize;
use colored::*;
use std::path::Path;

/// Format bytes into human-readable size string
pub fn format_size(bytes: u64) -> String {
    ByteSize(bytes).to_string()
}

/// Format item count with appropriate plural
pub fn format_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Format a path relative to the project root when possible
pub fn format_path(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(stripped) if !stripped.as_os_str().is_empty() => stripped.display().to_string(),
        _ => path.display().to_string(),
    }
}

/// Format duration in human-readable form
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    }
}

/// Print a banner line, e.g. `--- Starting Development Environment ---`
pub fn print_banner(title: &str) {
    println!("{}", format!("--- {} ---", title).bold().cyan());
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0, "item"), "0 items");
        assert_eq!(format_count(1, "item"), "1 item");
        assert_eq!(format_count(42, "file"), "42 files");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.5), "500ms");
        assert_eq!(format_duration(3.7), "3.7s");
        assert_eq!(format_duration(125.0), "2m 5s");
    }

    #[test]
    fn test_format_path_relative_to_root() {
        let root = Path::new("/work/app");
        assert_eq!(format_path(Path::new("/work/app/dist"), root), "dist");
        assert_eq!(format_path(Path::new("/other/x"), root), "/other/x");
        assert_eq!(format_path(root, root), "/work/app");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("abcd", 3), "...");
    }

    #[test]
    fn test_format_size_nonempty() {
        assert!(format_size(0).contains('0'));
        assert!(format_size(5 * 1024 * 1024).contains("MiB") || format_size(5 * 1024 * 1024).contains("MB"));
    }
}
