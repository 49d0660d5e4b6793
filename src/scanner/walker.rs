use std::io::{BufRead, BufReader};
use std::path::Path;

/// Count line records in a file.
///
/// `\n`, `\r\n` and a lone `\r` each end a record, plus a trailing record when
/// the file does not end in a line break. Unreadable files count as zero.
pub fn count_lines(path: &Path) -> usize {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return 0,
    };

    let mut reader = BufReader::new(file);
    let mut count = 0usize;
    let mut prev_cr = false;
    let mut last = None;

    loop {
        let buf = match reader.fill_buf() {
            Ok(b) => b,
            Err(_) => return 0,
        };
        if buf.is_empty() {
            break;
        }
        for &byte in buf {
            match byte {
                b'\r' => count += 1,
                // Second half of a \r\n pair was already counted at the \r
                b'\n' if !prev_cr => count += 1,
                _ => {}
            }
            prev_cr = byte == b'\r';
        }
        last = buf.last().copied();
        let len = buf.len();
        reader.consume(len);
    }

    if matches!(last, Some(b) if b != b'\n' && b != b'\r') {
        count += 1;
    }
    count
}
