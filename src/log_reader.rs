use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

/// Read a log file into its lines, in file order.
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path.as_ref())?;
    read_lines(BufReader::new(file))
}

/// Read all lines from any buffered source. Line terminators (`\n` or
/// `\r\n`) are stripped; blank lines are kept so positions stay stable.
pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let mut line = line?;
        if line.ends_with('\r') {
            line.pop();
        }
        lines.push(line);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_strips_crlf() {
        let lines = read_lines(Cursor::new("a\r\nb\n\nc")).unwrap();
        assert_eq!(lines, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_read_log_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "registration_request").unwrap();
        writeln!(file, "registration_complete").unwrap();

        let lines = read_log(file.path()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "registration_complete");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_log("/nonexistent/amf.log").unwrap_err();
        assert!(matches!(err, crate::error::KpiError::Io(_)));
    }
}
