use crate::error::{CoverageError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Read a whole report file into memory.
///
/// # Parameters
/// - `path`: the report file (CSV or XML).
///
/// # Returns
/// - `Ok(String)` with the file contents.
/// - `Err(FileNotFound)` if nothing exists at `path`.
/// - `Err(FileNotReadable)` if `path` is a directory or the read fails.
/// - `Err(InvalidFormat)` if the file is not valid UTF-8.
pub fn read_report(path: &Path) -> Result<String> {
    ensure_readable_file(path)?;
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => CoverageError::InvalidFormat {
            file: Some(path.to_path_buf()),
            line: None,
            context: "Report is not valid UTF-8".to_string(),
            source: Some(Box::new(e)),
        },
        io::ErrorKind::NotFound => CoverageError::file_not_found(path),
        _ => CoverageError::file_not_readable(path, Some(e)),
    })
}

/// Check that `path` names an existing regular file.
pub fn ensure_readable_file(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(CoverageError::file_not_readable(path, None)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(CoverageError::file_not_found(path)),
        Err(e) => Err(CoverageError::file_not_readable(path, Some(e))),
    }
}

/// Whether the file name of `path` ends in `.{ext}`, ignoring ASCII case.
///
/// Examples:
/// - `report.xml`, `"xml"` → `true`
/// - `REPORT.XML`, `"xml"` → `true`
/// - `report.xml.bak`, `"xml"` → `false`
/// - `xml`, `"xml"` → `false`
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_read_report_returns_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "GROUP,PACKAGE").unwrap();

        assert_eq!(read_report(&path).unwrap(), "GROUP,PACKAGE\n");
    }

    #[test]
    fn test_read_report_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_report(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, CoverageError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_report_directory_is_not_readable() {
        let dir = tempdir().unwrap();
        let err = read_report(dir.path()).unwrap_err();
        assert!(matches!(err, CoverageError::FileNotReadable { .. }));
    }

    #[test]
    fn test_read_report_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.csv");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let err = read_report(&path).unwrap_err();
        assert!(matches!(err, CoverageError::InvalidFormat { .. }));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("build/report.xml"), "xml"));
        assert!(has_extension(Path::new("REPORT.XML"), "xml"));
        assert!(!has_extension(Path::new("report.xml.bak"), "xml"));
        assert!(!has_extension(Path::new("report.csv"), "xml"));
        assert!(!has_extension(Path::new("xml"), "xml"));
    }
}
