use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- taskgrid recovery log: data that could not be saved normally.
     Each entry holds the content that failed to reach its file.
     Safe to delete once nothing here is needed. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A board file could not be written.
    Write,
    /// A record was altered or skipped while loading.
    Load,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Load => write!(f, "load"),
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push_str("\n---\n");
        out
    }
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(board_dir: &Path) -> PathBuf {
    board_dir.join(".recovery.log")
}

// ---------------------------------------------------------------------------
// Atomic file replace
// ---------------------------------------------------------------------------

/// Replace `path` with `content` without ever exposing a partial file.
///
/// The content goes to a temp file named `<stem>.*.<ext>` next to `path`,
/// which is then renamed over it. If the rename fails while the old file is
/// still there, the old file is removed (a missing file is fine) and the
/// rename is retried.
pub fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let stem = path
        .file_stem()
        .map(|s| format!("{}.", s.to_string_lossy()))
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut tmp = tempfile::Builder::new()
        .prefix(&stem)
        .suffix(&suffix)
        .tempfile_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;

    match tmp.persist(path) {
        Ok(_) => Ok(()),
        Err(e) => {
            let tmp = e.file;
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
            tmp.persist(path).map(|_| ()).map_err(|e| e.error)
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log. Failures to write the log itself are
/// only reported through `tracing`.
pub fn log_recovery(board_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(board_dir, &entry) {
        warn!(error = %e, "could not write to recovery log");
    }
}

fn log_recovery_inner(board_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(board_dir);
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Record content that failed to reach `path`.
pub fn log_write_failure(board_dir: &Path, path: &Path, err: &io::Error, content: &[u8]) {
    log_recovery(
        board_dir,
        RecoveryEntry::new(RecoveryCategory::Write, "save failed")
            .field("File", path.display())
            .field("Error", err)
            .body(String::from_utf8_lossy(content)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_replace_file_creates_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("active.txt");

        replace_file(&path, b"a\nb\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");

        replace_file(&path, b"c\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "c\n");

        // no temp files left behind
        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["active.txt"]);
    }

    #[test]
    fn test_replace_file_fails_for_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope").join("tasks.yaml");
        assert!(replace_file(&path, b"x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_log_starts_with_header_once() {
        let tmp = TempDir::new().unwrap();
        log_recovery(
            tmp.path(),
            RecoveryEntry::new(RecoveryCategory::Load, "epic cleared").field("Task", "abc"),
        );
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        log_write_failure(tmp.path(), Path::new("tasks.yaml"), &err, b"abc:\n  desc: x\n");

        let log = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert_eq!(log.matches("taskgrid recovery log").count(), 1);
        assert!(log.contains("load: epic cleared"));
        assert!(log.contains("Task: abc"));
        assert!(log.contains("write: save failed"));
        assert!(log.contains("File: tasks.yaml"));
        assert!(log.contains("```text\nabc:\n  desc: x\n```"));
    }
}
