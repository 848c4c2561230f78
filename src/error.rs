//! Library-level error type.
//!
//! Per-QSO parse failures are not represented here: `QSO::parse_cabrillo_line`
//! returns `Option<QSO>` and silently drops the offending line, as spec'd.
//! This enum covers configuration and ingest failures, which are fatal.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ScpError {
    MissingStartOrHours,
    ContestListUnreadable(PathBuf),
    BadContestListLine(String),
    DirectoryNotFound(PathBuf),
    NoValidLogs(PathBuf),
    BadStartTimestamp(String),
}

impl fmt::Display for ScpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScpError::MissingStartOrHours => {
                write!(f, "-start and -hrs are required when -dir is not an @file")
            }
            ScpError::ContestListUnreadable(path) => {
                write!(f, "could not read contest list file: {}", path.display())
            }
            ScpError::BadContestListLine(line) => {
                write!(f, "malformed contest list line: {}", line)
            }
            ScpError::DirectoryNotFound(path) => {
                write!(f, "log directory does not exist: {}", path.display())
            }
            ScpError::NoValidLogs(path) => {
                write!(f, "directory contains zero valid logs: {}", path.display())
            }
            ScpError::BadStartTimestamp(s) => write!(f, "malformed -start timestamp: {}", s),
        }
    }
}

impl std::error::Error for ScpError {}
