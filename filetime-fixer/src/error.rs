use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::fs::EntryKind;

/// Failures confined to one entry or one directory listing
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("failed to open {kind} {path:?}: {source}")]
    OpenForRead {
        path: PathBuf,
        kind: EntryKind,
        source: io::Error,
    },
    #[error("failed to get timestamps of {kind} {path:?}: {source}")]
    TimestampRead {
        path: PathBuf,
        kind: EntryKind,
        source: io::Error,
    },
    #[error("failed to open {kind} {path:?} for writing: {source}")]
    OpenForWrite {
        path: PathBuf,
        kind: EntryKind,
        source: io::Error,
    },
    #[error("failed to set creation time of {kind} {path:?}: {source}")]
    TimestampWrite {
        path: PathBuf,
        kind: EntryKind,
        source: io::Error,
    },
    #[error("failed to list directory {path:?}: {source}")]
    EnumerationStart { path: PathBuf, source: io::Error },
    #[error("listing of directory {path:?} ended early: {source}")]
    EnumerationStep { path: PathBuf, source: io::Error },
}

impl RepairError {
    pub fn path(&self) -> &Path {
        match self {
            RepairError::OpenForRead { path, .. }
            | RepairError::TimestampRead { path, .. }
            | RepairError::OpenForWrite { path, .. }
            | RepairError::TimestampWrite { path, .. }
            | RepairError::EnumerationStart { path, .. }
            | RepairError::EnumerationStep { path, .. } => path,
        }
    }

    pub fn io_error(&self) -> &io::Error {
        match self {
            RepairError::OpenForRead { source, .. }
            | RepairError::TimestampRead { source, .. }
            | RepairError::OpenForWrite { source, .. }
            | RepairError::TimestampWrite { source, .. }
            | RepairError::EnumerationStart { source, .. }
            | RepairError::EnumerationStep { source, .. } => source,
        }
    }

    /// Platform error code, if the failure came from the operating system
    pub fn os_code(&self) -> Option<i32> {
        self.io_error().raw_os_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_path_and_os_error() {
        let error = RepairError::OpenForWrite {
            path: PathBuf::from("/data/f"),
            kind: EntryKind::File,
            source: io::Error::from_raw_os_error(5),
        };
        let message = error.to_string();
        assert!(message.starts_with("failed to open file \"/data/f\" for writing: "));
        assert!(message.contains("os error 5"));
        assert_eq!(error.os_code(), Some(5));
        assert_eq!(error.path(), Path::new("/data/f"));
    }

    #[test]
    fn synthetic_errors_have_no_os_code() {
        let error = RepairError::EnumerationStart {
            path: PathBuf::from("/d"),
            source: io::Error::other("gone"),
        };
        assert_eq!(error.os_code(), None);
    }
}
