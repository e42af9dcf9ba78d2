//! Non-fatal warnings recorded during list processing.

use serde::{Deserialize, Serialize};

/// Kind of processing warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListWarningKind {
    /// A directory could not be fully enumerated and was kept in the
    /// list as a plain-file entry.
    DirectoryFallback,
    /// The lone selected file could not be opened for manifest probing.
    SumfileUnreadable,
}

/// Non-fatal degradation encountered while building the list.
///
/// Warnings never change the fallback behavior they describe; they only
/// make it visible to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListWarning {
    /// Path the warning refers to.
    pub path: String,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: ListWarningKind,
}

impl ListWarning {
    /// Create a new warning.
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        kind: ListWarningKind,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// A directory that degraded into a plain-file entry.
    pub fn directory_fallback(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            message: format!("Directory could not be fully enumerated: {path}"),
            path,
            kind: ListWarningKind::DirectoryFallback,
        }
    }

    /// A selection that could not be opened while probing for a manifest.
    pub fn sumfile_unreadable(path: impl Into<String>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Cannot open for reading: {error}"),
            path,
            kind: ListWarningKind::SumfileUnreadable,
        }
    }
}
