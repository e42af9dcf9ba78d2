//! The processed file list and its per-entry data.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::warning::ListWarning;

/// How a selection relates to a checksum manifest.
///
/// Decided once, while the base path is resolved, and never changed
/// afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SumfileKind {
    /// No manifest was detected in the selection.
    #[default]
    None,
    /// A manifest was detected but its hash algorithm could not be
    /// determined from the file extension.
    Unknown,
    /// A manifest bound to the algorithm at this registry index.
    Algorithm(usize),
}

impl SumfileKind {
    /// Check whether any manifest was detected.
    pub fn is_sumfile(&self) -> bool {
        !matches!(self, SumfileKind::None)
    }

    /// Registry index of the bound algorithm, if one was determined.
    pub fn algorithm(&self) -> Option<usize> {
        match self {
            SumfileKind::Algorithm(index) => Some(*index),
            _ => None,
        }
    }
}

/// Data attached to one canonical path in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    /// Path relative to the list's base path, or the canonical path
    /// verbatim when the base path is not a prefix of it.
    pub relative_path: CompactString,

    /// Expected digests by registry index, from a type-bound manifest.
    pub expected_hashes: BTreeMap<usize, Vec<u8>>,

    /// Expected digest from a manifest whose algorithm is unknown.
    pub expected_unknown_hash: Option<Vec<u8>>,
}

impl FileData {
    /// Create file data with no expectations.
    pub fn new(relative_path: impl Into<CompactString>) -> Self {
        Self {
            relative_path: relative_path.into(),
            expected_hashes: BTreeMap::new(),
            expected_unknown_hash: None,
        }
    }

    /// Check whether any expected digest is attached.
    pub fn has_expectation(&self) -> bool {
        !self.expected_hashes.is_empty() || self.expected_unknown_hash.is_some()
    }

    /// Expected digest for a specific algorithm, if one was declared.
    pub fn expected_for(&self, algorithm: usize) -> Option<&[u8]> {
        self.expected_hashes.get(&algorithm).map(Vec::as_slice)
    }
}

/// The engine's sole output: a deduplicated, normalized work list.
///
/// Keys of `files` are canonical absolute paths; the first writer for a
/// key is authoritative and later insertions of the same key are
/// rejected. This protects manifest-derived expectations from being
/// overwritten when the same file is reached again through directory
/// expansion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedFileList {
    /// Normalized base directory all relative paths are expressed
    /// against. Empty when no common base could be determined; when
    /// non-empty it always ends with the path separator.
    pub base_path: String,

    /// Manifest detection outcome for this selection.
    pub sumfile: SumfileKind,

    /// Canonical absolute path to per-file data.
    pub files: BTreeMap<String, FileData>,

    /// Non-fatal degradations recorded while processing.
    pub warnings: Vec<ListWarning>,
}

impl ProcessedFileList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under a canonical path unless an entry is already present.
    ///
    /// Returns whether the insertion happened. The first writer wins;
    /// a rejected duplicate is not an error.
    pub fn insert_first(&mut self, canonical: String, data: FileData) -> bool {
        match self.files.entry(canonical) {
            Entry::Vacant(slot) => {
                slot.insert(data);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Look up an entry by canonical path.
    pub fn get(&self, canonical: &str) -> Option<&FileData> {
        self.files.get(canonical)
    }

    /// Number of files in the list.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check whether the list holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if there were any warnings during processing.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
