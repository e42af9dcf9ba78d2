//! The selection-processing engine.
//!
//! Turns a raw user selection (files, directories, possibly a checksum
//! manifest) into one deduplicated, normalized work list. Processing
//! never fails: every internal error degrades to a documented fallback
//! and the caller always receives a (possibly degenerate) list.

use std::collections::VecDeque;

use tracing::{debug, warn};

use sumwalk_core::{
    AlgorithmDesc, FileData, ListWarning, ProcessedFileList, SumfileKind, SumfileParser,
    find_by_extension,
};

use crate::fs::Filesystem;
use crate::longpath::{extension_of, file_name_start};
use crate::normalize::normalize_path;

/// The list-processing engine.
///
/// Holds only injected capabilities; all state lives in the
/// [`ProcessedFileList`] being built, which is owned by the call and
/// returned by value. Processing is strictly sequential.
pub struct ListProcessor<'a> {
    fs: &'a dyn Filesystem,
    parser: &'a dyn SumfileParser,
    registry: &'a [AlgorithmDesc],
}

impl<'a> ListProcessor<'a> {
    /// Create an engine over the given capabilities.
    pub fn new(
        fs: &'a dyn Filesystem,
        parser: &'a dyn SumfileParser,
        registry: &'a [AlgorithmDesc],
    ) -> Self {
        Self {
            fs,
            parser,
            registry,
        }
    }

    /// Process a user selection into a work list.
    ///
    /// The selection may mix files and directories and contain
    /// duplicates; it should not be empty (an empty selection yields an
    /// empty list rather than an error). A single selected file is
    /// probed as a checksum manifest; its entries seed the list with
    /// expected digests before the selection itself is expanded, so the
    /// first-write-wins rule keeps expectation data intact when the
    /// same file is reached both ways.
    pub fn process(&self, mut selection: Vec<String>) -> ProcessedFileList {
        let mut list = ProcessedFileList::new();
        if selection.is_empty() {
            return list;
        }

        let mut staged: Vec<(String, Vec<u8>)> = Vec::new();

        if selection.len() == 1 {
            self.resolve_single(&selection[0], &mut list, &mut staged);
        } else {
            selection.sort();
            list.base_path = common_base(
                &selection[0],
                &selection[selection.len() - 1],
                self.fs.separator(),
            );
        }

        if !list.base_path.is_empty() {
            if !list.base_path.ends_with(self.fs.separator()) {
                list.base_path.push(self.fs.separator());
            }
            list.base_path = normalize_path(self.fs, &list.base_path);
        }

        // Seed from the manifest before walking the selection so the
        // expectation data wins the first-write race for shared paths.
        for (path, digest) in staged {
            let normalized = normalize_path(self.fs, &path);
            let mut data = FileData::new(relative_to(&list.base_path, &normalized));
            match list.sumfile {
                SumfileKind::Algorithm(index) => {
                    data.expected_hashes.insert(index, digest);
                }
                _ => data.expected_unknown_hash = Some(digest),
            }
            list.insert_first(normalized, data);
        }

        self.expand_selection(selection, &mut list);
        list
    }

    /// Base-path resolution for a lone selection, including the
    /// manifest probe.
    fn resolve_single(
        &self,
        file: &str,
        list: &mut ProcessedFileList,
        staged: &mut Vec<(String, Vec<u8>)>,
    ) {
        let separator = self.fs.separator();

        if self.fs.is_dir(file) {
            // A lone directory is its own base; expansion handles the
            // rest and there is no manifest to probe.
            list.base_path = file.to_owned();
            return;
        }

        // A lone file's containing directory is surely the base.
        let base = &file[..file_name_start(file, separator)];
        list.base_path = base.to_owned();

        let mut reader = match self.fs.open(file) {
            Ok(reader) => reader,
            Err(error) => {
                debug!(path = file, %error, "selection not readable, kept as plain file");
                list.warnings.push(ListWarning::sumfile_unreadable(file, &error));
                return;
            }
        };

        let entries = self.parser.parse(reader.as_mut());
        if entries.is_empty() {
            return;
        }

        list.sumfile = SumfileKind::Unknown;
        if let Some(extension) = extension_of(file, separator) {
            if let Some(index) = find_by_extension(self.registry, extension) {
                list.sumfile = SumfileKind::Algorithm(index);
            }
        }
        debug!(
            path = file,
            entries = entries.len(),
            kind = ?list.sumfile,
            "parsed checksum manifest"
        );

        for entry in entries {
            // A manifest cannot declare "no file" as the subject of a
            // hash when it is itself the file being selected.
            if entry.filename.is_empty() {
                continue;
            }
            staged.push((format!("{base}{}", entry.filename), entry.digest));
        }
        // Fall through: the manifest itself still becomes a plain
        // entry, in case the user wants its own checksum.
    }

    /// Walk the selection as a growable queue, expanding directories in
    /// place and inserting every resolved leaf exactly once.
    fn expand_selection(&self, selection: Vec<String>, list: &mut ProcessedFileList) {
        let separator = self.fs.separator();
        let mut queue: VecDeque<String> = selection.into();

        while let Some(item) = queue.pop_front() {
            let normalized = normalize_path(self.fs, &item);

            if self.fs.is_dir(&normalized) {
                let listing = self.fs.read_dir(&normalized);
                for child in &listing.entries {
                    if child == "." || child == ".." {
                        continue;
                    }
                    queue.push_back(format!("{normalized}{separator}{child}"));
                }
                if listing.complete {
                    continue;
                }
                // Enumeration could not start or died partway: the
                // directory itself stays in the list as a plain entry
                // (children already seen remain queued).
                warn!(path = %normalized, "directory enumeration failed, kept as plain entry");
                list.warnings
                    .push(ListWarning::directory_fallback(normalized.clone()));
            }

            let data = FileData::new(relative_to(&list.base_path, &normalized));
            list.insert_first(normalized, data);
        }
    }
}

/// Longest common prefix of the lexicographic extremes, cut back to the
/// last separator so a trailing partial segment is dropped. A prefix
/// without any separator is kept as-is.
fn common_base(first: &str, last: &str, separator: char) -> String {
    let mut end = 0;
    for (a, b) in first.chars().zip(last.chars()) {
        if a != b {
            break;
        }
        end += a.len_utf8();
    }
    let mut base = &first[..end];
    if let Some(position) = base.rfind(separator) {
        base = &base[..position];
    }
    base.to_owned()
}

/// Relative form of a canonical path: the base-path prefix stripped
/// when literally present, the canonical path verbatim otherwise.
fn relative_to<'p>(base: &str, canonical: &'p str) -> &'p str {
    canonical.strip_prefix(base).unwrap_or(canonical)
}
