//! Selection-to-work-list processing engine for sumwalk.
//!
//! This crate turns an arbitrary user selection of paths (files,
//! directories, possibly a checksum manifest) into one deduplicated,
//! normalized [`ProcessedFileList`]. Key pieces:
//!
//! - **Path normalization** to a canonical absolute, long-form,
//!   canonically-cased string that serves as the deduplication key
//! - **Base-path resolution** from a lone selection's directory or the
//!   common ancestor of a multi-selection
//! - **Manifest reconciliation** seeding expected digests from a
//!   checksum file before the selection itself is walked
//! - **Directory expansion** over a growable queue, tolerating partial
//!   enumeration failures
//!
//! Processing never fails; every internal error degrades to a
//! documented fallback, and degradations are surfaced as warnings on
//! the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use sumwalk_core::DEFAULT_ALGORITHMS;
//! use sumwalk_list::{ListProcessor, StdFs};
//! use sumwalk_sumfile::LineSumfileParser;
//!
//! let fs = StdFs::new();
//! let parser = LineSumfileParser::new();
//! let engine = ListProcessor::new(&fs, &parser, DEFAULT_ALGORITHMS);
//!
//! let list = engine.process(vec!["./checksums.sha256".to_owned()]);
//! println!("base: {}", list.base_path);
//! for (canonical, data) in &list.files {
//!     println!("{canonical} -> {}", data.relative_path);
//! }
//! ```

mod fs;
mod longpath;
mod normalize;
mod process;
#[cfg(windows)]
mod win;

pub use fs::{DirListing, Filesystem, StdFs};
pub use longpath::{extension_of, file_name_start, long_compatible};
pub use normalize::normalize_path;
pub use process::ListProcessor;

// Re-export core types for convenience
pub use sumwalk_core::{
    AlgorithmDesc, DEFAULT_ALGORITHMS, FileData, ListWarning, ListWarningKind, ProcessedFileList,
    SumfileEntry, SumfileKind, SumfileParser,
};
