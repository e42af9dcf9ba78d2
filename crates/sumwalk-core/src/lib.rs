//! Core types and traits for sumwalk.
//!
//! This crate provides the fundamental data structures shared across
//! the sumwalk workspace: the processed file list produced by the
//! engine, the hash-algorithm descriptor table, the checksum-manifest
//! parser seam, and non-fatal warnings.

mod algorithm;
mod list;
mod sumfile;
mod warning;

pub use algorithm::{AlgorithmDesc, DEFAULT_ALGORITHMS, find_by_extension, find_by_name};
pub use list::{FileData, ProcessedFileList, SumfileKind};
pub use sumfile::{SumfileEntry, SumfileParser};
pub use warning::{ListWarning, ListWarningKind};
