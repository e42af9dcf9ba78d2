//! Digest computation and expectation verification for sumwalk.
//!
//! The list engine only *collects* expected digests; this crate does
//! the hashing. Two layers:
//!
//! - **Computation** - streaming digests for every algorithm in the
//!   default registry (MD5, SHA-1, SHA-256, SHA-512, BLAKE3)
//! - **Verification** - walking a processed list, computing the
//!   relevant digest per entry and comparing it against the carried
//!   expectations, fanned out across files with rayon
//!
//! ```rust,ignore
//! use sumwalk_core::DEFAULT_ALGORITHMS;
//! use sumwalk_digest::Verifier;
//!
//! let verifier = Verifier::new(DEFAULT_ALGORITHMS);
//! let report = verifier.verify(&list);
//!
//! println!("{} matched, {} mismatched", report.matches, report.mismatches);
//! ```

mod compute;
mod verify;

pub use compute::{Digester, DigestError, hash_file, hash_reader, to_hex};
pub use verify::{
    FileOutcome, Verifier, VerifyConfig, VerifyConfigBuilder, VerifyReport, VerifyStatus,
};

// Re-export core types for convenience
pub use sumwalk_core::{AlgorithmDesc, DEFAULT_ALGORITHMS, FileData, ProcessedFileList};
