//! Expectation verification over a processed list.

use std::collections::BTreeMap;

use derive_builder::Builder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sumwalk_core::{AlgorithmDesc, FileData, ProcessedFileList};

use crate::compute::Digester;

/// Buffer size for streaming reads.
const READ_BUF: usize = 64 * 1024;

/// Configuration for expectation verification.
#[derive(Debug, Clone, Default, Builder)]
#[builder(setter(into), default)]
pub struct VerifyConfig {
    /// Algorithms (by registry index) to compute for entries that carry
    /// no expectations. Empty means such entries are reported as
    /// unchecked.
    #[builder(default)]
    pub default_algorithms: Vec<usize>,
}

impl VerifyConfig {
    /// Create a new config builder.
    pub fn builder() -> VerifyConfigBuilder {
        VerifyConfigBuilder::default()
    }
}

/// Result of checking one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerifyStatus {
    /// Every expected digest matched.
    Match,
    /// At least one expected digest did not match.
    Mismatch,
    /// Nothing to compare against; any configured default digests were
    /// still computed.
    NoExpectation,
    /// The file could not be read.
    Unreadable,
}

/// Per-file verification outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Canonical path of the checked file.
    pub canonical_path: String,
    /// Path relative to the list's base path.
    pub relative_path: String,
    /// Comparison result.
    pub status: VerifyStatus,
    /// Digests actually computed, by registry index.
    pub computed: BTreeMap<usize, Vec<u8>>,
}

/// Aggregated verification results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Per-file outcomes in canonical path order.
    pub outcomes: Vec<FileOutcome>,
    /// Number of files whose expectations all matched.
    pub matches: usize,
    /// Number of files with at least one mismatch.
    pub mismatches: usize,
    /// Number of files with nothing to check.
    pub unchecked: usize,
    /// Number of files that could not be read.
    pub unreadable: usize,
}

impl VerifyReport {
    /// True when no mismatches and no read failures occurred.
    pub fn all_ok(&self) -> bool {
        self.mismatches == 0 && self.unreadable == 0
    }
}

/// Verifies the expectations carried by a processed list.
pub struct Verifier<'a> {
    registry: &'a [AlgorithmDesc],
    config: VerifyConfig,
}

impl<'a> Verifier<'a> {
    /// Verifier with the default configuration.
    pub fn new(registry: &'a [AlgorithmDesc]) -> Self {
        Self::with_config(registry, VerifyConfig::default())
    }

    /// Verifier with an explicit configuration.
    pub fn with_config(registry: &'a [AlgorithmDesc], config: VerifyConfig) -> Self {
        Self { registry, config }
    }

    /// Check every file in the list, fanning out across files.
    pub fn verify(&self, list: &ProcessedFileList) -> VerifyReport {
        let entries: Vec<(&String, &FileData)> = list.files.iter().collect();
        let outcomes: Vec<FileOutcome> = entries
            .par_iter()
            .map(|(canonical, data)| self.check_file(canonical.as_str(), data))
            .collect();

        let mut report = VerifyReport {
            outcomes,
            matches: 0,
            mismatches: 0,
            unchecked: 0,
            unreadable: 0,
        };
        for outcome in &report.outcomes {
            match outcome.status {
                VerifyStatus::Match => report.matches += 1,
                VerifyStatus::Mismatch => report.mismatches += 1,
                VerifyStatus::NoExpectation => report.unchecked += 1,
                VerifyStatus::Unreadable => report.unreadable += 1,
            }
        }
        report
    }

    fn check_file(&self, canonical: &str, data: &FileData) -> FileOutcome {
        let wanted = self.algorithms_for(data);
        let mut outcome = FileOutcome {
            canonical_path: canonical.to_owned(),
            relative_path: data.relative_path.to_string(),
            status: VerifyStatus::NoExpectation,
            computed: BTreeMap::new(),
        };
        if wanted.is_empty() {
            return outcome;
        }

        match self.compute_digests(canonical, &wanted) {
            Ok(computed) => {
                outcome.status = compare(data, &computed);
                if outcome.status == VerifyStatus::Mismatch {
                    debug!(path = canonical, "digest mismatch");
                }
                outcome.computed = computed;
            }
            Err(_) => outcome.status = VerifyStatus::Unreadable,
        }
        outcome
    }

    /// Which algorithms to run for an entry: the declared ones, every
    /// registry algorithm of matching digest length for an
    /// unknown-type expectation, or the configured default set.
    fn algorithms_for(&self, data: &FileData) -> Vec<usize> {
        if !data.expected_hashes.is_empty() {
            return data.expected_hashes.keys().copied().collect();
        }
        if let Some(expected) = &data.expected_unknown_hash {
            return self
                .registry
                .iter()
                .enumerate()
                .filter(|(_, desc)| desc.digest_len == expected.len())
                .map(|(index, _)| index)
                .collect();
        }
        self.config.default_algorithms.clone()
    }

    /// Stream the file once, feeding every wanted digester.
    fn compute_digests(
        &self,
        path: &str,
        wanted: &[usize],
    ) -> std::io::Result<BTreeMap<usize, Vec<u8>>> {
        let mut digesters: Vec<(usize, Digester)> = wanted
            .iter()
            .filter_map(|&index| {
                let desc = self.registry.get(index)?;
                Some((index, Digester::by_name(desc.name)?))
            })
            .collect();

        let mut file = std::fs::File::open(path)?;
        let mut buf = vec![0u8; READ_BUF];
        loop {
            let read = std::io::Read::read(&mut file, &mut buf)?;
            if read == 0 {
                break;
            }
            for (_, digester) in &mut digesters {
                digester.update(&buf[..read]);
            }
        }

        Ok(digesters
            .into_iter()
            .map(|(index, digester)| (index, digester.finalize()))
            .collect())
    }
}

/// Compare computed digests against an entry's expectations.
fn compare(data: &FileData, computed: &BTreeMap<usize, Vec<u8>>) -> VerifyStatus {
    if !data.expected_hashes.is_empty() {
        let all_match = data
            .expected_hashes
            .iter()
            .all(|(index, expected)| computed.get(index) == Some(expected));
        return if all_match {
            VerifyStatus::Match
        } else {
            VerifyStatus::Mismatch
        };
    }
    if let Some(expected) = &data.expected_unknown_hash {
        // Any algorithm of the right digest length counts; the manifest
        // did not say which one it used.
        return if computed.values().any(|digest| digest == expected) {
            VerifyStatus::Match
        } else {
            VerifyStatus::Mismatch
        };
    }
    VerifyStatus::NoExpectation
}
