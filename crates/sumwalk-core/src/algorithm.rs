//! Hash-algorithm descriptor table.
//!
//! The engine never computes digests; it only needs to know, per
//! algorithm, a stable index and which sumfile extensions conventionally
//! carry that algorithm's digests. A registry is any `&[AlgorithmDesc]`
//! slice and an algorithm's index is its position in the slice, so tests
//! can inject synthetic registries.

/// Descriptor for one hash algorithm known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmDesc {
    /// Display name, e.g. `SHA-256`.
    pub name: &'static str,
    /// Digest length in bytes.
    pub digest_len: usize,
    /// Sumfile filename extensions conventionally associated with this
    /// algorithm's manifest format, without the leading dot.
    pub extensions: &'static [&'static str],
}

/// The production registry.
pub const DEFAULT_ALGORITHMS: &[AlgorithmDesc] = &[
    AlgorithmDesc {
        name: "MD5",
        digest_len: 16,
        extensions: &["md5", "md5sum"],
    },
    AlgorithmDesc {
        name: "SHA-1",
        digest_len: 20,
        extensions: &["sha1", "sha1sum"],
    },
    AlgorithmDesc {
        name: "SHA-256",
        digest_len: 32,
        extensions: &["sha256", "sha2"],
    },
    AlgorithmDesc {
        name: "SHA-512",
        digest_len: 64,
        extensions: &["sha512"],
    },
    AlgorithmDesc {
        name: "BLAKE3",
        digest_len: 32,
        extensions: &["b3", "blake3"],
    },
];

/// Index of the first algorithm registering `extension` (case-sensitive,
/// leading dot already stripped). Registry order is the tie-break when an
/// extension is claimed more than once.
pub fn find_by_extension(registry: &[AlgorithmDesc], extension: &str) -> Option<usize> {
    registry
        .iter()
        .position(|algo| algo.extensions.contains(&extension))
}

/// Index of the algorithm with the given display name, compared
/// case-insensitively.
pub fn find_by_name(registry: &[AlgorithmDesc], name: &str) -> Option<usize> {
    registry
        .iter()
        .position(|algo| algo.name.eq_ignore_ascii_case(name))
}
