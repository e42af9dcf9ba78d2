//! Streaming digest computation.

use std::io::Read;
use std::path::PathBuf;

use sha2::Digest;
use thiserror::Error;

use sumwalk_core::AlgorithmDesc;

/// Buffer size for streaming reads.
const READ_BUF: usize = 64 * 1024;

/// Errors from digest computation.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The registry has no algorithm at this index.
    #[error("no algorithm at registry index {index}")]
    UnknownAlgorithm { index: usize },

    /// The algorithm is registered but has no implementation here.
    #[error("algorithm {name} has no digest implementation")]
    Unsupported { name: String },

    /// Reading the input failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A streaming digest for one registry algorithm.
#[derive(Debug)]
pub enum Digester {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
    Sha512(sha2::Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl Digester {
    /// Digester for the algorithm with the given display name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "MD5" => Some(Self::Md5(md5::Md5::new())),
            "SHA-1" => Some(Self::Sha1(sha1::Sha1::new())),
            "SHA-256" => Some(Self::Sha256(sha2::Sha256::new())),
            "SHA-512" => Some(Self::Sha512(sha2::Sha512::new())),
            "BLAKE3" => Some(Self::Blake3(Box::new(blake3::Hasher::new()))),
            _ => None,
        }
    }

    /// Digester for the algorithm at `index` in `registry`.
    pub fn for_algorithm(registry: &[AlgorithmDesc], index: usize) -> Result<Self, DigestError> {
        let desc = registry
            .get(index)
            .ok_or(DigestError::UnknownAlgorithm { index })?;
        Self::by_name(desc.name).ok_or_else(|| DigestError::Unsupported {
            name: desc.name.to_owned(),
        })
    }

    /// Feed a chunk of input.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(hasher) => hasher.update(data),
            Self::Sha1(hasher) => hasher.update(data),
            Self::Sha256(hasher) => hasher.update(data),
            Self::Sha512(hasher) => hasher.update(data),
            Self::Blake3(hasher) => {
                hasher.update(data);
            }
        }
    }

    /// Finish and return the digest bytes.
    pub fn finalize(self) -> Vec<u8> {
        match self {
            Self::Md5(hasher) => hasher.finalize().to_vec(),
            Self::Sha1(hasher) => hasher.finalize().to_vec(),
            Self::Sha256(hasher) => hasher.finalize().to_vec(),
            Self::Sha512(hasher) => hasher.finalize().to_vec(),
            Self::Blake3(hasher) => hasher.finalize().as_bytes().to_vec(),
        }
    }
}

/// Digest an entire reader.
pub fn hash_reader(mut digester: Digester, reader: &mut dyn Read) -> std::io::Result<Vec<u8>> {
    let mut buf = vec![0u8; READ_BUF];
    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        digester.update(&buf[..read]);
    }
    Ok(digester.finalize())
}

/// Digest a file on disk with the algorithm at `index` in `registry`.
pub fn hash_file(
    registry: &[AlgorithmDesc],
    index: usize,
    path: &str,
) -> Result<Vec<u8>, DigestError> {
    let digester = Digester::for_algorithm(registry, index)?;
    let io_error = |source| DigestError::Io {
        path: PathBuf::from(path),
        source,
    };
    let mut file = std::fs::File::open(path).map_err(io_error)?;
    hash_reader(digester, &mut file).map_err(io_error)
}

/// Digest bytes as a lowercase hex string.
pub fn to_hex(digest: &[u8]) -> String {
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sumwalk_core::DEFAULT_ALGORITHMS;

    fn digest_str(name: &str, input: &[u8]) -> String {
        let digester = Digester::by_name(name).unwrap();
        to_hex(&hash_reader(digester, &mut &input[..]).unwrap())
    }

    #[test]
    fn test_md5_vectors() {
        assert_eq!(digest_str("MD5", b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(digest_str("MD5", b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_sha1_vector() {
        assert_eq!(
            digest_str("SHA-1", b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_sha256_vectors() {
        assert_eq!(
            digest_str("SHA-256", b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest_str("SHA-256", b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha512_vector() {
        assert_eq!(
            digest_str("SHA-512", b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_blake3_matches_reference_hasher() {
        let streamed = digest_str("BLAKE3", b"some longer input, fed in one go");
        let reference = blake3::hash(b"some longer input, fed in one go");
        assert_eq!(streamed, reference.to_hex().to_string());
    }

    #[test]
    fn test_digest_lengths_match_registry() {
        for desc in DEFAULT_ALGORITHMS {
            let digester = Digester::by_name(desc.name).unwrap();
            let digest = hash_reader(digester, &mut &b"x"[..]).unwrap();
            assert_eq!(digest.len(), desc.digest_len, "{}", desc.name);
        }
    }

    #[test]
    fn test_unknown_index_is_an_error() {
        let err = Digester::for_algorithm(DEFAULT_ALGORITHMS, 99).unwrap_err();
        assert!(matches!(err, DigestError::UnknownAlgorithm { index: 99 }));
    }
}
