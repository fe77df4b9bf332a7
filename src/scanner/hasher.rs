//! Streaming content hashing with runtime-selectable algorithms.
//!
//! Files are read in fixed-size chunks so memory use stays flat regardless
//! of file size. Two digest algorithms are supported, both from the
//! RustCrypto family: MD5 (fast, the default) and SHA-256.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use md5::Md5;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::HashError;

/// Read buffer size for streaming hashing.
const READ_BUF_SIZE: usize = 64 * 1024;

/// Content digest algorithm, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// MD5 (128-bit). Fast; fine for duplicate detection.
    #[default]
    Md5,
    /// SHA-256 (256-bit). Slower but collision-resistant.
    Sha256,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha256 => 32,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Error for unrecognized algorithm names.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown hash algorithm '{0}' (expected md5 or sha256)")]
pub struct ParseAlgorithmError(String);

impl FromStr for HashAlgorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(ParseAlgorithmError(other.to_string())),
        }
    }
}

/// Fixed-length content fingerprint.
///
/// Equality means "same content" under the chosen algorithm's collision
/// assumptions. Rendered as lowercase hex externally.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Box<[u8]>);

impl Fingerprint {
    /// Wrap raw digest bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * 2);
        for byte in self.0.iter() {
            use fmt::Write;
            // Writing to a String cannot fail
            let _ = write!(out, "{:02x}", byte);
        }
        out
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Streaming file hasher for a fixed algorithm.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    algorithm: HashAlgorithm,
}

impl Hasher {
    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The algorithm this hasher uses.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash the full contents of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// mid-stream (concurrent deletion, permission revoked). Callers treat
    /// this as "file skipped", never as a scan-aborting condition.
    pub fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;

        let bytes = match self.algorithm {
            HashAlgorithm::Md5 => digest_reader::<Md5>(file),
            HashAlgorithm::Sha256 => digest_reader::<Sha256>(file),
        }
        .map_err(|e| HashError::from_io(path.to_path_buf(), e))?;

        Ok(Fingerprint::from_bytes(bytes))
    }
}

/// Stream a reader through a digest in fixed-size chunks.
fn digest_reader<D: Digest>(mut reader: impl Read) -> std::io::Result<Vec<u8>> {
    let mut digest = D::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n]);
    }
    Ok(digest.finalize().to_vec())
}
