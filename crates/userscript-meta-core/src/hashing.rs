// crates/userscript-meta-core/src/hashing.rs
// ============================================================================
// Module: Resource Content Hashing
// Description: Streamed MD5/SHA-256 digests of local resource files.
// Purpose: Compute `auto` integrity fragments for `@require`/`@resource`.
// Dependencies: md-5, serde, sha2, thiserror
// ============================================================================

//! ## Overview
//! Resource hashes are lowercase hex digests computed over raw file bytes.
//! Files are read in fixed [`HASH_CHUNK_BYTES`] chunks so memory use stays
//! bounded regardless of file size. The generator consumes hashing through
//! the [`ContentHasher`] trait; [`StreamingFileHasher`] is the default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;

use md5::Md5;
use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Hash algorithms accepted in resource integrity fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5 digest.
    Md5,
    /// SHA-256 digest.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the identifier used in URL fragments.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }
}

/// Read size used when streaming files into a digest.
pub const HASH_CHUNK_BYTES: usize = 8192;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when hashing resource content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// The source file could not be opened or read.
    #[error("failed to hash {path}: {message}")]
    Io {
        /// File being hashed.
        path: String,
        /// Underlying I/O failure.
        message: String,
    },
    /// A relative source path could not be made absolute.
    #[error("failed to resolve working directory: {0}")]
    WorkingDirectory(String),
}

// ============================================================================
// SECTION: Hasher Interface
// ============================================================================

/// Computes hex digests of local files.
pub trait ContentHasher {
    /// Returns the lowercase hex digest of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when the file cannot be read.
    fn hash_file(&self, path: &Path, algorithm: HashAlgorithm) -> Result<String, HashError>;
}

/// Default hasher reading files in [`HASH_CHUNK_BYTES`] chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingFileHasher;

impl ContentHasher for StreamingFileHasher {
    fn hash_file(&self, path: &Path, algorithm: HashAlgorithm) -> Result<String, HashError> {
        let io_error = |err: std::io::Error| HashError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        };
        let file = File::open(path).map_err(io_error)?;
        hash_reader(file, algorithm).map_err(io_error)
    }
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Streams a reader into the given algorithm and returns the hex digest.
///
/// # Errors
///
/// Returns the underlying I/O error when a read fails.
pub fn hash_reader(reader: impl Read, algorithm: HashAlgorithm) -> std::io::Result<String> {
    let digest = match algorithm {
        HashAlgorithm::Md5 => digest_reader::<Md5>(reader)?,
        HashAlgorithm::Sha256 => digest_reader::<Sha256>(reader)?,
    };
    Ok(hex_encode(&digest))
}

/// Hashes an in-memory byte slice.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> String {
    match algorithm {
        HashAlgorithm::Md5 => hex_encode(&Md5::digest(bytes)),
        HashAlgorithm::Sha256 => hex_encode(&Sha256::digest(bytes)),
    }
}

/// Feeds a reader into a digest chunk by chunk.
fn digest_reader<D: Digest>(mut reader: impl Read) -> std::io::Result<Vec<u8>> {
    let mut hasher = D::new();
    let mut buffer = [0_u8; HASH_CHUNK_BYTES];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        hasher.update(&buffer[.. read]);
    }
    Ok(hasher.finalize().to_vec())
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
