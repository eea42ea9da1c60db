//! Incremental digest engine: a closed set of algorithms behind one
//! init/absorb/finalize surface.
//!
//! The streaming hasher never matches on the algorithm; adding one touches
//! only this module.

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::HashError;

/// Supported digest algorithms. Unknown names are rejected at parse time,
/// before any file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    pub fn all() -> [Algorithm; 5] {
        [
            Algorithm::Md5,
            Algorithm::Sha1,
            Algorithm::Sha256,
            Algorithm::Sha384,
            Algorithm::Sha512,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA-1",
            Algorithm::Sha256 => "SHA-256",
            Algorithm::Sha384 => "SHA-384",
            Algorithm::Sha512 => "SHA-512",
        }
    }

    /// Raw digest size in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
            Algorithm::Sha256 => 32,
            Algorithm::Sha384 => 48,
            Algorithm::Sha512 => 64,
        }
    }

    /// Length of the lowercase hex rendering (two digits per byte).
    pub fn hex_len(&self) -> usize {
        self.digest_len() * 2
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HashError;

    /// Case-insensitive; `-` and `_` separators are ignored, so "SHA-256",
    /// "sha256" and "Sha_256" all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha1" => Ok(Algorithm::Sha1),
            "sha256" => Ok(Algorithm::Sha256),
            "sha384" => Ok(Algorithm::Sha384),
            "sha512" => Ok(Algorithm::Sha512),
            _ => Err(HashError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// One incremental hashing context. Created per job; finalize consumes the
/// context, so absorb-after-finalize cannot compile.
pub enum DigestContext {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl DigestContext {
    pub fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Md5 => DigestContext::Md5(Md5::new()),
            Algorithm::Sha1 => DigestContext::Sha1(Sha1::new()),
            Algorithm::Sha256 => DigestContext::Sha256(Sha256::new()),
            Algorithm::Sha384 => DigestContext::Sha384(Sha384::new()),
            Algorithm::Sha512 => DigestContext::Sha512(Sha512::new()),
        }
    }

    /// Absorb one chunk. Chunks may be of any positive length and must be
    /// fed in file order.
    pub fn absorb(&mut self, chunk: &[u8]) {
        match self {
            DigestContext::Md5(h) => h.update(chunk),
            DigestContext::Sha1(h) => h.update(chunk),
            DigestContext::Sha256(h) => h.update(chunk),
            DigestContext::Sha384(h) => h.update(chunk),
            DigestContext::Sha512(h) => h.update(chunk),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            DigestContext::Md5(h) => h.finalize().to_vec(),
            DigestContext::Sha1(h) => h.finalize().to_vec(),
            DigestContext::Sha256(h) => h.finalize().to_vec(),
            DigestContext::Sha384(h) => h.finalize().to_vec(),
            DigestContext::Sha512(h) => h.finalize().to_vec(),
        }
    }
}
