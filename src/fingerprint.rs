//! Content fingerprints for detecting mid-session file edits.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// SHA-256 digest of a file's raw bytes.
///
/// A fingerprint is captured when a file is first observed by a run and
/// compared against a fresh digest just before writing; a mismatch means
/// something else edited the file while the session ran. Serialized as the
/// usual 64-character lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Digests a byte slice.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Fingerprint(Sha256::digest(bytes).into())
    }

    /// Digests a file's current contents.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        Ok(Self::of_bytes(&fs::read(path)?))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A fingerprint string that is not 64 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fingerprint must be 64 hex characters, got {found:?}")]
pub struct InvalidFingerprint {
    found: String,
}

impl FromStr for Fingerprint {
    type Err = InvalidFingerprint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 64 || !bytes.iter().all(u8::is_ascii_hexdigit) {
            return Err(InvalidFingerprint {
                found: s.to_string(),
            });
        }
        let mut digest = [0u8; 32];
        for (slot, pair) in digest.iter_mut().zip(bytes.chunks_exact(2)) {
            *slot = hex_value(pair[0]) << 4 | hex_value(pair[1]);
        }
        Ok(Fingerprint(digest))
    }
}

/// Value of one hex digit; callers have already validated the input.
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit.to_ascii_lowercase() - b'a' + 10,
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
