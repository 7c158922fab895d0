// SPDX-License-Identifier: Apache-2.0

//! Credential collaborator: a JSON file mapping username to a salted,
//! iterated SHA-256 digest. The data core never depends on this crate; it
//! only consumes the boolean verdict of `verify`.

#![forbid(unsafe_code)]

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

const SALT_LEN: usize = 16;
const HASH_ROUNDS: u32 = 100_000;
const HASH_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    Io(String),
    Malformed(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "credential file I/O: {msg}"),
            Self::Malformed(msg) => write!(f, "credential file malformed: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Checks `password` against the stored digest for `username`. An absent
    /// file or unknown user is a plain `false`, not an error; only I/O and
    /// parse faults surface as errors.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        if !self.path.exists() {
            return Ok(false);
        }
        let map = self.read_map()?;
        match map.get(username) {
            None => Ok(false),
            Some(stored) => Ok(verify_password(stored, password)),
        }
    }

    /// Sets (or replaces) the password for `username`, creating the file and
    /// its parent directory on demand.
    pub fn upsert_user(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let mut map = if self.path.exists() {
            self.read_map()?
        } else {
            BTreeMap::new()
        };
        map.insert(username.to_string(), hash_password(password));
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AuthError::Io(e.to_string()))?;
            }
        }
        let serialized =
            serde_json::to_string_pretty(&map).map_err(|e| AuthError::Malformed(e.to_string()))?;
        fs::write(&self.path, serialized).map_err(|e| AuthError::Io(e.to_string()))?;
        tracing::info!(user = username, "credential updated");
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, AuthError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| AuthError::Io(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| AuthError::Malformed(e.to_string()))
    }
}

/// `v1$<salt_hex>$<digest_hex>` with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    let digest = iterated_digest(&salt, password);
    format!("{HASH_VERSION}${}${}", to_hex(&salt), to_hex(&digest))
}

/// Recomputes the digest from the stored salt and compares without early
/// exit. Any malformed stored value verifies as false.
#[must_use]
pub fn verify_password(stored: &str, password: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(version), Some(salt_hex), Some(digest_hex), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if version != HASH_VERSION {
        return false;
    }
    let Some(salt) = from_hex(salt_hex) else {
        return false;
    };
    let computed = to_hex(&iterated_digest(&salt, password));
    eq_constant_time(computed.as_bytes(), digest_hex.as_bytes())
}

fn iterated_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let mut digest: [u8; 32] = hasher.finalize().into();
    for _ in 1..HASH_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(digest);
        digest = hasher.finalize().into();
    }
    digest
}

fn eq_constant_time(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

fn from_hex(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }
    (0..input.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(input.get(i..i + 2)?, 16).ok())
        .collect()
}
