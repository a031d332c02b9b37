//! Password verification against stored hash material.
//!
//! Security boundaries: the presented secret only travels as a
//! [`SecretString`] and is never logged or echoed back; comparisons go through
//! constant-time primitives so verification time does not depend on where the
//! first mismatching byte occurs.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use base64ct::{Base64, Encoding};
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hashing scheme recorded alongside each stored credential.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashScheme {
    /// Argon2id in PHC string format. The default for new credentials.
    Argon2id,
    /// Base64-encoded SHA-256 digest. Kept for records imported from legacy
    /// stores.
    Sha256,
}

impl HashScheme {
    /// Parse an algorithm identifier as stored in the credential store.
    #[must_use]
    pub fn parse(identifier: &str) -> Option<Self> {
        match identifier {
            "argon2id" => Some(Self::Argon2id),
            "sha256" => Some(Self::Sha256),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Argon2id => "argon2id",
            Self::Sha256 => "sha256",
        }
    }
}

/// Compare a presented secret against stored hash material.
///
/// Malformed stored hashes fail closed. An unknown scheme never reaches this
/// function; the store rejects such records at lookup time.
#[must_use]
pub fn verify(presented: &SecretString, stored_hash: &str, scheme: HashScheme) -> bool {
    match scheme {
        HashScheme::Argon2id => verify_argon2id(presented, stored_hash),
        HashScheme::Sha256 => verify_sha256(presented, stored_hash),
    }
}

fn verify_argon2id(presented: &SecretString, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(presented.expose_secret().as_bytes(), &parsed)
        .is_ok()
}

fn verify_sha256(presented: &SecretString, stored_hash: &str) -> bool {
    let Ok(stored) = Base64::decode_vec(stored_hash) else {
        return false;
    };
    let digest = Sha256::digest(presented.expose_secret().as_bytes());
    if stored.len() != digest.len() {
        // Length check only reveals that the stored record is malformed.
        return false;
    }
    digest.as_slice().ct_eq(&stored).into()
}

/// Hash a secret with Argon2id for storage (fixtures and provisioning tools).
///
/// # Errors
///
/// Returns an error if the Argon2 hasher rejects its inputs.
pub fn argon2id_hash(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

/// Hash a secret with SHA-256 for storage in the legacy scheme.
#[must_use]
pub fn sha256_hash(secret: &str) -> String {
    Base64::encode_string(&Sha256::digest(secret.as_bytes()))
}
