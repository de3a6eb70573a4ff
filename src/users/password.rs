//! Write-only credential attribute of [`User`].
//!
//! A password can be assigned but never read back. Assigned values are
//! stored as Argon2id PHC strings; values that already carry the hash marker
//! are stored as they are, so loading an existing record never double-hashes.

use std::convert::Infallible;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::{debug, error};

use super::model::User;

/// Leading token of every PHC hash string (`$argon2id$...`, `$2b$...`).
pub const HASH_MARKER: &str = "$";

#[derive(Debug, Error)]
pub enum UserError {
    /// Reading the credential is a programming error, never a runtime state.
    #[error("password is write-only and cannot be read")]
    WriteOnly,

    #[error("password hashing failed: {0}")]
    Hash(String),
}

pub fn looks_hashed(value: &str) -> bool {
    value.starts_with(HASH_MARKER)
}

pub fn hash_password(plain: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            UserError::Hash(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool, UserError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        UserError::Hash(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

impl User {
    /// Assigns the credential.
    ///
    /// `None` clears the stored hash. A value starting with [`HASH_MARKER`]
    /// is stored verbatim. Anything else, the empty string included, is
    /// hashed first.
    pub fn set_password(&mut self, value: Option<&str>) -> Result<(), UserError> {
        self.password_hash = match value {
            None => None,
            Some(v) if looks_hashed(v) => Some(v.to_owned()),
            Some(v) => Some(hash_password(v)?),
        };
        debug!(user_id = %self.id, cleared = value.is_none(), "password assigned");
        Ok(())
    }

    /// Always fails: the credential cannot be read back in any state.
    pub fn password(&self) -> Result<Infallible, UserError> {
        Err(UserError::WriteOnly)
    }

    /// Whether `plain` matches the stored hash. False when no hash is set or
    /// the stored value is not a parseable hash.
    pub fn check_password(&self, plain: &str) -> bool {
        self.password_hash
            .as_deref()
            .map(|hash| verify_password(plain, hash).unwrap_or(false))
            .unwrap_or(false)
    }
}
