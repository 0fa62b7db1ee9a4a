//! Password hashing and registration validation
//!
//! Passwords are stored as `"<salt>:<digest>"` where the salt is 16 random
//! bytes in hex and the digest is SHA-256 over `salt + password`.

use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

const SALT_BYTES: usize = 16;
const SEPARATOR: char = ':';

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// A violated registration rule
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegistrationError {
    #[error("Username must be at least 3 characters.")]
    UsernameTooShort,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("Passwords do not match.")]
    PasswordMismatch,
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    let hashed = digest(&salt, password);
    format!("{}{}{}", salt, SEPARATOR, hashed)
}

/// Check a password against a stored `salt:digest` value.
///
/// Anything that is not exactly two `:`-separated parts verifies as false.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Some((salt, hashed)) = stored_hash.split_once(SEPARATOR) else {
        return false;
    };
    if hashed.contains(SEPARATOR) {
        return false;
    }
    digest(salt, password) == hashed
}

/// Every rule the registration form violates, in form order
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Vec<RegistrationError> {
    let mut errors = Vec::new();

    if username.chars().count() < MIN_USERNAME_LEN {
        errors.push(RegistrationError::UsernameTooShort);
    }
    if !email.contains('@') {
        errors.push(RegistrationError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(RegistrationError::PasswordTooShort);
    }
    if password != confirm {
        errors.push(RegistrationError::PasswordMismatch);
    }

    errors
}
