//! Argon2id password hashing (PHC string format).
//!
//! Handlers and use cases go through the async wrappers, which run the hash on
//! the blocking pool so a burst of logins does not stall the runtime workers.

use std::sync::LazyLock;

use anyhow::{Context as _, anyhow};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngExt;

use crate::error::PortalError;

// Hashed with the same parameters as real credentials, so verifying against it
// costs the same as verifying a stored hash.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("portal-dummy-credential").ok());

pub fn hash_password(password: &str) -> Result<String, PortalError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!("encode salt: {e}"))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?
        .to_string();
    Ok(phc)
}

/// Returns `false` for a wrong password and for an unparsable stored hash.
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, PortalError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task")?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(
    hash: String,
    password: String,
) -> Result<bool, PortalError> {
    let ok = tokio::task::spawn_blocking(move || verify_password(&hash, &password))
        .await
        .context("password verification task")?;
    Ok(ok)
}

/// Spend one verification's worth of work on a login for an unknown account.
pub async fn verify_dummy_blocking(password: String) -> Result<(), PortalError> {
    tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = verify_password(hash, &password);
        }
    })
    .await
    .context("password verification task")?;
    Ok(())
}
