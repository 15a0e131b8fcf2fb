//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is not stored in the envelope, so every file a
//! vault has ever written must be opened with the same `KdfParams`.
//! The default matches the count existing vault files were written with.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::errors::{PassVaultError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 600_000;

/// Lowest iteration count we accept, even from a config file.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Configurable PBKDF2 parameters.
///
/// Maps to `kdf_iterations` in `Settings` so the CLI can pass whatever
/// the user configured in `.passvault.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of HMAC-SHA256 rounds (default: 600 000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Derive a 32-byte key from a passphrase and salt with default params.
pub fn derive_key(passphrase: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    derive_key_with_params(passphrase, salt, &KdfParams::default())
}

/// Derive a 32-byte key with explicit PBKDF2 parameters.
///
/// The same passphrase + salt + params always produce the same key.
/// Rejects iteration counts below `MIN_ITERATIONS`.
pub fn derive_key_with_params(
    passphrase: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<[u8; KEY_LEN]> {
    if params.iterations < MIN_ITERATIONS {
        return Err(PassVaultError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
            params.iterations
        )));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase, salt, params.iterations, &mut key);
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_weak_iteration_count() {
        let params = KdfParams { iterations: 1_000 };
        let result = derive_key_with_params(b"passphrase", &[0u8; SALT_LEN], &params);
        assert!(matches!(
            result,
            Err(PassVaultError::KeyDerivationFailed(_))
        ));
    }

    #[test]
    fn minimum_iteration_count_is_accepted() {
        let params = KdfParams {
            iterations: MIN_ITERATIONS,
        };
        let key = derive_key_with_params(b"passphrase", &[7u8; SALT_LEN], &params).unwrap();
        assert_eq!(key.len(), KEY_LEN);
    }

    #[test]
    fn iteration_count_changes_the_key() {
        let salt = [3u8; SALT_LEN];
        let low = KdfParams {
            iterations: MIN_ITERATIONS,
        };
        let high = KdfParams {
            iterations: MIN_ITERATIONS + 1,
        };
        let k1 = derive_key_with_params(b"passphrase", &salt, &low).unwrap();
        let k2 = derive_key_with_params(b"passphrase", &salt, &high).unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
