//! AES-256-GCM authenticated encryption of a whole payload.
//!
//! Each call to `encrypt` generates a fresh random 16-byte salt and a
//! fresh random 12-byte nonce, derives the key from the passphrase and
//! salt, and returns an `Envelope` with the tag detached from the
//! ciphertext.  `decrypt` re-derives the key from the envelope's own
//! salt.

use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce, Tag};
use zeroize::Zeroize;

use super::envelope::Envelope;
use super::kdf::{derive_key_with_params, generate_salt, KdfParams, SALT_LEN};
use crate::errors::{PassVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under a key derived from `passphrase`.
///
/// Fails only if `params` is rejected by the KDF.
pub fn encrypt(plaintext: &[u8], passphrase: &[u8], params: &KdfParams) -> Result<Envelope> {
    let salt = generate_salt();
    let mut key = derive_key_with_params(passphrase, &salt, params)?;

    let cipher = Aes256Gcm::new_from_slice(&key);
    key.zeroize();
    let cipher = cipher
        .map_err(|e| PassVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // Encrypt in place so the ciphertext keeps the plaintext length
    // and the tag comes back separately.
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut buffer)
        .map_err(|e| PassVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(Envelope {
        salt: salt.to_vec(),
        nonce: nonce.to_vec(),
        ciphertext: buffer,
        tag: tag.to_vec(),
    })
}

/// Decrypt an envelope produced by `encrypt`.
///
/// Every failure (wrong passphrase, flipped bit, truncated field) is
/// reported as `DecryptionFailed`.
pub fn decrypt(envelope: &Envelope, passphrase: &[u8], params: &KdfParams) -> Result<Vec<u8>> {
    if envelope.salt.len() != SALT_LEN
        || envelope.nonce.len() != NONCE_LEN
        || envelope.tag.len() != TAG_LEN
    {
        return Err(PassVaultError::DecryptionFailed);
    }

    let mut key = derive_key_with_params(passphrase, &envelope.salt, params)?;
    let cipher = Aes256Gcm::new_from_slice(&key);
    key.zeroize();
    let cipher = cipher.map_err(|_| PassVaultError::DecryptionFailed)?;

    let nonce = Nonce::from_slice(&envelope.nonce);
    let tag = Tag::from_slice(&envelope.tag);

    let mut buffer = envelope.ciphertext.clone();
    if cipher
        .decrypt_in_place_detached(nonce, b"", &mut buffer, tag)
        .is_err()
    {
        buffer.zeroize();
        return Err(PassVaultError::DecryptionFailed);
    }

    Ok(buffer)
}

/// Decrypt an envelope and interpret the plaintext as UTF-8 text.
///
/// Invalid UTF-8 is treated like any other decryption failure.
pub fn decrypt_to_string(
    envelope: &Envelope,
    passphrase: &[u8],
    params: &KdfParams,
) -> Result<String> {
    let plaintext = decrypt(envelope, passphrase, params)?;
    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        PassVaultError::DecryptionFailed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::MIN_ITERATIONS;

    fn fast() -> KdfParams {
        KdfParams {
            iterations: MIN_ITERATIONS,
        }
    }

    #[test]
    fn ciphertext_has_plaintext_length() {
        let env = encrypt(b"twelve bytes", b"pw", &fast()).unwrap();
        assert_eq!(env.ciphertext.len(), 12);
        assert_eq!(env.salt.len(), SALT_LEN);
        assert_eq!(env.nonce.len(), NONCE_LEN);
        assert_eq!(env.tag.len(), TAG_LEN);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let env = encrypt(b"", b"pw", &fast()).unwrap();
        assert!(env.ciphertext.is_empty());
        assert_eq!(decrypt(&env, b"pw", &fast()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn truncated_fields_fail_closed() {
        let env = encrypt(b"payload", b"pw", &fast()).unwrap();

        let mut short_tag = env.clone();
        short_tag.tag.pop();
        assert!(matches!(
            decrypt(&short_tag, b"pw", &fast()),
            Err(PassVaultError::DecryptionFailed)
        ));

        let mut short_nonce = env.clone();
        short_nonce.nonce.truncate(8);
        assert!(decrypt(&short_nonce, b"pw", &fast()).is_err());

        let mut short_salt = env;
        short_salt.salt.clear();
        assert!(decrypt(&short_salt, b"pw", &fast()).is_err());
    }

    #[test]
    fn non_utf8_plaintext_is_rejected_as_text() {
        let env = encrypt(&[0xff, 0xfe, 0x00], b"pw", &fast()).unwrap();
        assert!(matches!(
            decrypt_to_string(&env, b"pw", &fast()),
            Err(PassVaultError::DecryptionFailed)
        ));
    }
}
