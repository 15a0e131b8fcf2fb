//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - AES-256-GCM encryption and decryption of whole payloads (`encryption`)
//! - The four-field `Envelope` persisted on disk (`envelope`)

pub mod encryption;
pub mod envelope;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, Envelope, ...};
pub use encryption::{decrypt, decrypt_to_string, encrypt};
pub use envelope::Envelope;
pub use kdf::{derive_key, derive_key_with_params, generate_salt, KdfParams};
