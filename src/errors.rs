use std::path::PathBuf;
use thiserror::Error;

use crate::password::PolicyViolation;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong passphrase, tampered envelope, or malformed payload.
    /// The message deliberately does not say which.
    #[error("Decryption failed! Wrong password or data corrupted/tampered.")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Vault at {0} is in use by another process")]
    VaultLocked(PathBuf),

    #[error("Existing vault at {0} cannot be verified with the current password — refusing to overwrite")]
    ConsistencyViolation(PathBuf),

    // --- Record errors ---
    #[error("Record name cannot be empty")]
    EmptyRecordName,

    #[error("No record with ID {0}")]
    RecordNotFound(usize),

    // --- Password errors ---
    #[error("{0}")]
    WeakPassphrase(#[from] PolicyViolation),

    #[error("Password length must be at least {min} characters (got {got})")]
    InvalidPasswordLength { min: usize, got: usize },

    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
