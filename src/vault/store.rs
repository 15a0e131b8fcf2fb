//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` owns the path of the vault file and knows how to open,
//! initialize, and save it.  Opening returns a `Vault`: the unlocked
//! session holding the decrypted records and the master passphrase.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::crypto::encryption::{decrypt_to_string, encrypt};
use crate::crypto::kdf::KdfParams;
use crate::errors::{PassVaultError, Result};
use crate::password::policy;

use super::format;
use super::lock::VaultLock;
use super::record::{self, RecordSet};

/// What a save did besides writing the vault file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Where the previous vault file was preserved, if its content changed.
    pub backup: Option<PathBuf>,
}

/// Handle on a vault file.  Cheap to create; touches the disk only when
/// one of its methods is called.
#[derive(Debug, Clone)]
pub struct VaultStore {
    /// Path to the vault file on disk.
    path: PathBuf,

    /// PBKDF2 parameters used for every envelope this vault writes or reads.
    kdf: KdfParams,
}

impl VaultStore {
    pub fn new(path: impl Into<PathBuf>, kdf: KdfParams) -> Self {
        Self {
            path: path.into(),
            kdf,
        }
    }

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    /// `true` if the vault file exists and is not empty.
    pub fn is_initialized(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Opening
    // ------------------------------------------------------------------

    /// Open an existing vault.
    ///
    /// Nothing on disk changes if this fails, so the caller can prompt
    /// again.  Wrong passphrase, tampering, and a malformed payload all
    /// surface as `DecryptionFailed`.
    pub fn open(&self, passphrase: &str) -> Result<Vault> {
        // 1. Read the envelope (fails fast if the vault is missing).
        let envelope = format::read_envelope(&self.path)?;

        // 2. Take the session lock before the slow key derivation.
        let lock = VaultLock::acquire(&self.path)?;

        // 3. Decrypt and parse the record array.
        let plaintext = Zeroizing::new(decrypt_to_string(
            &envelope,
            passphrase.as_bytes(),
            &self.kdf,
        )?);
        let records = RecordSet::from_json(&plaintext).map_err(|e| {
            tracing::debug!(error = %e, "decrypted payload is not a record array");
            PassVaultError::DecryptionFailed
        })?;

        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            "vault unlocked"
        );

        Ok(Vault {
            store: self.clone(),
            records,
            passphrase: Zeroizing::new(passphrase.to_string()),
            _lock: lock,
        })
    }

    /// Create the vault for the first time.
    ///
    /// The passphrase must satisfy the strength policy.  There is no
    /// previous content, so no change detection or backup happens.
    pub fn initialize(&self, passphrase: &str, records: RecordSet) -> Result<Vault> {
        if self.is_initialized() {
            return Err(PassVaultError::VaultAlreadyExists(self.path.clone()));
        }
        policy::validate(passphrase)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock = VaultLock::acquire(&self.path)?;

        let plaintext = Zeroizing::new(records.to_json()?);
        self.write(&plaintext, passphrase)?;

        tracing::info!(path = %self.path.display(), "vault initialized");

        Ok(Vault {
            store: self.clone(),
            records,
            passphrase: Zeroizing::new(passphrase.to_string()),
            _lock: lock,
        })
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encrypt `records` with `passphrase` and replace the vault file.
    ///
    /// If a vault already exists, it is first decrypted with the same
    /// passphrase.  When its content differs from `records`, the old file
    /// is kept as a timestamped backup; when it is identical, no backup
    /// is made.  If the existing file cannot be decrypted the save is
    /// refused with `ConsistencyViolation` and the disk is left alone.
    pub fn save(&self, records: &RecordSet, passphrase: &str) -> Result<SaveOutcome> {
        self.save_rotating(records, passphrase, passphrase)
    }

    /// Save protocol with separate passphrases for verifying the existing
    /// file and for encrypting the new one.  A differing pair always
    /// produces a backup, since the old file is only readable with the
    /// old passphrase.
    fn save_rotating(
        &self,
        records: &RecordSet,
        existing_passphrase: &str,
        new_passphrase: &str,
    ) -> Result<SaveOutcome> {
        // 1. Serialize the records to their canonical JSON.
        let plaintext = Zeroizing::new(records.to_json()?);

        // 2. Verify the existing file and back it up if the content changed.
        let backup = if self.is_initialized() {
            let rotating = existing_passphrase != new_passphrase;
            self.backup_if_changed(&plaintext, existing_passphrase, rotating)?
        } else {
            None
        };

        // 3 + 4. Encrypt with fresh salt and nonce, then write atomically.
        self.write(&plaintext, new_passphrase)?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            backup = backup.is_some(),
            "vault saved"
        );

        Ok(SaveOutcome { backup })
    }

    fn write(&self, plaintext: &str, passphrase: &str) -> Result<()> {
        let envelope = encrypt(plaintext.as_bytes(), passphrase.as_bytes(), &self.kdf)?;
        format::write_envelope(&self.path, &envelope)
    }

    /// Decrypt the file currently on disk and preserve it under a backup
    /// name if its plaintext hash differs from `new_plaintext`'s.
    fn backup_if_changed(
        &self,
        new_plaintext: &str,
        passphrase: &str,
        force: bool,
    ) -> Result<Option<PathBuf>> {
        let existing = format::read_envelope(&self.path)
            .and_then(|envelope| decrypt_to_string(&envelope, passphrase.as_bytes(), &self.kdf))
            .map_err(|e| match e {
                PassVaultError::DecryptionFailed => {
                    tracing::error!(
                        path = %self.path.display(),
                        "existing vault does not decrypt with the save passphrase"
                    );
                    PassVaultError::ConsistencyViolation(self.path.clone())
                }
                other => other,
            })?;
        let existing = Zeroizing::new(existing);

        let unchanged = Sha256::digest(new_plaintext.as_bytes())
            == Sha256::digest(existing.as_bytes());
        if unchanged && !force {
            tracing::debug!("vault content unchanged, no backup");
            return Ok(None);
        }

        let target = self.free_backup_path();
        preserve(&self.path, &target)?;
        tracing::info!(backup = %target.display(), "previous vault backed up");

        Ok(Some(target))
    }

    /// First backup name for the current second that is not taken yet.
    fn free_backup_path(&self) -> PathBuf {
        let at = record::now();
        let mut attempt = 0;
        loop {
            let candidate = format::backup_path(&self.path, at, attempt);
            if !candidate.exists() {
                return candidate;
            }
            attempt += 1;
        }
    }
}

/// Give the current vault bytes a second name.  The atomic write that
/// follows replaces `path`, leaving `target` as the only name of the
/// old file.
fn preserve(path: &Path, target: &Path) -> Result<()> {
    if let Err(e) = fs::hard_link(path, target) {
        tracing::debug!(error = %e, "hard link failed, copying vault for backup");
        fs::copy(path, target)?;
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Vault session
// ----------------------------------------------------------------------

/// An unlocked vault: the decrypted records plus the master passphrase.
///
/// Holds an exclusive lock on the vault file until dropped.  The
/// passphrase is wiped from memory on drop.
pub struct Vault {
    store: VaultStore,
    records: RecordSet,
    passphrase: Zeroizing<String>,
    _lock: VaultLock,
}

impl Vault {
    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut RecordSet {
        &mut self.records
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Persist the current records with the session passphrase.
    pub fn save(&self) -> Result<SaveOutcome> {
        self.store.save(&self.records, &self.passphrase)
    }

    /// Constant-time check of `candidate` against the session passphrase.
    pub fn verify_passphrase(&self, candidate: &str) -> bool {
        self.passphrase
            .as_bytes()
            .ct_eq(candidate.as_bytes())
            .into()
    }

    /// Replace the master passphrase and re-encrypt the vault.
    ///
    /// `current` must match the session passphrase and `new` must pass the
    /// strength policy.  The previous vault file is always backed up.
    pub fn change_passphrase(&mut self, current: &str, new: &str) -> Result<SaveOutcome> {
        if !self.verify_passphrase(current) {
            return Err(PassVaultError::PasswordMismatch);
        }
        policy::validate(new)?;

        let outcome = self.store.save_rotating(&self.records, current, new)?;
        self.passphrase = Zeroizing::new(new.to_string());

        tracing::info!(path = %self.path().display(), "master password changed");
        Ok(outcome)
    }

    /// Release the lock without saving.
    pub fn close(self) {}
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("path", &self.store.path())
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}
