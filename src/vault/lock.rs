//! Exclusive advisory lock held while a vault is unlocked.
//!
//! The lock lives on a hidden sibling file (`.<name>.lock`), not on the
//! vault file, since every save replaces the vault file's inode.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::errors::{PassVaultError, Result};

use super::format::sibling_path;

/// Held for as long as a `Vault` session lives.  Dropping it closes the
/// file descriptor, which releases the lock.
#[derive(Debug)]
pub struct VaultLock {
    _file: File,
    path: PathBuf,
}

impl VaultLock {
    /// Try to take the lock for the vault at `vault_path` without blocking.
    ///
    /// Returns `VaultLocked` if another process holds it.
    pub fn acquire(vault_path: &Path) -> Result<Self> {
        let path = sibling_path(vault_path, "lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        try_lock_exclusive(&file, vault_path)?;
        tracing::debug!(lock = %path.display(), "acquired vault lock");

        Ok(Self { _file: file, path })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File, vault_path: &Path) -> Result<()> {
    use std::os::unix::io::AsRawFd;

    // SAFETY: the descriptor is owned by `file`, which outlives the call.
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    if err.kind() == std::io::ErrorKind::WouldBlock {
        Err(PassVaultError::VaultLocked(vault_path.to_path_buf()))
    } else {
        Err(PassVaultError::Io(err))
    }
}

#[cfg(not(unix))]
fn try_lock_exclusive(_file: &File, _vault_path: &Path) -> Result<()> {
    Ok(())
}
