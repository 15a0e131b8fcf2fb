//! On-disk vault file: one JSON-encoded `Envelope`, written atomically.
//!
//! ```text
//! {"salt":"<b64>","nonce":"<b64>","ciphertext":"<b64>","tag":"<b64>"}
//! ```
//!
//! Backups live next to the vault file and are named
//! `<stem>_<YYYY_MM_DD_HH_MM_SS><suffix>`, e.g. `data_2024_05_01_13_45_00.bin`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::crypto::Envelope;
use crate::errors::{PassVaultError, Result};

/// Timestamp format embedded in backup file names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Write an envelope to disk **atomically**.
///
/// 1. Serialize the envelope to JSON.
/// 2. Write it to an owner-only temp file in the same directory and sync it.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file.  On failure
/// the temp file is removed and the target is left as it was.
pub fn write_envelope(path: &Path, envelope: &Envelope) -> Result<()> {
    let bytes = serde_json::to_vec(envelope)
        .map_err(|e| PassVaultError::SerializationError(format!("envelope: {e}")))?;

    let tmp_path = sibling_path(path, "tmp");

    let written = write_synced(&tmp_path, &bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            tracing::debug!(tmp = %tmp_path.display(), error = %cleanup, "temp file not removed");
        }
        return Err(e.into());
    }
    Ok(())
}

/// Create (or truncate) `path` with mode 0600 on Unix, write `bytes`, fsync.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    // A stale temp file keeps its old mode; tighten it before writing.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(bytes)?;
    file.sync_all()
}

/// Read the envelope stored at `path`.
///
/// A missing file is `VaultNotFound`; anything that is not a valid
/// envelope is `DecryptionFailed`, the same as a wrong passphrase.
pub fn read_envelope(path: &Path) -> Result<Envelope> {
    if !path.exists() {
        return Err(PassVaultError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;
    serde_json::from_slice(&data).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "vault file is not a valid envelope");
        PassVaultError::DecryptionFailed
    })
}

/// Build the backup path for `path` at time `at`.
///
/// `attempt` > 0 appends `_<attempt>` after the timestamp, used when a
/// backup with the plain name already exists.
pub fn backup_path(path: &Path, at: NaiveDateTime, attempt: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let stamp = at.format(BACKUP_TIMESTAMP_FORMAT);

    let name = if attempt == 0 {
        format!("{stem}_{stamp}{suffix}")
    } else {
        format!("{stem}_{stamp}_{attempt}{suffix}")
    };
    path.with_file_name(name)
}

/// Hidden helper file next to `path`: `.<file-name>.<ext>`.
pub(crate) fn sibling_path(path: &Path, ext: &str) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.{ext}",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn envelope() -> Envelope {
        Envelope {
            salt: vec![1; 16],
            nonce: vec![2; 12],
            ciphertext: vec![3; 5],
            tag: vec![4; 16],
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn write_then_read_envelope() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");

        write_envelope(&path, &envelope()).unwrap();
        assert_eq!(read_envelope(&path).unwrap(), envelope());

        // No temp file left behind.
        assert!(!sibling_path(&path, "tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        write_envelope(&path, &envelope()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn stale_temp_file_is_tightened_to_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        let tmp = sibling_path(&path, "tmp");
        fs::write(&tmp, b"leftover").unwrap();
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o644)).unwrap();

        write_synced(&tmp, b"fresh").unwrap();

        let mode = fs::metadata(&tmp).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read(&tmp).unwrap(), b"fresh");
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory in the way makes the rename fail.
        let path = dir.path().join("data.bin");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        let result = write_envelope(&path, &envelope());

        assert!(matches!(result, Err(PassVaultError::Io(_))));
        assert!(!sibling_path(&path, "tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_envelope(&dir.path().join("missing.bin"));
        assert!(matches!(result, Err(PassVaultError::VaultNotFound(_))));
    }

    #[test]
    fn read_garbage_is_decryption_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"\x80\x04not json").unwrap();
        assert!(matches!(
            read_envelope(&path),
            Err(PassVaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn backup_name_keeps_stem_and_suffix() {
        let path = Path::new("/vaults/data.bin");
        let backup = backup_path(path, at("2024-05-01 13:45:00"), 0);
        assert_eq!(backup, PathBuf::from("/vaults/data_2024_05_01_13_45_00.bin"));
    }

    #[test]
    fn backup_name_without_extension() {
        let path = Path::new("/vaults/passwords");
        let backup = backup_path(path, at("2024-12-31 23:59:59"), 0);
        assert_eq!(backup, PathBuf::from("/vaults/passwords_2024_12_31_23_59_59"));
    }

    #[test]
    fn backup_name_with_collision_counter() {
        let path = Path::new("data.bin");
        let backup = backup_path(path, at("2024-05-01 13:45:00"), 2);
        assert_eq!(backup, PathBuf::from("data_2024_05_01_13_45_00_2.bin"));
    }
}
