use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, DEFAULT_ITERATIONS};
use crate::errors::{PassVaultError, Result};

/// User configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file path, relative to the working directory unless absolute.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// PBKDF2 iteration count (default: 600 000).
    ///
    /// Changing this makes existing vault files unreadable.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Length of passwords generated for new records (default: 24).
    #[serde(default = "default_generated_password_length")]
    pub generated_password_length: usize,

    /// Email used by `add` when none is given.
    #[serde(default)]
    pub default_email: String,

    /// Mobile number used by `add` when none is given.
    #[serde(default)]
    pub default_mobile: String,

    /// Username used by `add` when none is given.
    #[serde(default)]
    pub default_username: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "data.bin".to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_generated_password_length() -> usize {
    crate::password::DEFAULT_LENGTH
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            kdf_iterations: default_kdf_iterations(),
            generated_password_length: default_generated_password_length(),
            default_email: String::new(),
            default_mobile: String::new(),
            default_username: String::new(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(config = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Resolve the vault file path against `dir`.
    ///
    /// Example: `dir/data.bin`
    pub fn vault_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.vault_file)
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            iterations: self.kdf_iterations,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
