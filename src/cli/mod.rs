//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::password::policy;
use crate::vault::{Vault, VaultStore};

/// Environment variable that supplies the master password non-interactively.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// Number of password attempts before `unlock` gives up.
const MAX_UNLOCK_ATTEMPTS: usize = 3;

/// PassVault CLI: local encrypted password vault.
#[derive(Parser)]
#[command(name = "passvault", about = "Local encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: `vault_file` from .passvault.toml, or data.bin)
    #[arg(long, global = true, env = "PASSVAULT_FILE")]
    pub vault: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault and choose the master password
    Init,

    /// Add a new record
    Add {
        /// Site, application, or device name
        #[arg(short, long)]
        name: String,
        /// Email address (default from config)
        #[arg(long)]
        email: Option<String>,
        /// Mobile number (default from config)
        #[arg(long)]
        mobile: Option<String>,
        /// Username (default from config)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (omit to generate a strong one)
        #[arg(short, long)]
        password: Option<String>,
        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List all records
    List {
        /// Show passwords instead of masking them
        #[arg(short = 's', long)]
        show_passwords: bool,
    },

    /// Show every field of one record
    Show {
        /// Record ID as shown by `list`
        id: usize,
    },

    /// Change fields of a record (only the given fields change)
    Edit {
        /// Record ID as shown by `list`
        id: usize,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        mobile: Option<String>,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long, conflicts_with = "new_password")]
        password: Option<String>,
        /// Replace the password with a freshly generated one
        #[arg(long)]
        new_password: bool,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Add a copy of a record
    Duplicate {
        /// Record ID as shown by `list`
        id: usize,
    },

    /// Delete a record
    Delete {
        /// Record ID as shown by `list`
        id: usize,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Copy a record's password to the clipboard
    Copy {
        /// Record ID as shown by `list`
        id: usize,
    },

    /// Change the vault's master password
    ChangePassword,

    /// Print a randomly generated password
    Generate {
        /// Password length (default from config)
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Show version
    Version,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.passvault.toml` from the working directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Build the `VaultStore` for the CLI arguments and settings.
///
/// `--vault` wins over `vault_file` from the config.
pub fn vault_store(cli: &Cli, settings: &Settings) -> Result<VaultStore> {
    let cwd = std::env::current_dir()?;
    let path = match &cli.vault {
        Some(p) => cwd.join(p),
        None => settings.vault_path(&cwd),
    };
    Ok(VaultStore::new(path, settings.kdf_params()))
}

/// Open the vault, prompting for the master password.
///
/// A wrong password is re-prompted up to `MAX_UNLOCK_ATTEMPTS` times
/// when interactive; with `PASSVAULT_PASSWORD` set it fails at once.
pub fn unlock(store: &VaultStore) -> Result<Vault> {
    if !store.is_initialized() {
        output::tip("Run `passvault init` to create a vault.");
        return Err(PassVaultError::VaultNotFound(store.path().to_path_buf()));
    }

    if let Some(pw) = password_from_env() {
        return store.open(&pw);
    }

    let mut attempt = 1;
    loop {
        let password = prompt_password("Master password")?;
        match store.open(&password) {
            Err(PassVaultError::DecryptionFailed) if attempt < MAX_UNLOCK_ATTEMPTS => {
                output::error(&PassVaultError::DecryptionFailed.to_string());
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// `PASSVAULT_PASSWORD`, if set and non-empty.
pub(crate) fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(strip_spaces(&pw))),
        _ => None,
    }
}

/// Prompt for an existing password without echo.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| prompt_failed(e, "password prompt"))?;
    Ok(Zeroizing::new(strip_spaces(&pw)))
}

/// Map a dialoguer failure to our error type.  An interrupted prompt
/// (Ctrl-C) is `UserCancelled`.
pub(crate) fn prompt_failed(err: dialoguer::Error, what: &str) -> PassVaultError {
    match err {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            PassVaultError::UserCancelled
        }
        other => PassVaultError::CommandFailed(format!("{what}: {other}")),
    }
}

/// Prompt for a new master password with confirmation.
///
/// Respects `PASSVAULT_PASSWORD` for scripted usage.  Interactive input
/// that fails the strength policy is rejected and asked for again.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        policy::validate(&pw)?;
        return Ok(pw);
    }

    loop {
        let password = prompt_password("New master password")?;

        if let Err(e) = policy::validate(&password) {
            output::warning(&e.to_string());
            continue;
        }

        let confirmation = prompt_password("Confirm new master password")?;
        if *password != *confirmation {
            output::warning("Passwords are not the same! Please try again.");
            continue;
        }

        return Ok(password);
    }
}

/// Remove every space from a password as it is typed.
pub fn strip_spaces(value: &str) -> String {
    value.chars().filter(|c| *c != ' ').collect()
}

/// Normalize an email, mobile, or username: lower-case, no spaces.
pub fn normalize_field(value: &str) -> String {
    strip_spaces(value).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn strip_spaces_removes_all_spaces() {
        assert_eq!(strip_spaces(" My Pass  Word "), "MyPassWord");
        assert_eq!(strip_spaces("tab\tkept"), "tab\tkept");
    }

    #[test]
    fn normalize_field_lowercases() {
        assert_eq!(normalize_field(" Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_field("555 0100"), "5550100");
    }

    #[test]
    fn interrupted_prompt_is_a_cancellation() {
        let err = dialoguer::Error::from(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(matches!(
            prompt_failed(err, "password prompt"),
            PassVaultError::UserCancelled
        ));
    }

    #[test]
    fn other_prompt_failures_are_command_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "not a terminal");
        let err = dialoguer::Error::from(io);
        let mapped = prompt_failed(err, "confirm prompt");
        assert!(matches!(mapped, PassVaultError::CommandFailed(_)));
        assert!(mapped.to_string().contains("confirm prompt"));
    }

    #[test]
    fn edit_rejects_password_with_new_password() {
        let result = Cli::try_parse_from([
            "passvault",
            "edit",
            "1",
            "--password",
            "x",
            "--new-password",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn vault_flag_is_global() {
        let cli = Cli::try_parse_from(["passvault", "list", "--vault", "other.bin"]).unwrap();
        assert_eq!(cli.vault.as_deref(), Some("other.bin"));
    }
}
