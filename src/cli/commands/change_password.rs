//! `passvault change-password` — change the vault master password.
//!
//! The vault is re-encrypted under the new password with a fresh salt.
//! The previous file is kept as a timestamped backup.

use crate::cli::output;
use crate::cli::{
    load_settings, password_from_env, prompt_new_password, prompt_password, vault_store, Cli,
};
use crate::errors::{PassVaultError, Result};

/// Execute the `change-password` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let store = vault_store(cli, &settings)?;

    if !store.is_initialized() {
        return Err(PassVaultError::VaultNotFound(store.path().to_path_buf()));
    }

    // 1. Unlock with the current password.  A wrong one is not retried
    //    here; this is the check that guards the change.
    let current = match password_from_env() {
        Some(pw) => pw,
        None => prompt_password("Previous master password")?,
    };
    let mut vault = store.open(&current)?;

    // 2. Choose the new password (policy-checked, confirmed).
    output::info("Choose your new master password.");
    let new_password = prompt_new_password_distinct(&current)?;

    // 3. Re-encrypt and save.
    let outcome = vault.change_passphrase(&current, &new_password)?;

    output::success("Master password updated successfully.");
    if let Some(backup) = outcome.backup {
        output::tip(&format!(
            "The previous vault (old password) was kept at {}",
            backup.display()
        ));
    }

    Ok(())
}

/// Prompt for the new password.  Reusing the current one is refused.
fn prompt_new_password_distinct(current: &str) -> Result<zeroize::Zeroizing<String>> {
    let new_password = prompt_new_password()?;
    if new_password.as_str() == current {
        return Err(PassVaultError::CommandFailed(
            "the new master password is the same as the current one".into(),
        ));
    }
    Ok(new_password)
}
