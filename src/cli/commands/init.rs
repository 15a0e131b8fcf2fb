//! `passvault init` — create a new vault and choose the master password.

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, vault_store, Cli};
use crate::errors::{PassVaultError, Result};
use crate::vault::RecordSet;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let store = vault_store(cli, &settings)?;

    // 1. Refuse to overwrite an existing vault.
    if store.is_initialized() {
        output::tip("Use `passvault add` to add records to the existing vault.");
        return Err(PassVaultError::VaultAlreadyExists(store.path().to_path_buf()));
    }

    // 2. Choose the master password (policy-checked, confirmed).
    output::info("Set up your master password for the first time.");
    let password = prompt_new_password()?;

    // 3. Write an empty vault.
    let vault = store.initialize(&password, RecordSet::new())?;
    output::success(&format!(
        "Master password set. Vault created at {}",
        vault.path().display()
    ));

    // 4. Show helpful tips.
    output::tip("Run `passvault add --name <NAME>` to add a record.");
    output::tip("Run `passvault list` to see all records.");

    Ok(())
}
