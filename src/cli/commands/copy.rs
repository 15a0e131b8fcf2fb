//! `passvault copy` — put a record's password on the clipboard.

use arboard::Clipboard;

use crate::cli::output;
use crate::cli::{load_settings, unlock, vault_store, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `copy` command.
pub fn execute(cli: &Cli, id: usize) -> Result<()> {
    let settings = load_settings()?;
    let store = vault_store(cli, &settings)?;
    let vault = unlock(&store)?;

    let record = vault.records().get(id)?;

    let mut clipboard =
        Clipboard::new().map_err(|e| PassVaultError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(record.password.clone())
        .map_err(|e| PassVaultError::ClipboardError(e.to_string()))?;

    output::success(&format!("Password for '{}' copied to clipboard.", record.name));

    Ok(())
}
