//! `passvault duplicate` — add a copy of an existing record.

use crate::cli::output;
use crate::cli::{load_settings, unlock, vault_store, Cli};
use crate::errors::Result;

/// Execute the `duplicate` command.
pub fn execute(cli: &Cli, id: usize) -> Result<()> {
    let settings = load_settings()?;
    let store = vault_store(cli, &settings)?;
    let mut vault = unlock(&store)?;

    let copy_id = vault.records_mut().duplicate(id)?;
    vault.save()?;

    tracing::info!(id, copy_id, "record duplicated");
    output::success(&format!("Record duplicated (new ID {copy_id})."));

    Ok(())
}
