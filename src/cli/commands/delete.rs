//! `passvault delete` — remove a record from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{load_settings, prompt_failed, unlock, vault_store, Cli};
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: usize, force: bool) -> Result<()> {
    let settings = load_settings()?;
    let store = vault_store(cli, &settings)?;
    let mut vault = unlock(&store)?;

    let name = vault.records().get(id)?.name.clone();

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete record {id} '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| prompt_failed(e, "confirm prompt"))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.records_mut().remove(id)?;
    vault.save()?;

    tracing::info!(id, "record deleted");
    output::success(&format!("Deleted record '{name}'"));

    Ok(())
}
