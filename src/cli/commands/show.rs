//! `passvault show` — print every field of one record.

use crate::cli::output;
use crate::cli::{load_settings, unlock, vault_store, Cli};
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: usize) -> Result<()> {
    let settings = load_settings()?;
    let store = vault_store(cli, &settings)?;
    let vault = unlock(&store)?;

    let record = vault.records().get(id)?;
    output::print_record_details(record);

    Ok(())
}
