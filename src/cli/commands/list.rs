//! `passvault list` — display all records in a table.

use crate::cli::output;
use crate::cli::{load_settings, unlock, vault_store, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, show_passwords: bool) -> Result<()> {
    let settings = load_settings()?;
    let store = vault_store(cli, &settings)?;
    let vault = unlock(&store)?;

    let records = vault.records();
    output::info(&format!("{} record(s)", records.len()));
    output::print_records_table(records, show_passwords);

    Ok(())
}
