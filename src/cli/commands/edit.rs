//! `passvault edit` — change fields of an existing record.
//!
//! Only the fields given on the command line are touched.  The record's
//! update time moves only if some value really changed.

use crate::cli::output;
use crate::cli::{load_settings, normalize_field, strip_spaces, unlock, vault_store, Cli};
use crate::errors::Result;
use crate::password::generate_password;
use crate::vault::RecordUpdate;

/// Values given on the command line for `edit`.
pub struct EditArgs<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub mobile: Option<&'a str>,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub new_password: bool,
    pub description: Option<&'a str>,
}

/// Execute the `edit` command.
pub fn execute(cli: &Cli, id: usize, args: &EditArgs<'_>) -> Result<()> {
    let settings = load_settings()?;
    let store = vault_store(cli, &settings)?;

    let password = if args.new_password {
        Some(generate_password(settings.generated_password_length)?)
    } else {
        args.password.map(strip_spaces)
    };

    let update = RecordUpdate {
        name: args.name.map(str::to_string),
        email: args.email.map(normalize_field),
        mobile: args.mobile.map(normalize_field),
        username: args.username.map(normalize_field),
        password,
        description: args.description.map(|d| d.trim().to_string()),
    };

    let mut vault = unlock(&store)?;
    let Some(new_id) = vault.records_mut().update(id, update)? else {
        output::info("Nothing changed.");
        return Ok(());
    };

    vault.save()?;
    tracing::info!(id, new_id, "record updated");
    output::success("Record updated successfully.");
    if new_id != id {
        output::tip(&format!("The record's ID is now {new_id}."));
    }

    Ok(())
}
