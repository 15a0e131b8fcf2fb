//! `passvault add` — add a new record to the vault.

use crate::cli::output;
use crate::cli::{load_settings, normalize_field, strip_spaces, unlock, vault_store, Cli};
use crate::errors::Result;
use crate::password::generate_password;
use crate::vault::RecordFields;

/// Values given on the command line for a new record.
pub struct AddArgs<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub mobile: Option<&'a str>,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub description: &'a str,
}

/// Execute the `add` command.
pub fn execute(cli: &Cli, args: &AddArgs<'_>) -> Result<()> {
    let settings = load_settings()?;
    let store = vault_store(cli, &settings)?;

    // Empty values fall back to the configured defaults.
    let pick = |given: Option<&str>, default: &str| match given.map(normalize_field) {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    };

    let mut generated = false;
    let password = match args.password.map(strip_spaces) {
        Some(p) if !p.is_empty() => {
            output::warning("Password provided on command line — it may appear in shell history.");
            p
        }
        _ => {
            generated = true;
            generate_password(settings.generated_password_length)?
        }
    };

    let fields = RecordFields {
        name: args.name.to_string(),
        email: pick(args.email, &settings.default_email),
        mobile: pick(args.mobile, &settings.default_mobile),
        username: pick(args.username, &settings.default_username),
        password,
        description: args.description.trim().to_string(),
    };

    let mut vault = unlock(&store)?;
    let id = vault.records_mut().insert(fields)?;
    vault.save()?;

    tracing::info!(id, "record added");
    output::success(&format!("Record added successfully (ID {id})."));
    if generated {
        output::tip(&format!(
            "A strong password was generated. Run `passvault copy {id}` to copy it."
        ));
    }

    Ok(())
}
