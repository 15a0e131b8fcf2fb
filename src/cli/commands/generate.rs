//! `passvault generate` — print a random password.

use crate::cli::load_settings;
use crate::errors::Result;
use crate::password::generate_password;

/// Execute the `generate` command.
pub fn execute(length: Option<usize>) -> Result<()> {
    let length = match length {
        Some(l) => l,
        None => load_settings()?.generated_password_length,
    };
    println!("{}", generate_password(length)?);
    Ok(())
}
