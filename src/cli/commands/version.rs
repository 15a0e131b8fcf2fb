//! `passvault version` — display version.

use console::style;

use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("passvault {current}");
    println!(
        "{}",
        style("PBKDF2-HMAC-SHA256 key derivation, AES-256-GCM encryption").dim()
    );
    Ok(())
}
