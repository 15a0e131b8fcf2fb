//! Password helpers that do not touch the vault file.
//!
//! - Master passphrase strength policy (`policy`)
//! - Random record password generation (`generator`)

pub mod generator;
pub mod policy;

pub use generator::{generate_password, DEFAULT_LENGTH};
pub use policy::{validate, PolicyViolation};
