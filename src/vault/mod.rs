//! Vault module — the encrypted record store.
//!
//! This module provides:
//! - `Record` and `RecordSet`, the decrypted payload (`record`)
//! - The on-disk envelope file and backup naming (`format`)
//! - An exclusive advisory lock for unlocked sessions (`lock`)
//! - `VaultStore` and the unlocked `Vault` session (`store`)

pub mod format;
pub mod lock;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use record::{Record, RecordFields, RecordSet, RecordUpdate};
pub use store::{SaveOutcome, Vault, VaultStore};
