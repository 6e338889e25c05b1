//! Key vault prober.
//!
//! The connection string is just the vault name. Credentials come from the
//! probe context's credential provider; the prober lists the vault's secrets
//! and reports the id of the first one.

mod api;
mod prober;

pub use api::{API_VERSION, SecretItem, SecretListPage, VAULT_RESOURCE};
pub use prober::KeyVaultProber;
