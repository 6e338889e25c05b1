// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Connprobe Probers
//!
//! Per-backend probe implementations and kind dispatch.
//!
//! Each prober takes the raw connection input, performs one minimal
//! handshake against its backend and reports a [`ProbeOutcome`].
//!
//! ## Supported Kinds
//!
//! | Kind | Input | Handshake | Success |
//! |------|-------|-----------|---------|
//! | `nslookup` | hostname | system resolver | 200 with the address list |
//! | `keyvault` | vault name | list secrets with an environment token | 200 first id / 204 empty |
//! | `cosmos` | `AccountEndpoint`, `AccountKey` | master-key signed `GET /dbs` | downstream status |
//! | `storage` | `AccountName`, `AccountKey` | shared-key signed account info | 200 with the SKU |
//! | `insights` | `<app-id>;<app-key>` | metric query with `X-Api-Key` | downstream status |
//! | anything else | driver connection string | open, ping, close | 200 |
//!
//! ## Usage
//!
//! ```ignore
//! use connprobe_core::ProbeRequest;
//! use connprobe_fetch::ProbeContext;
//! use connprobe_probers::ProbeDispatcher;
//!
//! let ctx = ProbeContext::new();
//! let request = ProbeRequest::new("nslookup", "example.com");
//! let outcome = ProbeDispatcher::new().dispatch(&ctx, &request).await;
//! println!("{outcome}");
//! ```
//!
//! [`ProbeOutcome`]: connprobe_core::ProbeOutcome

pub mod descriptor;
pub mod dispatcher;
pub mod registry;

// Prober modules (alphabetical)
pub mod cosmos;
pub mod insights;
pub mod keyvault;
pub mod nslookup;
pub mod sql;
pub mod storage;

// Re-export key types
pub use descriptor::KindDescriptor;
pub use dispatcher::ProbeDispatcher;
pub use registry::KindRegistry;

// Re-export probers
pub use cosmos::CosmosProber;
pub use insights::InsightsProber;
pub use keyvault::KeyVaultProber;
pub use nslookup::NslookupProber;
pub use sql::SqlProber;
pub use storage::StorageProber;
