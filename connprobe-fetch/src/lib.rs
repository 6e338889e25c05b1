// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # connprobe Fetch
//!
//! Host APIs and protocol plumbing shared by the connprobe probers.
//!
//! ## Host APIs
//!
//! The [`host`] module provides abstractions for system interactions:
//!
//! - [`host::http`] - Outbound requests with a 20 second end-to-end timeout
//! - [`host::credential`] - Environment-resolved bearer tokens
//! - [`host::trust`] - Root certificates loaded once at startup
//!
//! ## Signing
//!
//! - [`signing::master_key`] - Cosmos DB master-key tokens
//! - [`signing::shared_key`] - Storage Shared Key authorization
//!
//! ## Probing
//!
//! - [`prober::Prober`] - Trait for per-backend probe implementations
//! - [`context::ProbeContext`] - Provides access to host APIs
//!
//! ## Example
//!
//! ```ignore
//! use connprobe_fetch::ProbeContext;
//!
//! let ctx = ProbeContext::builder()
//!     .timeout(std::time::Duration::from_secs(20))
//!     .build();
//!
//! let outcome = ctx.http.execute(ctx.http.get(url)).await;
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod prober;
pub mod signing;

// Errors
pub use error::{CredentialError, HttpError, TrustStoreError};

// Host APIs
pub use host::{
    credential::{AccessToken, CredentialChain, CredentialProvider, StaticCredential},
    http::HttpClient,
    trust::{TrustSource, TrustStore},
};

// Signing
pub use signing::{MasterKeySigner, SharedKeyCredential, http_date};

// Probing
pub use context::{Endpoints, ProbeContext, ProbeContextBuilder, ProbeSettings};
pub use prober::Prober;
