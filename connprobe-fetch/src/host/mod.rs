//! Host APIs for connprobe probers.
//!
//! - [`http`] - Outbound HTTP with a bounded timeout
//! - [`credential`] - Bearer tokens resolved from the environment
//! - [`trust`] - Root certificates for driver TLS

pub mod credential;
pub mod http;
pub mod trust;

// Re-export key types
pub use credential::{AccessToken, CredentialChain, CredentialProvider, StaticCredential};
pub use http::HttpClient;
pub use trust::{TrustSource, TrustStore};
