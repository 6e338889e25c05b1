//! Object-storage prober.
//!
//! Fetches the blob service's account information with a Shared Key signed
//! request and reports the account SKU.
//!
//! Connection string fields: `AccountName`, `AccountKey`, and optionally
//! `DefaultEndpointsProtocol`, `EndpointSuffix` or `BlobEndpoint`.

mod endpoint;
mod prober;

pub use endpoint::{DEFAULT_ENDPOINT_SUFFIX, DEFAULT_PROTOCOL, blob_endpoint};
pub use prober::{ERROR_CODE_HEADER, SKU_HEADER, StorageProber};
