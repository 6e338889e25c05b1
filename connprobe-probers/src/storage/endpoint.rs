//! Blob service endpoint resolution.

use connprobe_core::ParsedFields;
use connprobe_core::connection_string::{
    BLOB_ENDPOINT, DEFAULT_ENDPOINTS_PROTOCOL, ENDPOINT_SUFFIX,
};

/// Protocol used when the connection string names none.
pub const DEFAULT_PROTOCOL: &str = "https";

/// Public-cloud endpoint suffix.
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Returns the blob service URL for `account`, always ending in `/`.
///
/// An explicit `BlobEndpoint` wins; otherwise the URL is built from the
/// protocol and suffix fields.
pub fn blob_endpoint(fields: &ParsedFields, account: &str) -> String {
    if let Some(explicit) = fields.get(BLOB_ENDPOINT).filter(|v| !v.is_empty()) {
        return if explicit.ends_with('/') {
            explicit.to_string()
        } else {
            format!("{explicit}/")
        };
    }

    let protocol = fields
        .get(DEFAULT_ENDPOINTS_PROTOCOL)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_PROTOCOL);
    let suffix = fields
        .get(ENDPOINT_SUFFIX)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_ENDPOINT_SUFFIX);

    format!("{protocol}://{account}.blob.{suffix}/")
}
