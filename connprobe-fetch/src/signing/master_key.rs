//! Cosmos DB master-key authorization.
//!
//! The canonical payload is
//!
//! ```text
//! lower(verb) \n lower(resourceType) \n resourceId \n lower(date) \n \n
//! ```
//!
//! The token `type=master&ver=1.0&sig=<base64 hmac>` is query-escaped as a
//! whole before it goes into the `Authorization` header.

use connprobe_core::ProbeError;
use reqwest::RequestBuilder;
use ring::hmac;
use tracing::trace;

use super::{decode_key, sign_payload};

/// REST API version sent in `x-ms-version`.
pub const COSMOS_API_VERSION: &str = "2018-12-31";

/// Header carrying the request date.
pub const DATE_HEADER: &str = "x-ms-date";

/// Header carrying the API version.
pub const VERSION_HEADER: &str = "x-ms-version";

/// Signs Cosmos DB REST requests with an account master key.
#[derive(Debug)]
pub struct MasterKeySigner {
    key: hmac::Key,
}

impl MasterKeySigner {
    /// Decodes a base64 master key.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::BadCredential`] (`Master Key Decode Error: ...`)
    /// if the key is not valid base64.
    pub fn from_base64(master_key: &str) -> Result<Self, ProbeError> {
        let key = decode_key(master_key)
            .map_err(|e| ProbeError::bad_credential("Master Key Decode Error", e))?;
        Ok(Self { key })
    }

    /// Builds the canonical payload that gets signed.
    pub fn canonical_payload(
        verb: &str,
        resource_type: &str,
        resource_id: &str,
        date: &str,
    ) -> String {
        format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_lowercase(),
            resource_type.to_lowercase(),
            resource_id,
            date.to_lowercase()
        )
    }

    /// Returns the base64 HMAC-SHA256 of the canonical payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Signing`] if the MAC did not consume the payload.
    pub fn signature(
        &self,
        verb: &str,
        resource_type: &str,
        resource_id: &str,
        date: &str,
    ) -> Result<String, ProbeError> {
        let payload = Self::canonical_payload(verb, resource_type, resource_id, date);
        trace!(payload = ?payload, "Signing master-key payload");
        sign_payload(&self.key, &payload)
    }

    /// Returns the query-escaped `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Signing`] if the MAC did not consume the payload.
    pub fn authorization(
        &self,
        verb: &str,
        resource_type: &str,
        resource_id: &str,
        date: &str,
    ) -> Result<String, ProbeError> {
        let sig = self.signature(verb, resource_type, resource_id, date)?;
        let token = format!("type=master&ver=1.0&sig={sig}");
        Ok(url::form_urlencoded::byte_serialize(token.as_bytes()).collect())
    }

    /// Adds `Authorization`, `x-ms-date` and `x-ms-version` to a request.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Signing`] if the MAC did not consume the payload.
    pub fn sign(
        &self,
        request: RequestBuilder,
        verb: &str,
        resource_type: &str,
        resource_id: &str,
        date: &str,
    ) -> Result<RequestBuilder, ProbeError> {
        let authorization = self.authorization(verb, resource_type, resource_id, date)?;
        Ok(request
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(DATE_HEADER, date)
            .header(VERSION_HEADER, COSMOS_API_VERSION))
    }
}

// ============================================================================
// Tests
// ============================================================================
