//! Storage Shared Key authorization.
//!
//! String-to-sign for service version 2009-09-19 and later:
//!
//! ```text
//! VERB \n Content-Encoding \n Content-Language \n Content-Length \n
//! Content-MD5 \n Content-Type \n Date \n If-Modified-Since \n If-Match \n
//! If-None-Match \n If-Unmodified-Since \n Range \n
//! CanonicalizedHeaders CanonicalizedResource
//! ```
//!
//! Only bodiless requests without standard headers are signed here, so the
//! eleven standard-header lines are always empty.

use std::collections::BTreeMap;
use std::fmt;

use connprobe_core::ProbeError;
use reqwest::{Method, RequestBuilder};
use ring::hmac;
use tracing::trace;
use url::Url;

use super::{decode_key, sign_payload};

/// Storage service version sent in `x-ms-version`.
pub const STORAGE_API_VERSION: &str = "2019-12-12";

/// Signs storage REST requests with an account name and key.
pub struct SharedKeyCredential {
    account: String,
    key: hmac::Key,
}

impl SharedKeyCredential {
    /// Creates a credential from an account name and base64 key.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::BadCredential`] (`Invalid Credential: ...`) if the
    /// key is not valid base64.
    pub fn new(account: impl Into<String>, key: &str) -> Result<Self, ProbeError> {
        let key = decode_key(key).map_err(|e| ProbeError::bad_credential("Invalid Credential", e))?;
        Ok(Self {
            account: account.into(),
            key,
        })
    }

    /// Builds the string-to-sign for a bodiless request.
    ///
    /// `ms_headers` are the `x-ms-*` headers that will be sent.
    pub fn string_to_sign(&self, method: &Method, url: &Url, ms_headers: &[(&str, &str)]) -> String {
        let mut out = String::new();
        out.push_str(method.as_str());
        out.push('\n');
        // Content-Encoding through Range.
        out.push_str(&"\n".repeat(11));
        out.push_str(&canonicalized_headers(ms_headers));
        out.push_str(&self.canonicalized_resource(url));
        out
    }

    /// `/<account><path>` followed by sorted `\nname:value` query lines.
    fn canonicalized_resource(&self, url: &Url) -> String {
        let mut resource = format!("/{}{}", self.account, url.path());

        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in url.query_pairs() {
            params
                .entry(name.to_lowercase())
                .or_default()
                .push(value.into_owned());
        }

        for (name, mut values) in params {
            values.sort();
            resource.push('\n');
            resource.push_str(&name);
            resource.push(':');
            resource.push_str(&values.join(","));
        }

        resource
    }

    /// Returns the `SharedKey <account>:<signature>` header value.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Signing`] if the MAC did not consume the payload.
    pub fn authorization(
        &self,
        method: &Method,
        url: &Url,
        ms_headers: &[(&str, &str)],
    ) -> Result<String, ProbeError> {
        let string_to_sign = self.string_to_sign(method, url, ms_headers);
        trace!(string_to_sign = ?string_to_sign, "Signing shared-key request");
        let signature = sign_payload(&self.key, &string_to_sign)?;
        Ok(format!("SharedKey {}:{signature}", self.account))
    }

    /// Adds the `x-ms-*` headers and `Authorization` to a request.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Signing`] if the MAC did not consume the payload.
    pub fn sign(
        &self,
        request: RequestBuilder,
        method: &Method,
        url: &Url,
        date: &str,
    ) -> Result<RequestBuilder, ProbeError> {
        let ms_headers = [("x-ms-date", date), ("x-ms-version", STORAGE_API_VERSION)];
        let authorization = self.authorization(method, url, &ms_headers)?;

        let mut request = request.header(reqwest::header::AUTHORIZATION, authorization);
        for (name, value) in ms_headers {
            request = request.header(name, value);
        }
        Ok(request)
    }
}

impl fmt::Debug for SharedKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedKeyCredential")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

/// Lower-cased, sorted `name:value\n` lines for `x-ms-*` headers.
fn canonicalized_headers(headers: &[(&str, &str)]) -> String {
    let sorted: BTreeMap<String, &str> = headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.trim()))
        .filter(|(name, _)| name.starts_with("x-ms-"))
        .collect();

    sorted
        .into_iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
