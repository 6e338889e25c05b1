//! Account information request.

use async_trait::async_trait;
use chrono::Utc;
use connprobe_core::connection_string::{
    ACCOUNT_KEY, ACCOUNT_NAME, BLOB_ENDPOINT, DEFAULT_ENDPOINTS_PROTOCOL, ENDPOINT_SUFFIX,
};
use connprobe_core::{ParsedFields, ProbeError, ProbeOutcome};
use connprobe_fetch::{HttpError, ProbeContext, Prober, SharedKeyCredential, http_date};
use reqwest::Method;
use tracing::{debug, instrument, warn};
use url::Url;

use super::endpoint::blob_endpoint;

/// Response header carrying the account SKU.
pub const SKU_HEADER: &str = "x-ms-sku-name";

/// Response header carrying the service error code.
pub const ERROR_CODE_HEADER: &str = "x-ms-error-code";

const RECOGNIZED: &[&str] = &[
    ACCOUNT_NAME,
    ACCOUNT_KEY,
    DEFAULT_ENDPOINTS_PROTOCOL,
    ENDPOINT_SUFFIX,
    BLOB_ENDPOINT,
];

/// Probes a storage account with its shared key.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageProber;

impl StorageProber {
    /// Creates a new storage prober.
    pub fn new() -> Self {
        Self
    }

    /// Reads the SKU header of a successful answer, or describes the failure.
    fn account_sku(response: &reqwest::Response) -> Result<String, HttpError> {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };

        if response.status().is_success() {
            Ok(header(SKU_HEADER))
        } else {
            Err(HttpError::Status {
                status: response.status().as_u16(),
                body: header(ERROR_CODE_HEADER),
            })
        }
    }
}

#[async_trait]
impl Prober for StorageProber {
    fn id(&self) -> &str {
        "storage"
    }

    #[instrument(skip_all)]
    async fn probe(&self, ctx: &ProbeContext, input: &str) -> Result<ProbeOutcome, ProbeError> {
        let fields = ParsedFields::parse(input, RECOGNIZED);
        let account = fields.require(ACCOUNT_NAME)?;
        let key = fields.require(ACCOUNT_KEY)?;

        let credential = SharedKeyCredential::new(account, key)?;

        let endpoint = blob_endpoint(&fields, account);
        let mut url = Url::parse(&endpoint).map_err(|e| ProbeError::invalid_endpoint("URL Parse", e))?;
        url.query_pairs_mut()
            .append_pair("restype", "account")
            .append_pair("comp", "properties");

        let stage = format!("Get Account {account} Info");
        let date = http_date(Utc::now());
        let request = credential.sign(ctx.http.request(Method::GET, url.clone()), &Method::GET, &url, &date)?;

        debug!(url = %url, "Fetching storage account information");
        let response = ctx
            .http
            .send(request)
            .await
            .map_err(|e| ProbeError::transport(stage.as_str(), e))?;

        match Self::account_sku(&response) {
            Ok(sku) => Ok(ProbeOutcome::ok(format!("Account {account} Info: {sku}"))),
            Err(e) => {
                warn!(error = %e, "Storage service rejected the request");
                Err(ProbeError::upstream(stage, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(input: &str) -> Result<ProbeOutcome, ProbeError> {
        StorageProber::new().probe(&ProbeContext::new(), input).await
    }

    #[tokio::test]
    async fn test_missing_name() {
        let err = run("AccountKey=a2V5").await.unwrap_err();
        assert_eq!(ProbeOutcome::from(err), ProbeOutcome::new(400, "Unknown AccountName"));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let err = run("AccountName=acct").await.unwrap_err();
        assert_eq!(ProbeOutcome::from(err), ProbeOutcome::new(400, "Unknown AccountKey"));
    }

    #[tokio::test]
    async fn test_invalid_key() {
        let err = run("AccountName=acct;AccountKey=!!").await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("Invalid Credential: "), "{err}");
    }

    #[tokio::test]
    async fn test_bad_blob_endpoint() {
        let err = run("AccountName=acct;AccountKey=a2V5;BlobEndpoint=::nope")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("URL Parse Error: "), "{err}");
    }
}
