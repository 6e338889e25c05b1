//! Cosmos DB prober.
//!
//! Lists databases at the account root with a master-key signed request and
//! reports the service's answer verbatim.
//!
//! Connection string: `AccountEndpoint=https://<acct>.documents.azure.com:443/;AccountKey=<base64>`

use async_trait::async_trait;
use chrono::Utc;
use connprobe_core::connection_string::{ACCOUNT_ENDPOINT, ACCOUNT_KEY};
use connprobe_core::{ParsedFields, ProbeError, ProbeOutcome};
use connprobe_fetch::{MasterKeySigner, ProbeContext, Prober, http_date};
use tracing::{debug, instrument};
use url::Url;

/// Verb used for the database listing.
const VERB: &str = "GET";

/// Resource type of the database listing.
const RESOURCE_TYPE: &str = "dbs";

/// Path of the database listing; replaces any path in the endpoint.
const LIST_PATH: &str = "/dbs";

/// Probes a Cosmos DB account with its master key.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosmosProber;

impl CosmosProber {
    /// Creates a new Cosmos DB prober.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Prober for CosmosProber {
    fn id(&self) -> &str {
        "cosmos"
    }

    #[instrument(skip_all)]
    async fn probe(&self, ctx: &ProbeContext, input: &str) -> Result<ProbeOutcome, ProbeError> {
        let fields = ParsedFields::parse(input, &[ACCOUNT_ENDPOINT, ACCOUNT_KEY]);
        let endpoint = fields.require(ACCOUNT_ENDPOINT)?;
        let key = fields.require(ACCOUNT_KEY)?;

        let mut url =
            Url::parse(endpoint).map_err(|e| ProbeError::invalid_endpoint("Parse Endpoint", e))?;
        url.set_path(LIST_PATH);

        let date = http_date(Utc::now());
        let signer = MasterKeySigner::from_base64(key)?;

        debug!(url = %url, "Listing Cosmos DB databases");
        let request = signer.sign(ctx.http.get(url), VERB, RESOURCE_TYPE, "", &date)?;

        Ok(ctx.http.execute(request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(input: &str) -> Result<ProbeOutcome, ProbeError> {
        CosmosProber::new().probe(&ProbeContext::new(), input).await
    }

    #[tokio::test]
    async fn test_missing_endpoint() {
        let err = run("AccountKey=c2VjcmV0").await.unwrap_err();
        assert_eq!(ProbeOutcome::from(err), ProbeOutcome::new(400, "Unknown AccountEndpoint"));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let err = run("AccountEndpoint=https://acct.documents.azure.com:443/").await.unwrap_err();
        assert_eq!(ProbeOutcome::from(err), ProbeOutcome::new(400, "Unknown AccountKey"));
    }

    #[tokio::test]
    async fn test_endpoint_checked_before_key() {
        let err = run("Nothing=here").await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown AccountEndpoint");
    }

    #[tokio::test]
    async fn test_malformed_endpoint() {
        let err = run("AccountEndpoint=not a url;AccountKey=c2VjcmV0").await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("Parse Endpoint Error: "), "{err}");
    }

    #[tokio::test]
    async fn test_undecodable_key() {
        let err = run("AccountEndpoint=https://acct.documents.azure.com/;AccountKey=***")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("Master Key Decode Error: "), "{err}");
    }
}
