//! Secret listing probe.

use async_trait::async_trait;
use connprobe_core::{ProbeError, ProbeOutcome};
use connprobe_fetch::{HttpError, ProbeContext, Prober};
use tracing::{debug, instrument, warn};
use url::Url;

use super::api::{API_VERSION, SecretListPage, VAULT_RESOURCE};

/// Stage label for listing failures.
const LIST_STAGE: &str = "List Secrets";
const URL_STAGE: &str = "URL Parse";

/// Probes a key vault with environment credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyVaultProber;

impl KeyVaultProber {
    /// Creates a new key vault prober.
    pub fn new() -> Self {
        Self
    }

    fn secrets_url(ctx: &ProbeContext, vault: &str) -> Result<Url, ProbeError> {
        let base = ctx.settings.endpoints.key_vault(vault);
        let mut url = Url::parse(&base).map_err(|e| ProbeError::invalid_endpoint(URL_STAGE, e))?;
        url.path_segments_mut()
            .map_err(|()| ProbeError::invalid_endpoint(URL_STAGE, format!("{base} cannot be a base")))?
            .pop_if_empty()
            .push("secrets");
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }

    /// Fetches the first page of the secret listing.
    async fn list_first_page(ctx: &ProbeContext, url: Url, bearer: String) -> Result<SecretListPage, ProbeError> {
        let request = ctx
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, bearer);
        let response = ctx
            .http
            .send(request)
            .await
            .map_err(|e| ProbeError::upstream(LIST_STAGE, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::upstream(LIST_STAGE, HttpError::from(e)))?;

        if !status.is_success() {
            return Err(ProbeError::upstream(
                LIST_STAGE,
                HttpError::Status {
                    status: status.as_u16(),
                    body,
                },
            ));
        }

        serde_json::from_str(&body).map_err(|e| ProbeError::upstream(LIST_STAGE, e))
    }
}

#[async_trait]
impl Prober for KeyVaultProber {
    fn id(&self) -> &str {
        "keyvault"
    }

    #[instrument(skip(self, ctx))]
    async fn probe(&self, ctx: &ProbeContext, input: &str) -> Result<ProbeOutcome, ProbeError> {
        let token = ctx
            .credentials
            .get_token(VAULT_RESOURCE)
            .await
            .map_err(|e| {
                warn!(error = %e, provider = ctx.credentials.name(), "No key vault credential");
                ProbeError::bad_credential("Auth Error", e)
            })?;

        let url = Self::secrets_url(ctx, input)?;
        debug!(url = %url, "Listing key vault secrets");

        let page = Self::list_first_page(ctx, url, token.bearer()).await?;
        match page.first_id() {
            Some(id) => Ok(ProbeOutcome::ok(format!("KeyVault {input}: First Secret ID: {id}"))),
            None => Ok(ProbeOutcome::no_content(format!("KeyVault {input}: Secret Not Found"))),
        }
    }
}
