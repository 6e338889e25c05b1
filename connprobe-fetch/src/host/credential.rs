//! Bearer-token credentials resolved from the process environment.
//!
//! Key vault is the one backend whose credentials do not come from the
//! connection string. Instead a [`CredentialProvider`] is injected through
//! the probe context. The default is a [`CredentialChain`] built from the
//! environment:
//!
//! 1. [`ClientSecretCredential`] when `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`
//!    and `AZURE_CLIENT_SECRET` are all set
//! 2. [`ManagedIdentityCredential`] via the instance metadata service
//!
//! Tests substitute a [`StaticCredential`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::CredentialError;
use crate::host::http::HttpClient;

/// Default Entra ID authority.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Instance metadata service token endpoint.
pub const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

/// IMDS API version.
const IMDS_API_VERSION: &str = "2018-02-01";

/// IMDS is link-local; give up quickly when it isn't there.
const IMDS_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable names.
pub mod env {
    /// Directory (tenant) id.
    pub const TENANT_ID: &str = "AZURE_TENANT_ID";
    /// Application (client) id.
    pub const CLIENT_ID: &str = "AZURE_CLIENT_ID";
    /// Client secret.
    pub const CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
    /// Authority host override.
    pub const AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";
}

// ============================================================================
// Access Token
// ============================================================================

/// A bearer token for one resource.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The raw token.
    pub token: String,
    /// Expiry as a unix timestamp, when the issuer reports it.
    pub expires_on: Option<i64>,
}

impl AccessToken {
    /// Creates a token without expiry information.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_on: None,
        }
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// OAuth token endpoint response. Both v1 endpoints and IMDS report
/// `expires_on` as a string; some proxies send a number.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_on: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    String(String),
}

impl NumberOrString {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.parse().ok(),
        }
    }
}

fn parse_token(source_name: &str, body: &str) -> Result<AccessToken, CredentialError> {
    let parsed: TokenResponse =
        serde_json::from_str(body).map_err(|e| CredentialError::InvalidResponse {
            source_name: source_name.to_string(),
            detail: e.to_string(),
        })?;

    Ok(AccessToken {
        token: parsed.access_token,
        expires_on: parsed.expires_on.as_ref().and_then(NumberOrString::as_i64),
    })
}

// ============================================================================
// Credential Provider Trait
// ============================================================================

/// Resolves bearer tokens for a resource.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Fetches a token for `resource` (e.g. `https://vault.azure.net`).
    async fn get_token(&self, resource: &str) -> Result<AccessToken, CredentialError>;
}

// ============================================================================
// Client Secret
// ============================================================================

/// OAuth2 client-credentials grant against an Entra ID tenant.
#[derive(Clone)]
pub struct ClientSecretCredential {
    http: HttpClient,
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl ClientSecretCredential {
    const NAME: &'static str = "ClientSecretCredential";

    /// Creates a credential from explicit values.
    pub fn new(
        http: HttpClient,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Overrides the authority host (sovereign clouds, tests).
    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.authority_host = host.into();
        self
    }

    /// Reads the credential from variables returned by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NotConfigured`] naming the first missing variable.
    pub fn from_lookup(
        http: HttpClient,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CredentialError> {
        let var = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CredentialError::NotConfigured {
                    source_name: Self::NAME.to_string(),
                    reason: format!("{name} is not set"),
                })
        };

        let mut credential = Self::new(
            http,
            var(env::TENANT_ID)?,
            var(env::CLIENT_ID)?,
            var(env::CLIENT_SECRET)?,
        );
        if let Some(host) = lookup(env::AUTHORITY_HOST).filter(|v| !v.is_empty()) {
            credential = credential.with_authority_host(host);
        }
        Ok(credential)
    }

    fn token_url(&self) -> Result<Url, CredentialError> {
        let raw = format!(
            "{}/{}/oauth2/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        );
        Url::parse(&raw).map_err(|e| CredentialError::NotConfigured {
            source_name: Self::NAME.to_string(),
            reason: format!("invalid authority URL {raw}: {e}"),
        })
    }
}

impl fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("authority_host", &self.authority_host)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialProvider for ClientSecretCredential {
    fn name(&self) -> &str {
        Self::NAME
    }

    #[instrument(skip(self), fields(tenant = %self.tenant_id))]
    async fn get_token(&self, resource: &str) -> Result<AccessToken, CredentialError> {
        let url = self.token_url()?;
        debug!(url = %url, "Requesting client-credentials token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("resource", resource),
        ];
        let request = self.http.request(reqwest::Method::POST, url).form(&form);

        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| CredentialError::Request {
                source_name: Self::NAME.to_string(),
                detail: e.to_string(),
            })?;

        read_token_response(Self::NAME, response).await
    }
}

// ============================================================================
// Managed Identity
// ============================================================================

/// Token from the instance metadata service of the host VM or container.
#[derive(Debug, Clone)]
pub struct ManagedIdentityCredential {
    http: HttpClient,
    endpoint: String,
    client_id: Option<String>,
}

impl ManagedIdentityCredential {
    const NAME: &'static str = "ManagedIdentityCredential";

    /// Creates a credential for the system-assigned identity.
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            endpoint: IMDS_TOKEN_ENDPOINT.to_string(),
            client_id: None,
        }
    }

    /// Selects a user-assigned identity.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Overrides the token endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl CredentialProvider for ManagedIdentityCredential {
    fn name(&self) -> &str {
        Self::NAME
    }

    #[instrument(skip(self))]
    async fn get_token(&self, resource: &str) -> Result<AccessToken, CredentialError> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| CredentialError::NotConfigured {
            source_name: Self::NAME.to_string(),
            reason: format!("invalid endpoint {}: {e}", self.endpoint),
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", IMDS_API_VERSION);
            query.append_pair("resource", resource);
            if let Some(client_id) = &self.client_id {
                query.append_pair("client_id", client_id);
            }
        }
        debug!(url = %url, "Requesting managed identity token");

        let request = self
            .http
            .get(url)
            .header("Metadata", "true")
            .timeout(IMDS_TIMEOUT);

        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| CredentialError::Request {
                source_name: Self::NAME.to_string(),
                detail: e.to_string(),
            })?;

        read_token_response(Self::NAME, response).await
    }
}

async fn read_token_response(
    source_name: &str,
    response: reqwest::Response,
) -> Result<AccessToken, CredentialError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CredentialError::Request {
            source_name: source_name.to_string(),
            detail: e.to_string(),
        })?;

    if !status.is_success() {
        return Err(CredentialError::Rejected {
            source_name: source_name.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    parse_token(source_name, &body)
}

// ============================================================================
// Chain
// ============================================================================

/// Tries each provider in order and returns the first token obtained.
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    /// Creates a chain from explicit providers.
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }

    /// Builds the default chain from the process environment.
    pub fn from_env(http: &HttpClient) -> Self {
        Self::from_lookup(http, |name| std::env::var(name).ok())
    }

    /// Builds the default chain from variables returned by `lookup`.
    pub fn from_lookup(http: &HttpClient, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut providers: Vec<Box<dyn CredentialProvider>> = Vec::new();

        match ClientSecretCredential::from_lookup(http.clone(), &lookup) {
            Ok(credential) => providers.push(Box::new(credential)),
            Err(e) => debug!(reason = %e, "Skipping client secret credential"),
        }

        let mut managed = ManagedIdentityCredential::new(http.clone());
        if let Some(client_id) = lookup(env::CLIENT_ID).filter(|v| !v.is_empty()) {
            managed = managed.with_client_id(client_id);
        }
        providers.push(Box::new(managed));

        Self::new(providers)
    }

    /// Names of the providers in order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl fmt::Debug for CredentialChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for CredentialChain {
    fn name(&self) -> &str {
        "CredentialChain"
    }

    async fn get_token(&self, resource: &str) -> Result<AccessToken, CredentialError> {
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            match provider.get_token(resource).await {
                Ok(token) => {
                    debug!(provider = provider.name(), "Credential resolved");
                    return Ok(token);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Credential source failed");
                    failures.push(e.to_string());
                }
            }
        }

        Err(CredentialError::Exhausted(failures))
    }
}

// ============================================================================
// Static (tests, pre-issued tokens)
// ============================================================================

/// Returns a fixed token, or a fixed failure.
#[derive(Debug, Clone)]
pub struct StaticCredential {
    result: Result<String, String>,
}

impl StaticCredential {
    /// Always returns `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            result: Ok(token.into()),
        }
    }

    /// Always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(reason.into()),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    fn name(&self) -> &str {
        "StaticCredential"
    }

    async fn get_token(&self, _resource: &str) -> Result<AccessToken, CredentialError> {
        match &self.result {
            Ok(token) => Ok(AccessToken::new(token.clone())),
            Err(reason) => Err(CredentialError::NotConfigured {
                source_name: self.name().to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
