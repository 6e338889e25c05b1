//! Probe context providing access to host APIs.
//!
//! The probe context is passed to every prober and bundles what a probe may
//! need from the host: the HTTP client, the credential provider for
//! environment-authenticated backends, the driver trust store and settings.

use std::sync::Arc;
use std::time::Duration;

use crate::host::{
    credential::{CredentialChain, CredentialProvider},
    http::{DEFAULT_TIMEOUT_SECS, HttpClient},
    trust::TrustStore,
};

// ============================================================================
// Endpoints
// ============================================================================

/// Default key vault URL template; `{name}` is replaced by the vault name.
pub const DEFAULT_KEY_VAULT_URL: &str = "https://{name}.vault.azure.net";

/// Default telemetry query API base URL.
pub const DEFAULT_INSIGHTS_URL: &str = "https://api.applicationinsights.io";

/// Service endpoints the cloud probers talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Key vault URL template containing `{name}`.
    pub key_vault_url: String,
    /// Telemetry query API base URL.
    pub insights_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            key_vault_url: DEFAULT_KEY_VAULT_URL.to_string(),
            insights_url: DEFAULT_INSIGHTS_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Expands the key vault template for `name`.
    pub fn key_vault(&self, name: &str) -> String {
        self.key_vault_url.replace("{name}", name)
    }
}

// ============================================================================
// Probe Settings
// ============================================================================

/// Settings for probe operations.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Timeout for each network operation.
    pub timeout: Duration,
    /// Service endpoints.
    pub endpoints: Endpoints,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            endpoints: Endpoints::default(),
        }
    }
}

impl ProbeSettings {
    /// Creates settings with a custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates settings with custom endpoints.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

// ============================================================================
// Probe Context
// ============================================================================

/// Context provided to probers, giving access to host APIs.
pub struct ProbeContext {
    /// HTTP client with the probe timeout applied.
    pub http: Arc<HttpClient>,
    /// Credential source for backends authenticated from the environment.
    pub credentials: Arc<dyn CredentialProvider>,
    /// Root certificates for driver TLS, when loaded at startup.
    pub trust_store: Option<Arc<TrustStore>>,
    /// Probe settings.
    pub settings: ProbeSettings,
}

impl ProbeContext {
    /// Creates a context with default host API implementations.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> ProbeContextBuilder {
        ProbeContextBuilder::new()
    }

    /// Returns the timeout for network operations.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }
}

impl Default for ProbeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProbeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeContext")
            .field("credentials", &self.credentials.name())
            .field("trust_store", &self.trust_store.as_ref().map(|t| t.len()))
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Probe Context Builder
// ============================================================================

/// Builder for constructing a `ProbeContext`.
pub struct ProbeContextBuilder {
    http: Option<Arc<HttpClient>>,
    credentials: Option<Arc<dyn CredentialProvider>>,
    trust_store: Option<Arc<TrustStore>>,
    settings: ProbeSettings,
}

impl ProbeContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            http: None,
            credentials: None,
            trust_store: None,
            settings: ProbeSettings::default(),
        }
    }

    /// Sets the HTTP client.
    pub fn http(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the credential provider.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the trust store.
    pub fn trust_store(mut self, trust_store: Arc<TrustStore>) -> Self {
        self.trust_store = Some(trust_store);
        self
    }

    /// Sets the probe settings.
    pub fn settings(mut self, settings: ProbeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Sets the service endpoints.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.settings.endpoints = endpoints;
        self
    }

    /// Builds the probe context.
    ///
    /// Without an explicit HTTP client one is built with the configured
    /// timeout; without explicit credentials the environment chain is used.
    pub fn build(self) -> ProbeContext {
        let timeout = self.settings.timeout;
        let http = self
            .http
            .unwrap_or_else(|| Arc::new(HttpClient::with_timeout(timeout)));
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(CredentialChain::from_env(&http)));

        ProbeContext {
            http,
            credentials,
            trust_store: self.trust_store,
            settings: self.settings,
        }
    }
}

impl Default for ProbeContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::credential::StaticCredential;

    #[test]
    fn test_context_builder() {
        let ctx = ProbeContext::builder()
            .timeout(Duration::from_secs(5))
            .credentials(Arc::new(StaticCredential::new("t")))
            .build();

        assert_eq!(ctx.timeout(), Duration::from_secs(5));
        assert_eq!(ctx.http.timeout(), Duration::from_secs(5));
        assert_eq!(ctx.credentials.name(), "StaticCredential");
        assert!(ctx.trust_store.is_none());
    }

    #[test]
    fn test_default_context() {
        let ctx = ProbeContext::new();
        assert_eq!(ctx.timeout(), Duration::from_secs(20));
        assert_eq!(ctx.credentials.name(), "CredentialChain");
    }

    #[test]
    fn test_key_vault_template() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.key_vault("myvault"), "https://myvault.vault.azure.net");

        let local = Endpoints {
            key_vault_url: "http://127.0.0.1:8080/{name}".to_string(),
            ..Endpoints::default()
        };
        assert_eq!(local.key_vault("v"), "http://127.0.0.1:8080/v");
    }
}
