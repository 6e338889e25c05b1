//! Secret listing REST payloads.

use serde::Deserialize;

/// Key vault REST API version.
pub const API_VERSION: &str = "7.0";

/// Token audience for key vault data-plane calls.
pub const VAULT_RESOURCE: &str = "https://vault.azure.net";

/// One page of `GET /secrets`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretListPage {
    /// Secrets on this page.
    #[serde(default)]
    pub value: Vec<SecretItem>,
    /// Continuation link; never followed.
    #[serde(default)]
    pub next_link: Option<String>,
}

impl SecretListPage {
    /// Id of the first secret on the page.
    pub fn first_id(&self) -> Option<&str> {
        self.value.first().map(|item| item.id.as_deref().unwrap_or_default())
    }
}

/// Secret metadata as listed; values are never returned by the listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretItem {
    /// Secret identifier URL.
    #[serde(default)]
    pub id: Option<String>,
}
