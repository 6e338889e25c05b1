//! Probe input.

use serde::{Deserialize, Serialize};

use super::ProbeKind;

/// A single probe request as received from a front-end.
///
/// Both fields are trimmed on construction and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeRequest {
    kind: String,
    connection_string: String,
}

impl ProbeRequest {
    /// Creates a request, trimming surrounding whitespace from both inputs.
    pub fn new(kind: impl AsRef<str>, connection_string: impl AsRef<str>) -> Self {
        Self {
            kind: kind.as_ref().trim().to_string(),
            connection_string: connection_string.as_ref().trim().to_string(),
        }
    }

    /// The raw kind identifier.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The backend-specific connection string.
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Resolves the kind identifier into a [`ProbeKind`].
    pub fn probe_kind(&self) -> ProbeKind {
        ProbeKind::parse(&self.kind)
    }
}
