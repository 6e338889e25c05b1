//! Uniform probe result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of a probe: an HTTP-style status code and a diagnostic message.
///
/// Status codes are a coarse taxonomy:
/// - 200: success with a payload
/// - 202/204: success, nothing found
/// - 400: malformed input
/// - 500: downstream or transport failure
///
/// Pass-through outcomes copy the downstream status code unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    /// HTTP-style status code.
    pub status_code: u16,
    /// Diagnostic message.
    pub message: String,
}

impl ProbeOutcome {
    /// Creates an outcome with an explicit status code.
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// Success with a payload (200).
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(200, message)
    }

    /// Success without data (204).
    pub fn no_content(message: impl Into<String>) -> Self {
        Self::new(204, message)
    }

    /// A downstream HTTP response reported verbatim.
    pub fn pass_through(status_code: u16, body: &str) -> Self {
        Self::new(status_code, format!("Body: {body}"))
    }

    /// Returns true for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Returns true for any 4xx status.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status_code, self.message)
    }
}
