//! Probe error taxonomy.
//!
//! Every failure a prober can hit maps to one variant here, and every variant
//! maps to an HTTP-style status code. The rendered message is what callers
//! see, so the `#[error]` templates are part of the output contract.

use thiserror::Error;

use crate::models::ProbeOutcome;

/// Error raised while running a probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// A required connection-string field is absent or empty.
    #[error("Unknown {field}")]
    MissingField {
        /// Name of the missing key (e.g. `AccountEndpoint`).
        field: &'static str,
    },

    /// The input does not follow the expected shape.
    #[error("{0}")]
    Format(String),

    /// Key material could not be decoded or was rejected locally.
    #[error("{context}: {detail}")]
    BadCredential {
        /// Leading label, e.g. `Master Key Decode Error`.
        context: String,
        /// Underlying error text.
        detail: String,
    },

    /// An endpoint URL could not be parsed or built.
    #[error("{stage} Error: {detail}")]
    InvalidEndpoint {
        /// Stage label, e.g. `Parse Endpoint`.
        stage: String,
        /// Underlying error text.
        detail: String,
    },

    /// Network or protocol failure before a response was obtained.
    #[error("{stage} Error: {detail}")]
    Transport {
        /// Stage label, e.g. `Request`.
        stage: String,
        /// Underlying error text.
        detail: String,
    },

    /// The downstream service answered but rejected the call.
    #[error("{stage} Error: {detail}")]
    Upstream {
        /// Stage label, e.g. `List Secrets`.
        stage: String,
        /// Underlying error text.
        detail: String,
    },

    /// The signer fed fewer bytes to the MAC than the payload holds.
    #[error("Write Hash {written}, body size {expected}, Error: short write")]
    Signing {
        /// Bytes accepted by the MAC.
        written: usize,
        /// Payload length.
        expected: usize,
    },
}

impl ProbeError {
    /// Creates a [`ProbeError::MissingField`].
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates a [`ProbeError::BadCredential`].
    pub fn bad_credential(context: impl Into<String>, detail: impl ToString) -> Self {
        Self::BadCredential {
            context: context.into(),
            detail: detail.to_string(),
        }
    }

    /// Creates a [`ProbeError::InvalidEndpoint`].
    pub fn invalid_endpoint(stage: impl Into<String>, detail: impl ToString) -> Self {
        Self::InvalidEndpoint {
            stage: stage.into(),
            detail: detail.to_string(),
        }
    }

    /// Creates a [`ProbeError::Transport`].
    pub fn transport(stage: impl Into<String>, detail: impl ToString) -> Self {
        Self::Transport {
            stage: stage.into(),
            detail: detail.to_string(),
        }
    }

    /// Creates a [`ProbeError::Upstream`].
    pub fn upstream(stage: impl Into<String>, detail: impl ToString) -> Self {
        Self::Upstream {
            stage: stage.into(),
            detail: detail.to_string(),
        }
    }

    /// Status code reported for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingField { .. } | Self::Format(_) => 400,
            Self::BadCredential { .. }
            | Self::InvalidEndpoint { .. }
            | Self::Transport { .. }
            | Self::Upstream { .. }
            | Self::Signing { .. } => 500,
        }
    }

    /// Returns true if the error was caused by the caller's input.
    pub fn is_input_error(&self) -> bool {
        self.status_code() == 400
    }
}

impl From<ProbeError> for ProbeOutcome {
    fn from(err: ProbeError) -> Self {
        ProbeOutcome::new(err.status_code(), err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ProbeError::missing("AccountEndpoint");
        assert_eq!(err.to_string(), "Unknown AccountEndpoint");
        assert_eq!(err.status_code(), 400);
        assert!(err.is_input_error());
    }

    #[test]
    fn test_stage_messages() {
        let err = ProbeError::transport("Request", "connection refused");
        assert_eq!(err.to_string(), "Request Error: connection refused");
        assert_eq!(err.status_code(), 500);

        let err = ProbeError::upstream("Get Account acct Info", "HTTP 403");
        assert_eq!(err.to_string(), "Get Account acct Info Error: HTTP 403");
    }

    #[test]
    fn test_bad_credential_keeps_context_verbatim() {
        let err = ProbeError::bad_credential("Invalid Credential", "bad base64");
        assert_eq!(err.to_string(), "Invalid Credential: bad base64");
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_signing_message() {
        let err = ProbeError::Signing {
            written: 3,
            expected: 10,
        };
        assert_eq!(
            err.to_string(),
            "Write Hash 3, body size 10, Error: short write"
        );
    }

    #[test]
    fn test_into_outcome() {
        let outcome: ProbeOutcome = ProbeError::Format("bad shape".to_string()).into();
        assert_eq!(outcome.status_code, 400);
        assert_eq!(outcome.message, "bad shape");
    }
}
