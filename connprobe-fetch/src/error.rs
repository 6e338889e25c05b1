//! Host-level error types.

use thiserror::Error;

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body (or error code header).
        body: String,
    },
}

// ============================================================================
// Credential Error
// ============================================================================

/// Error type for credential resolution.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The credential source is not configured in this environment.
    #[error("{source_name} not configured: {reason}")]
    NotConfigured {
        /// Credential source name.
        source_name: String,
        /// What is missing.
        reason: String,
    },

    /// The token endpoint could not be reached.
    #[error("{source_name} token request failed: {detail}")]
    Request {
        /// Credential source name.
        source_name: String,
        /// Underlying error text.
        detail: String,
    },

    /// The token endpoint rejected the request.
    #[error("{source_name} token request rejected with HTTP {status}: {body}")]
    Rejected {
        /// Credential source name.
        source_name: String,
        /// Response status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The token endpoint answered with something that is not a token.
    #[error("{source_name} returned an invalid token response: {detail}")]
    InvalidResponse {
        /// Credential source name.
        source_name: String,
        /// Parse error text.
        detail: String,
    },

    /// Every source in a chain failed.
    #[error("no credential source succeeded: {}", .0.join("; "))]
    Exhausted(Vec<String>),
}

// ============================================================================
// Trust Store Error
// ============================================================================

/// Error type for trust-store initialisation.
#[derive(Debug, Error)]
pub enum TrustStoreError {
    /// Reading a certificate bundle failed.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Bundle path.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A bundle held an item that is not a parseable X.509 certificate.
    #[error("invalid certificate in {origin}: {reason}")]
    InvalidCertificate {
        /// Where the bundle came from.
        origin: String,
        /// Parser message.
        reason: String,
    },

    /// No usable root certificate was found.
    #[error("no root certificates found: {0}")]
    NoCertificates(String),
}
