//! Semicolon-delimited connection strings.
//!
//! Connection strings look like `AccountEndpoint=https://x/;AccountKey=abc==`.
//! Parsing is deliberately lenient:
//!
//! - segments are split on `;` with no quoting or escaping, so a value cannot
//!   contain `;`
//! - a segment binds a key only when it starts with the exact, case-sensitive
//!   `Key=` prefix
//! - unrecognised segments are ignored
//! - when a key appears more than once, the last occurrence wins
//!
//! Values keep everything after the first `=` of the prefix, which matters for
//! base64 keys ending in `==`.

use std::collections::HashMap;

use crate::error::ProbeError;

/// `AccountEndpoint=` key.
pub const ACCOUNT_ENDPOINT: &str = "AccountEndpoint";
/// `AccountKey=` key.
pub const ACCOUNT_KEY: &str = "AccountKey";
/// `AccountName=` key.
pub const ACCOUNT_NAME: &str = "AccountName";
/// `DefaultEndpointsProtocol=` key.
pub const DEFAULT_ENDPOINTS_PROTOCOL: &str = "DefaultEndpointsProtocol";
/// `EndpointSuffix=` key.
pub const ENDPOINT_SUFFIX: &str = "EndpointSuffix";
/// `BlobEndpoint=` key.
pub const BLOB_ENDPOINT: &str = "BlobEndpoint";

/// Fields recovered from a connection string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    values: HashMap<&'static str, String>,
}

impl ParsedFields {
    /// Parses `input`, binding only the keys listed in `recognized`.
    pub fn parse(input: &str, recognized: &[&'static str]) -> Self {
        let mut values = HashMap::new();

        for segment in input.split(';') {
            for &key in recognized {
                if let Some(value) = segment
                    .strip_prefix(key)
                    .and_then(|rest| rest.strip_prefix('='))
                {
                    values.insert(key, value.to_string());
                }
            }
        }

        Self { values }
    }

    /// Returns the value bound to `key`, if any. Empty values are returned as-is.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the non-empty value bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::MissingField`] if the key never bound or bound
    /// to an empty value.
    pub fn require(&self, key: &'static str) -> Result<&str, ProbeError> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ProbeError::missing(key)),
        }
    }

    /// Returns true if no recognised key was found.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const COSMOS_KEYS: &[&str] = &[ACCOUNT_ENDPOINT, ACCOUNT_KEY];

    #[test]
    fn test_parse_basic() {
        let fields = ParsedFields::parse(
            "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=c2VjcmV0==;",
            COSMOS_KEYS,
        );
        assert_eq!(
            fields.get(ACCOUNT_ENDPOINT),
            Some("https://acct.documents.azure.com:443/")
        );
        assert_eq!(fields.get(ACCOUNT_KEY), Some("c2VjcmV0=="));
    }

    #[test]
    fn test_any_order_with_noise() {
        let inputs = [
            "AccountKey=Y;junk;AccountEndpoint=X",
            "foo=bar;AccountEndpoint=X;;Database=db;AccountKey=Y;trailing",
            ";;AccountEndpoint=X;AccountKey=Y",
        ];
        for input in inputs {
            let fields = ParsedFields::parse(input, COSMOS_KEYS);
            assert_eq!(fields.require(ACCOUNT_ENDPOINT), Ok("X"), "input: {input}");
            assert_eq!(fields.require(ACCOUNT_KEY), Ok("Y"), "input: {input}");
        }
    }

    #[test]
    fn test_last_occurrence_wins() {
        let fields = ParsedFields::parse("AccountKey=first;AccountKey=second", COSMOS_KEYS);
        assert_eq!(fields.get(ACCOUNT_KEY), Some("second"));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let fields = ParsedFields::parse("accountkey=abc;ACCOUNTENDPOINT=x", COSMOS_KEYS);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_longer_key_is_not_a_match() {
        // `AccountKeyId=` must not bind `AccountKey`.
        let fields = ParsedFields::parse("AccountKeyId=nope", COSMOS_KEYS);
        assert_eq!(fields.get(ACCOUNT_KEY), None);
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let fields = ParsedFields::parse("AccountName=acct;AccountKey=k", COSMOS_KEYS);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(ACCOUNT_NAME), None);
    }

    #[test]
    fn test_missing_and_empty_are_missing_field() {
        let fields = ParsedFields::parse("AccountEndpoint=;Other=1", COSMOS_KEYS);
        assert_eq!(fields.get(ACCOUNT_ENDPOINT), Some(""));
        assert_eq!(
            fields.require(ACCOUNT_ENDPOINT),
            Err(ProbeError::missing(ACCOUNT_ENDPOINT))
        );
        assert_eq!(
            fields.require(ACCOUNT_KEY).unwrap_err().to_string(),
            "Unknown AccountKey"
        );
    }

    #[test]
    fn test_embedded_semicolon_truncates_value() {
        let fields = ParsedFields::parse("AccountKey=abc;def", COSMOS_KEYS);
        assert_eq!(fields.get(ACCOUNT_KEY), Some("abc"));
    }

    #[test]
    fn test_value_keeps_equals_signs() {
        let fields = ParsedFields::parse("AccountKey=a=b==", COSMOS_KEYS);
        assert_eq!(fields.get(ACCOUNT_KEY), Some("a=b=="));
    }
}
