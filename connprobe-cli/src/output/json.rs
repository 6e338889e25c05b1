//! JSON output formatting.

use anyhow::Result;
use connprobe_core::ProbeOutcome;
use connprobe_probers::KindDescriptor;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one probe. The connection string is never echoed here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport<'a> {
    /// Kind as requested.
    pub kind: &'a str,
    /// Whether the status is 2xx.
    pub success: bool,
    /// Outcome status code.
    pub status_code: u16,
    /// Outcome message.
    pub message: &'a str,
}

impl<'a> ProbeReport<'a> {
    /// Builds a report for `kind`.
    pub fn new(kind: &'a str, outcome: &'a ProbeOutcome) -> Self {
        Self {
            kind,
            success: outcome.is_success(),
            status_code: outcome.status_code,
            message: &outcome.message,
        }
    }
}

/// JSON output for one known kind.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KindOutput<'a> {
    name: &'a str,
    display_name: &'a str,
    connection_hint: &'a str,
    sql_driver: bool,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a probe outcome.
    pub fn format_outcome(&self, kind: &str, outcome: &ProbeOutcome) -> Result<String> {
        self.format(&ProbeReport::new(kind, outcome))
    }

    /// Formats the kind list.
    pub fn format_kinds(&self, kinds: &[KindDescriptor]) -> Result<String> {
        let outputs: Vec<KindOutput<'_>> = kinds
            .iter()
            .map(|desc| KindOutput {
                name: desc.name,
                display_name: desc.display_name,
                connection_hint: desc.connection_hint,
                sql_driver: desc.is_sql_driver,
            })
            .collect();

        self.format(&outputs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use connprobe_probers::KindRegistry;

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_format_outcome() {
        let formatter = JsonFormatter::new(false);
        let outcome = ProbeOutcome::new(400, "Unknown AccountKey");
        assert_eq!(
            formatter.format_outcome("storage", &outcome).unwrap(),
            r#"{"kind":"storage","success":false,"statusCode":400,"message":"Unknown AccountKey"}"#
        );
    }

    #[test]
    fn test_format_kinds() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format_kinds(KindRegistry::all()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), KindRegistry::all().len());
        assert_eq!(items[0]["name"], "nslookup");
        assert_eq!(items[0]["sqlDriver"], false);
        assert!(items.iter().any(|i| i["name"] == "mysql" && i["sqlDriver"] == true));
    }
}
