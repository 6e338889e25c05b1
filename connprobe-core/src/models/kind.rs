//! Backend kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The backend a probe targets.
///
/// The cloud kinds are matched by exact, case-sensitive name. Anything else
/// is taken to be a SQL driver name and lands in [`ProbeKind::Sql`]; unknown
/// kinds are never rejected at this level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// DNS lookup of a hostname.
    Nslookup,
    /// Key vault secret listing.
    #[serde(rename = "keyvault")]
    KeyVault,
    /// Document database (master-key signed REST).
    Cosmos,
    /// Object storage account info (Shared Key signed REST).
    Storage,
    /// Telemetry query API (app id + API key).
    Insights,
    /// Generic SQL driver, identified by name.
    Sql(String),
}

impl ProbeKind {
    /// Names of the kinds that do not fall through to SQL.
    pub const BUILTIN: [&'static str; 5] = ["nslookup", "keyvault", "cosmos", "storage", "insights"];

    /// Resolves a kind identifier, falling back to a SQL driver name.
    pub fn parse(kind: &str) -> Self {
        match kind {
            "nslookup" => Self::Nslookup,
            "keyvault" => Self::KeyVault,
            "cosmos" => Self::Cosmos,
            "storage" => Self::Storage,
            "insights" => Self::Insights,
            driver => Self::Sql(driver.to_string()),
        }
    }

    /// The identifier this kind was parsed from.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Nslookup => "nslookup",
            Self::KeyVault => "keyvault",
            Self::Cosmos => "cosmos",
            Self::Storage => "storage",
            Self::Insights => "insights",
            Self::Sql(driver) => driver,
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Nslookup => "DNS Lookup",
            Self::KeyVault => "Key Vault",
            Self::Cosmos => "Cosmos DB",
            Self::Storage => "Storage Account",
            Self::Insights => "Application Insights",
            Self::Sql(_) => "SQL Database",
        }
    }

    /// Returns true if this kind is handled by the generic SQL prober.
    pub fn is_sql(&self) -> bool {
        matches!(self, Self::Sql(_))
    }
}

impl From<&str> for ProbeKind {
    fn from(kind: &str) -> Self {
        Self::parse(kind)
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds() {
        for name in ProbeKind::BUILTIN {
            let kind = ProbeKind::parse(name);
            assert!(!kind.is_sql(), "{name} should not fall through");
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_kind_is_driver_name() {
        assert_eq!(ProbeKind::parse("mysql"), ProbeKind::Sql("mysql".to_string()));
        assert_eq!(
            ProbeKind::parse("definitely-not-a-driver"),
            ProbeKind::Sql("definitely-not-a-driver".to_string())
        );
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(ProbeKind::parse("Cosmos"), ProbeKind::Sql("Cosmos".to_string()));
        assert_eq!(ProbeKind::parse("KEYVAULT").as_str(), "KEYVAULT");
    }

    #[test]
    fn test_empty_kind_is_sql() {
        assert!(ProbeKind::parse("").is_sql());
    }
}
