//! Kind descriptors.
//!
//! A descriptor is the static, user-facing description of one backend kind:
//! what it is called and what its connection string should look like.

use connprobe_core::ProbeKind;

// ============================================================================
// Kind Descriptor
// ============================================================================

/// Static description of a backend kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindDescriptor {
    /// The kind selector as typed on the command line.
    pub name: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Shape of the expected connection string.
    pub connection_hint: &'static str,
    /// Whether the name is a SQL driver rather than a built-in kind.
    pub is_sql_driver: bool,
}

impl KindDescriptor {
    /// Describes a built-in kind.
    pub const fn builtin(
        name: &'static str,
        display_name: &'static str,
        connection_hint: &'static str,
    ) -> Self {
        Self {
            name,
            display_name,
            connection_hint,
            is_sql_driver: false,
        }
    }

    /// Describes a SQL driver name.
    pub const fn sql_driver(
        name: &'static str,
        display_name: &'static str,
        connection_hint: &'static str,
    ) -> Self {
        Self {
            name,
            display_name,
            connection_hint,
            is_sql_driver: true,
        }
    }

    /// The kind this descriptor selects.
    pub fn kind(&self) -> ProbeKind {
        ProbeKind::parse(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kind() {
        let desc = KindDescriptor::builtin("cosmos", "Cosmos DB", "AccountEndpoint=...;AccountKey=...");
        assert_eq!(desc.kind(), ProbeKind::Cosmos);
        assert!(!desc.is_sql_driver);
    }

    #[test]
    fn test_sql_driver_kind() {
        let desc = KindDescriptor::sql_driver("pgx", "PostgreSQL", "postgres://...");
        assert_eq!(desc.kind(), ProbeKind::Sql("pgx".to_string()));
        assert!(desc.is_sql_driver);
    }
}
