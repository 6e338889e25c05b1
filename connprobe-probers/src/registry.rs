//! Registry of known kinds.
//!
//! Lists every built-in kind plus the SQL driver names compiled in, in the
//! order the CLI shows them.

use crate::descriptor::KindDescriptor;

// ============================================================================
// Static Registry
// ============================================================================

static DESCRIPTORS: &[KindDescriptor] = &[
    KindDescriptor::builtin("nslookup", "DNS Lookup", "<hostname>"),
    KindDescriptor::builtin("keyvault", "Key Vault", "<vault-name> (credentials from environment)"),
    KindDescriptor::builtin(
        "cosmos",
        "Cosmos DB",
        "AccountEndpoint=https://<account>.documents.azure.com:443/;AccountKey=<key>",
    ),
    KindDescriptor::builtin(
        "storage",
        "Storage Account",
        "AccountName=<name>;AccountKey=<key>[;EndpointSuffix=<suffix>|;BlobEndpoint=<url>]",
    ),
    KindDescriptor::builtin("insights", "Application Insights", "<app-id>;<app-key>"),
    KindDescriptor::sql_driver(
        "mysql",
        "MySQL",
        "<user>:<password>@tcp(<host>:<port>)/<db>[?tls=custom] or mysql://...",
    ),
    KindDescriptor::sql_driver("postgres", "PostgreSQL", "postgres://<user>:<password>@<host>/<db> or host=... dbname=..."),
    KindDescriptor::sql_driver("postgresql", "PostgreSQL", "postgres://<user>:<password>@<host>/<db>"),
    KindDescriptor::sql_driver("pgx", "PostgreSQL", "postgres://<user>:<password>@<host>/<db>"),
    KindDescriptor::sql_driver("sqlite", "SQLite", "<path> or :memory:"),
    KindDescriptor::sql_driver("sqlite3", "SQLite", "<path> or :memory:"),
    KindDescriptor::sql_driver(
        "sqlserver",
        "SQL Server",
        "server=tcp:<host>,1433;user id=<user>;password=<password>;database=<db> or sqlserver://...",
    ),
    KindDescriptor::sql_driver("mssql", "SQL Server", "server=tcp:<host>,1433;user id=<user>;password=<password>"),
];

// ============================================================================
// Kind Registry
// ============================================================================

/// Static access to kind descriptors.
pub struct KindRegistry;

impl KindRegistry {
    /// Returns all descriptors.
    pub fn all() -> &'static [KindDescriptor] {
        DESCRIPTORS
    }

    /// Looks up a descriptor by kind name.
    pub fn get(name: &str) -> Option<&'static KindDescriptor> {
        DESCRIPTORS.iter().find(|d| d.name == name)
    }

    /// Built-in (non-SQL) kinds.
    pub fn builtin() -> impl Iterator<Item = &'static KindDescriptor> {
        DESCRIPTORS.iter().filter(|d| !d.is_sql_driver)
    }

    /// SQL driver names.
    pub fn sql_drivers() -> impl Iterator<Item = &'static KindDescriptor> {
        DESCRIPTORS.iter().filter(|d| d.is_sql_driver)
    }
}
