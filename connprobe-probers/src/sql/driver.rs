//! Driver selection and connection options.

use std::str::FromStr;

use connprobe_core::ProbeError;
use connprobe_fetch::TrustStore;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::postgres::PgConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};

use super::mysql_dsn::MysqlDsn;
use super::pg_dsn;
use super::sqlserver;

/// Database drivers compiled into the prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDriver {
    /// MySQL and MariaDB.
    MySql,
    /// PostgreSQL.
    Postgres,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server and Azure SQL.
    SqlServer,
}

impl SqlDriver {
    /// Resolves a driver by registration name.
    ///
    /// Names are case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns the driver-registry message for unknown names.
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name {
            "mysql" => Ok(Self::MySql),
            "postgres" | "postgresql" | "pgx" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            other => Err(format!("sql: unknown driver \"{other}\" (forgotten import?)")),
        }
    }

    /// Parses a connection string into driver options without connecting.
    ///
    /// # Errors
    ///
    /// Returns the driver's parse error as text.
    pub fn open(self, conn: &str, trust_store: Option<&TrustStore>) -> Result<DriverOptions, String> {
        match self {
            Self::MySql => {
                let options = if is_url(conn, &["mysql", "mariadb"]) {
                    MySqlConnectOptions::from_str(conn).map_err(|e| e.to_string())?
                } else {
                    MysqlDsn::parse(conn)?.into_options(trust_store)?
                };
                Ok(DriverOptions::MySql(options))
            }
            Self::Postgres => {
                let options = if is_url(conn, &["postgres", "postgresql"]) {
                    PgConnectOptions::from_str(conn).map_err(|e| e.to_string())?
                } else {
                    pg_dsn::parse(conn)?
                };
                Ok(DriverOptions::Postgres(options))
            }
            Self::Sqlite => SqliteConnectOptions::from_str(conn)
                .map(DriverOptions::Sqlite)
                .map_err(|e| e.to_string()),
            Self::SqlServer => sqlserver::parse(conn, trust_store).map(DriverOptions::SqlServer),
        }
    }
}

pub(super) fn is_url(conn: &str, schemes: &[&str]) -> bool {
    conn.split_once("://")
        .is_some_and(|(scheme, _)| schemes.iter().any(|s| scheme.eq_ignore_ascii_case(s)))
}

/// Parsed options for one of the supported drivers.
#[derive(Debug, Clone)]
pub enum DriverOptions {
    /// MySQL options.
    MySql(MySqlConnectOptions),
    /// PostgreSQL options.
    Postgres(PgConnectOptions),
    /// SQLite options.
    Sqlite(SqliteConnectOptions),
    /// SQL Server options.
    SqlServer(tiberius::Config),
}

impl DriverOptions {
    /// Connects, pings and closes.
    ///
    /// # Errors
    ///
    /// Returns the first driver error as a `Ping` stage error.
    pub async fn ping(&self) -> Result<(), ProbeError> {
        match self {
            Self::MySql(options) => ping_with(options).await,
            Self::Postgres(options) => ping_with(options).await,
            Self::Sqlite(options) => ping_with(options).await,
            Self::SqlServer(config) => sqlserver::ping(config).await,
        }
    }
}

async fn ping_with<O: ConnectOptions>(options: &O) -> Result<(), ProbeError>
where
    O::Connection: Sized,
{
    async {
        let mut conn = options.connect().await?;
        conn.ping().await?;
        conn.close().await
    }
    .await
    .map_err(sqlx_ping_error)
}

fn sqlx_ping_error(err: sqlx::Error) -> ProbeError {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => {
            ProbeError::transport("Ping", err)
        }
        other => ProbeError::upstream("Ping", other),
    }
}
