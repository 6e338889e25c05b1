//! Generic SQL prober.
//!
//! Any kind that is not a built-in backend is treated as a database driver
//! name. The connection string is handed to that driver untouched; the probe
//! opens a connection, pings it and closes it again.
//!
//! | Driver names | Backend |
//! |---|---|
//! | `mysql` | MySQL / MariaDB (URL or `user:pass@tcp(host:port)/db` DSN) |
//! | `postgres`, `postgresql`, `pgx` | PostgreSQL (URL or `key=value` DSN) |
//! | `sqlite`, `sqlite3` | SQLite file or `:memory:` |
//! | `sqlserver`, `mssql` | SQL Server / Azure SQL (ADO.NET string or `sqlserver://` URL) |

mod driver;
mod mysql_dsn;
mod pg_dsn;
mod prober;
mod sqlserver;

pub use driver::{DriverOptions, SqlDriver};
pub use mysql_dsn::{MysqlDsn, TlsParam};
pub use prober::SqlProber;
