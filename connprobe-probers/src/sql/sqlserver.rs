//! SQL Server connection strings and ping.
//!
//! Two forms are accepted:
//!
//! - ADO.NET: `server=tcp:host,1433;user id=sa;password=...;database=app`
//! - URL: `sqlserver://sa:pw@host:1433?database=app&encrypt=true`
//!
//! Unless the connection string picks its own trust setting, a CA bundle
//! configured for the process is used to verify the server.

use std::borrow::Cow;

use connprobe_core::ProbeError;
use connprobe_fetch::{TrustSource, TrustStore};
use percent_encoding::percent_decode_str;
use tiberius::error::Error as TdsError;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing::debug;
use url::Url;

const URL_SCHEME: &str = "sqlserver";

/// Parses a SQL Server connection string.
///
/// # Errors
///
/// Returns the parse error as text.
pub fn parse(conn: &str, trust_store: Option<&TrustStore>) -> Result<Config, String> {
    let (mut config, sets_trust) = if super::driver::is_url(conn, &[URL_SCHEME]) {
        from_url(conn)?
    } else {
        let config = Config::from_ado_string(conn).map_err(|e| e.to_string())?;
        (config, ado_sets_trust(conn))
    };

    if !sets_trust {
        if let Some(TrustSource::Bundle(path)) = trust_store.map(TrustStore::source) {
            config.trust_cert_ca(path.display());
        }
    }

    Ok(config)
}

/// Connects, runs `SELECT 1` and closes.
///
/// Follows one gateway redirect, as Azure SQL issues for proxied logins.
///
/// # Errors
///
/// Network and TLS failures map to a transport error, anything the server
/// rejects to an upstream error.
pub async fn ping(config: &Config) -> Result<(), ProbeError> {
    let mut client = match connect(config.clone()).await {
        Err(TdsError::Routing { host, port }) => {
            debug!(%host, port, "Following SQL Server redirect");
            let mut routed = config.clone();
            routed.host(&host);
            routed.port(port);
            connect(routed).await
        }
        other => other,
    }
    .map_err(ping_error)?;

    client
        .simple_query("SELECT 1")
        .await
        .map_err(ping_error)?
        .into_results()
        .await
        .map_err(ping_error)?;

    client.close().await.map_err(ping_error)
}

async fn connect(
    config: Config,
) -> Result<Client<tokio_util::compat::Compat<TcpStream>>, TdsError> {
    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true)?;
    Client::connect(config, tcp.compat_write()).await
}

fn ping_error(err: TdsError) -> ProbeError {
    match err {
        TdsError::Io { .. } | TdsError::Tls(_) | TdsError::Routing { .. } => {
            ProbeError::transport("Ping", err)
        }
        other => ProbeError::upstream("Ping", other),
    }
}

fn ado_sets_trust(conn: &str) -> bool {
    conn.split(';').any(|pair| {
        pair.split_once('=').is_some_and(|(key, _)| {
            let key = key.trim();
            key.eq_ignore_ascii_case("TrustServerCertificate")
                || key.eq_ignore_ascii_case("TrustServerCertificateCA")
        })
    })
}

fn decode(raw: &str) -> Result<Cow<'_, str>, String> {
    percent_decode_str(raw).decode_utf8().map_err(|e| e.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(format!("invalid {key} '{value}'")),
    }
}

fn from_url(conn: &str) -> Result<(Config, bool), String> {
    let url = Url::parse(conn).map_err(|e| e.to_string())?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| "sqlserver URL has no host".to_string())?;

    if url.path_segments().is_some_and(|mut s| s.any(|seg| !seg.is_empty())) {
        return Err("named instances are not supported; give the port instead".to_string());
    }

    let mut config = Config::new();
    config.host(host);
    if let Some(port) = url.port() {
        config.port(port);
    }

    if !url.username().is_empty() {
        let user = decode(url.username())?;
        let password = decode(url.password().unwrap_or_default())?;
        config.authentication(AuthMethod::sql_server(user, password));
    }

    let mut sets_trust = false;
    for (key, value) in url.query_pairs() {
        match key.to_ascii_lowercase().as_str() {
            "database" => config.database(value),
            "app name" => config.application_name(value),
            "encrypt" => {
                let level = match value.to_ascii_lowercase().as_str() {
                    "disable" => EncryptionLevel::NotSupported,
                    other => {
                        if parse_bool("encrypt", other)? {
                            EncryptionLevel::Required
                        } else {
                            EncryptionLevel::Off
                        }
                    }
                };
                config.encryption(level);
            }
            "trustservercertificate" => {
                sets_trust = true;
                if parse_bool("TrustServerCertificate", &value)? {
                    config.trust_cert();
                }
            }
            other => debug!(key = other, "Ignoring SQL Server URL parameter"),
        }
    }

    Ok((config, sets_trust))
}
