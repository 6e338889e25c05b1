//! Classic MySQL DSN parsing.
//!
//! ```text
//! [user[:password]@][net[(addr)]]/dbname[?param1=value1&paramN=valueN]
//! ```
//!
//! The password may contain `@` and `:`; the last `@` before the last `/`
//! separates credentials from the address.

use connprobe_fetch::TrustStore;
use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};
use tracing::debug;

/// Default TCP address.
const DEFAULT_TCP_ADDR: &str = "127.0.0.1:3306";

/// Default unix socket.
const DEFAULT_SOCKET: &str = "/tmp/mysql.sock";

/// Default TCP port.
const DEFAULT_PORT: u16 = 3306;

/// The `tls` DSN parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TlsParam {
    /// `false`, or no `tls` parameter at all.
    #[default]
    Disabled,
    /// `true`: verify against the default roots.
    Verify,
    /// `custom`: verify against the trust store loaded at startup.
    Custom,
    /// `skip-verify`: encrypt without verifying the server.
    SkipVerify,
    /// `preferred`: encrypt when the server offers it.
    Preferred,
}

impl TlsParam {
    fn parse(value: &str) -> Result<Self, String> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Self::Verify),
            "false" | "0" => Ok(Self::Disabled),
            "custom" => Ok(Self::Custom),
            "skip-verify" => Ok(Self::SkipVerify),
            "preferred" => Ok(Self::Preferred),
            _ => Err(format!("invalid value / unknown config name: {value}")),
        }
    }
}

/// A parsed classic MySQL DSN.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MysqlDsn {
    /// User name.
    pub user: String,
    /// Password, if given.
    pub password: Option<String>,
    /// Network type (`tcp` or `unix`).
    pub net: String,
    /// Address (`host:port` or socket path).
    pub addr: String,
    /// Database name; may be empty.
    pub database: String,
    /// TLS setting.
    pub tls: TlsParam,
    /// Connection charset.
    pub charset: Option<String>,
    /// Connection collation.
    pub collation: Option<String>,
}

impl MysqlDsn {
    /// Parses a DSN.
    ///
    /// # Errors
    ///
    /// Returns a description of the first malformed part.
    pub fn parse(dsn: &str) -> Result<Self, String> {
        let slash = dsn
            .rfind('/')
            .ok_or_else(|| "invalid DSN: missing the slash separating the database name".to_string())?;
        let (head, tail) = (&dsn[..slash], &dsn[slash + 1..]);

        let mut parsed = Self::default();

        let address = match head.rfind('@') {
            Some(at) => {
                let credentials = &head[..at];
                match credentials.split_once(':') {
                    Some((user, password)) => {
                        parsed.user = user.to_string();
                        parsed.password = Some(password.to_string());
                    }
                    None => parsed.user = credentials.to_string(),
                }
                &head[at + 1..]
            }
            None => head,
        };

        match address.find('(') {
            Some(open) => {
                let addr = address[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| "invalid DSN: network address not terminated (missing closing brace)".to_string())?;
                parsed.net = address[..open].to_string();
                parsed.addr = addr.to_string();
            }
            None => parsed.net = address.to_string(),
        }

        if parsed.net.is_empty() {
            parsed.net = "tcp".to_string();
        }
        if parsed.addr.is_empty() {
            parsed.addr = match parsed.net.as_str() {
                "tcp" => DEFAULT_TCP_ADDR.to_string(),
                "unix" => DEFAULT_SOCKET.to_string(),
                other => return Err(format!("default addr for network '{other}' unknown")),
            };
        }

        let (database, query) = tail.split_once('?').unwrap_or((tail, ""));
        parsed.database = database.to_string();

        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match name.as_ref() {
                "tls" => parsed.tls = TlsParam::parse(&value)?,
                "charset" => parsed.charset = Some(value.into_owned()),
                "collation" => parsed.collation = Some(value.into_owned()),
                other => debug!(param = other, "Ignoring unsupported DSN parameter"),
            }
        }

        Ok(parsed)
    }

    /// Splits a TCP address into host and port.
    fn host_port(&self) -> Result<(String, u16), String> {
        let addr = self.addr.as_str();
        let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| format!("address {addr}: missing ']' in address"))?;
            (host, after.strip_prefix(':'))
        } else {
            match addr.rsplit_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (addr, None),
            }
        };

        let port = match port {
            Some(p) => p
                .parse()
                .map_err(|_| format!("address {addr}: invalid port"))?,
            None => DEFAULT_PORT,
        };
        Ok((host.to_string(), port))
    }

    /// Builds driver options.
    ///
    /// # Errors
    ///
    /// Fails for unsupported networks, bad addresses, or `tls=custom` without
    /// a loaded trust store.
    pub fn into_options(self, trust_store: Option<&TrustStore>) -> Result<MySqlConnectOptions, String> {
        let mut options = MySqlConnectOptions::new().username(&self.user);
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if !self.database.is_empty() {
            options = options.database(&self.database);
        }

        options = match self.net.as_str() {
            "tcp" | "tcp4" | "tcp6" => {
                let (host, port) = self.host_port()?;
                options.host(&host).port(port)
            }
            "unix" => options.socket(&self.addr),
            other => return Err(format!("unknown network {other}")),
        };

        if let Some(charset) = &self.charset {
            options = options.charset(charset);
        }
        if let Some(collation) = &self.collation {
            options = options.collation(collation);
        }

        options = match self.tls {
            TlsParam::Disabled => options.ssl_mode(MySqlSslMode::Disabled),
            TlsParam::Preferred => options.ssl_mode(MySqlSslMode::Preferred),
            TlsParam::SkipVerify => options.ssl_mode(MySqlSslMode::Required),
            TlsParam::Verify => {
                let options = options.ssl_mode(MySqlSslMode::VerifyIdentity);
                match trust_store {
                    Some(store) => options.ssl_ca_from_pem(store.pem_bundle()),
                    None => options,
                }
            }
            TlsParam::Custom => {
                let store = trust_store
                    .ok_or_else(|| "tls=custom requires a loaded trust store".to_string())?;
                options
                    .ssl_mode(MySqlSslMode::VerifyIdentity)
                    .ssl_ca_from_pem(store.pem_bundle())
            }
        };

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_dsn() {
        let dsn = MysqlDsn::parse("app:s3cret@tcp(db.internal:3307)/orders?tls=custom&charset=utf8mb4").unwrap();
        assert_eq!(dsn.user, "app");
        assert_eq!(dsn.password.as_deref(), Some("s3cret"));
        assert_eq!(dsn.net, "tcp");
        assert_eq!(dsn.addr, "db.internal:3307");
        assert_eq!(dsn.database, "orders");
        assert_eq!(dsn.tls, TlsParam::Custom);
        assert_eq!(dsn.charset.as_deref(), Some("utf8mb4"));
        assert_eq!(dsn.host_port().unwrap(), ("db.internal".to_string(), 3307));
    }

    #[test]
    fn test_password_with_separators() {
        let dsn = MysqlDsn::parse("u:p@ss:w@rd@tcp(h)/d").unwrap();
        assert_eq!(dsn.user, "u");
        assert_eq!(dsn.password.as_deref(), Some("p@ss:w@rd"));
        assert_eq!(dsn.host_port().unwrap(), ("h".to_string(), 3306));
    }

    #[test]
    fn test_minimal_dsn_defaults() {
        let dsn = MysqlDsn::parse("/").unwrap();
        assert_eq!(dsn.net, "tcp");
        assert_eq!(dsn.addr, "127.0.0.1:3306");
        assert!(dsn.database.is_empty());
        assert_eq!(dsn.tls, TlsParam::Disabled);
    }

    #[test]
    fn test_unix_socket() {
        let dsn = MysqlDsn::parse("root@unix(/var/run/mysqld/mysqld.sock)/app").unwrap();
        assert_eq!(dsn.net, "unix");
        assert_eq!(dsn.addr, "/var/run/mysqld/mysqld.sock");
        assert!(dsn.into_options(None).is_ok());
    }

    #[test]
    fn test_ipv6_address() {
        let dsn = MysqlDsn::parse("u@tcp([::1]:3310)/d").unwrap();
        assert_eq!(dsn.host_port().unwrap(), ("::1".to_string(), 3310));
    }

    #[test]
    fn test_tls_values() {
        let tls = |v: &str| MysqlDsn::parse(&format!("u@tcp(h)/d?tls={v}")).map(|d| d.tls);
        assert_eq!(tls("true"), Ok(TlsParam::Verify));
        assert_eq!(tls("false"), Ok(TlsParam::Disabled));
        assert_eq!(tls("skip-verify"), Ok(TlsParam::SkipVerify));
        assert_eq!(tls("preferred"), Ok(TlsParam::Preferred));
        assert_eq!(
            tls("corp"),
            Err("invalid value / unknown config name: corp".to_string())
        );
    }

    #[test]
    fn test_malformed_dsn() {
        assert!(MysqlDsn::parse("no-slash-here").is_err());
        assert!(MysqlDsn::parse("u@tcp(h:3306/d").is_err());
        assert!(MysqlDsn::parse("u@tcp(h:port)/d").unwrap().into_options(None).is_err());
        assert!(MysqlDsn::parse("u@pipe/d").is_err());
    }

    #[test]
    fn test_custom_tls_needs_trust_store() {
        let dsn = MysqlDsn::parse("u@tcp(h)/d?tls=custom").unwrap();
        assert_eq!(
            dsn.into_options(None).unwrap_err(),
            "tls=custom requires a loaded trust store"
        );
    }
}
