//! PostgreSQL `key=value` connection strings.
//!
//! `host=db port=5432 user=app password='a b' dbname=orders sslmode=require`

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use tracing::debug;

/// Parses a keyword/value connection string into options.
///
/// Values may be single-quoted; `\'` and `\\` escape inside quotes.
///
/// # Errors
///
/// Returns a description of the malformed pair or value.
pub fn parse(conn: &str) -> Result<PgConnectOptions, String> {
    let mut options = PgConnectOptions::new_without_pgpass();

    for (key, value) in pairs(conn)? {
        options = match key.as_str() {
            "host" => options.host(&value),
            "port" => options.port(
                value
                    .parse()
                    .map_err(|_| format!("invalid port: {value}"))?,
            ),
            "user" => options.username(&value),
            "password" => options.password(&value),
            "dbname" => options.database(&value),
            "sslmode" => options.ssl_mode(PgSslMode::from_str(&value).map_err(|e| e.to_string())?),
            "sslrootcert" => options.ssl_root_cert(value.as_str()),
            "application_name" => options.application_name(&value),
            other => {
                debug!(param = other, "Ignoring unsupported connection parameter");
                options
            }
        };
    }

    Ok(options)
}

fn pairs(conn: &str) -> Result<Vec<(String, String)>, String> {
    let mut out = Vec::new();
    let mut chars = conn.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            return Ok(out);
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next() != Some('=') {
            return Err(format!("missing \"=\" after \"{key}\" in connection info string"));
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if_eq(&'\'').is_some() {
            loop {
                match chars.next() {
                    Some('\'') => break,
                    Some('\\') => match chars.next() {
                        Some(escaped) => value.push(escaped),
                        None => return Err("unterminated quoted string in connection info string".to_string()),
                    },
                    Some(c) => value.push(c),
                    None => return Err("unterminated quoted string in connection info string".to_string()),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                value.push(c);
            }
        }

        out.push((key, value));
    }
}
