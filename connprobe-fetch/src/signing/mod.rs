//! HMAC-SHA256 request signing for Azure REST APIs.
//!
//! - [`master_key`] - Cosmos DB master-key tokens
//! - [`shared_key`] - Storage Shared Key authorization
//!
//! Both schemes decode a base64 account key, MAC a canonical string with
//! HMAC-SHA256 and base64 the digest. They differ in what goes into the
//! canonical string and how the result is put in the `Authorization` header.

pub mod master_key;
pub mod shared_key;

pub use master_key::MasterKeySigner;
pub use shared_key::SharedKeyCredential;

use std::io::{self, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use connprobe_core::ProbeError;
use ring::hmac;

/// Formats a timestamp as an RFC 7231 HTTP-date (`Thu, 27 Apr 2017 00:51:12 GMT`).
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Decodes a base64 account key into an HMAC-SHA256 key.
pub(crate) fn decode_key(key: &str) -> Result<hmac::Key, base64::DecodeError> {
    let bytes = STANDARD.decode(key)?;
    Ok(hmac::Key::new(hmac::HMAC_SHA256, &bytes))
}

/// Streams bytes into an HMAC context.
struct MacWriter {
    ctx: hmac::Context,
}

impl Write for MacWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ctx.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// MACs `payload` and returns the base64 digest.
///
/// A single `write` must consume the whole payload; anything less is a
/// [`ProbeError::Signing`] rather than a silently wrong signature.
pub(crate) fn sign_payload(key: &hmac::Key, payload: &str) -> Result<String, ProbeError> {
    let mut writer = MacWriter {
        ctx: hmac::Context::with_key(key),
    };

    let written = writer.write(payload.as_bytes()).unwrap_or(0);
    if written < payload.len() {
        return Err(ProbeError::Signing {
            written,
            expected: payload.len(),
        });
    }

    Ok(STANDARD.encode(writer.ctx.sign().as_ref()))
}
