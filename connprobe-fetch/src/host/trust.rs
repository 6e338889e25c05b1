//! Root certificates for driver-level TLS.
//!
//! The MySQL driver verifies server certificates against a CA bundle handed
//! to it explicitly. [`TrustStore`] is loaded once at startup, either from
//! the platform's native store or from a PEM file, and shared read-only
//! afterwards. Every root is parsed as X.509 on load, so a corrupt bundle
//! fails here rather than at connect time.

use std::fmt;
use std::path::{Path, PathBuf};

use rustls_pki_types::CertificateDer;
use tracing::{debug, info, warn};
use x509_parser::prelude::{FromDer, X509Certificate};

use crate::error::TrustStoreError;

const PEM_CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Where the roots came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustSource {
    /// The operating system's certificate store.
    System,
    /// A PEM bundle on disk.
    Bundle(PathBuf),
}

impl fmt::Display for TrustSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system store"),
            Self::Bundle(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A read-only set of trusted root certificates.
#[derive(Debug, Clone)]
pub struct TrustStore {
    certs: Vec<CertificateDer<'static>>,
    source: TrustSource,
}

impl TrustStore {
    /// Loads roots from `source`.
    ///
    /// # Errors
    ///
    /// See [`TrustStore::load_system`] and [`TrustStore::load_pem_file`].
    pub fn load(source: &TrustSource) -> Result<Self, TrustStoreError> {
        match source {
            TrustSource::System => Self::load_system(),
            TrustSource::Bundle(path) => Self::load_pem_file(path),
        }
    }

    /// Loads the platform's native root certificates.
    ///
    /// Individual unreadable or unparseable certificates are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TrustStoreError::NoCertificates`] if not a single root loads.
    pub fn load_system() -> Result<Self, TrustStoreError> {
        let result = rustls_native_certs::load_native_certs();

        for err in &result.errors {
            warn!(error = %err, "Skipping unreadable system certificate");
        }

        let certs: Vec<_> = result
            .certs
            .into_iter()
            .filter(|cert| match check_x509(cert) {
                Ok(()) => true,
                Err(reason) => {
                    warn!(%reason, "Skipping malformed system certificate");
                    false
                }
            })
            .collect();

        if certs.is_empty() {
            let reason = if result.errors.is_empty() {
                "system store is empty".to_string()
            } else {
                result
                    .errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            return Err(TrustStoreError::NoCertificates(reason));
        }

        let store = Self {
            certs,
            source: TrustSource::System,
        };
        info!(count = store.len(), "Loaded system root certificates");
        Ok(store)
    }

    /// Loads a PEM bundle from disk.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, holds a malformed item, or holds no
    /// certificate.
    pub fn load_pem_file(path: &Path) -> Result<Self, TrustStoreError> {
        let pem = std::fs::read(path).map_err(|source| TrustStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let store = Self::from_pem(&pem, TrustSource::Bundle(path.to_path_buf()))?;
        info!(path = %path.display(), count = store.len(), "Loaded root certificate bundle");
        Ok(store)
    }

    /// Parses an in-memory PEM bundle.
    ///
    /// Non-certificate sections (keys, CRLs) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TrustStoreError::InvalidCertificate`] if any PEM section or
    /// certificate fails to parse, and [`TrustStoreError::NoCertificates`] if
    /// the bundle holds none.
    pub fn from_pem(pem: &[u8], source: TrustSource) -> Result<Self, TrustStoreError> {
        let invalid = |reason: String| TrustStoreError::InvalidCertificate {
            origin: source.to_string(),
            reason,
        };

        let certs = rustls_pemfile::certs(&mut &pem[..])
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid(e.to_string()))?;

        if certs.is_empty() {
            return Err(TrustStoreError::NoCertificates(format!(
                "no PEM certificate in {source}"
            )));
        }

        for (index, cert) in certs.iter().enumerate() {
            check_x509(cert).map_err(|reason| invalid(format!("certificate #{}: {reason}", index + 1)))?;
        }

        debug!(count = certs.len(), %source, "Parsed PEM bundle");
        Ok(Self { certs, source })
    }

    /// The roots re-encoded as a PEM bundle, for drivers that take one.
    pub fn pem_bundle(&self) -> Vec<u8> {
        let sections: Vec<_> = self
            .certs
            .iter()
            .map(|cert| pem::Pem::new(PEM_CERTIFICATE_TAG, cert.as_ref().to_vec()))
            .collect();
        pem::encode_many(&sections).into_bytes()
    }

    /// Number of certificates in the store.
    pub fn len(&self) -> usize {
        self.certs.len()
    }

    /// Returns true if the store holds no certificate.
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    /// Where the roots came from.
    pub fn source(&self) -> &TrustSource {
        &self.source
    }
}

fn check_x509(cert: &CertificateDer<'_>) -> Result<(), String> {
    X509Certificate::from_der(cert.as_ref())
        .map(|_| ())
        .map_err(|e| e.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn self_signed_pem(name: &str) -> String {
        let key_pair = rcgen::KeyPair::generate().unwrap();
        let params = rcgen::CertificateParams::new(vec![name.to_string()]).unwrap();
        params.self_signed(&key_pair).unwrap().pem()
    }

    #[test]
    fn test_parses_bundle() {
        let bundle = format!("{}{}", self_signed_pem("a.test"), self_signed_pem("b.test"));
        let store = TrustStore::from_pem(bundle.as_bytes(), TrustSource::System).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_pem_bundle_reparses() {
        let store =
            TrustStore::from_pem(self_signed_pem("db.test").as_bytes(), TrustSource::System).unwrap();

        let again = TrustStore::from_pem(&store.pem_bundle(), TrustSource::System).unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(again.certs, store.certs);
    }

    #[test]
    fn test_pem_without_certificates_is_rejected() {
        let err = TrustStore::from_pem(b"not a cert", TrustSource::System).unwrap_err();
        assert!(matches!(err, TrustStoreError::NoCertificates(_)));
    }

    #[test]
    fn test_bad_base64_is_rejected() {
        let pem = b"-----BEGIN CERTIFICATE-----\nthis is not base64 !!!\n-----END CERTIFICATE-----\n";
        let err = TrustStore::from_pem(pem, TrustSource::System).unwrap_err();
        assert!(matches!(err, TrustStoreError::InvalidCertificate { .. }));
    }

    #[test]
    fn test_non_x509_payload_is_rejected() {
        // Valid base64, but the bytes are not a certificate.
        let pem = b"-----BEGIN CERTIFICATE-----\nAQID\n-----END CERTIFICATE-----\n";
        let err = TrustStore::from_pem(pem, TrustSource::System).unwrap_err();
        assert!(err.to_string().contains("certificate #1"), "{err}");
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let good = self_signed_pem("ok.test");
        write!(file, "{good}-----BEGIN CERTIFICATE-----\n%%%%\n").unwrap();

        let err = TrustStore::load_pem_file(file.path()).unwrap_err();
        match err {
            TrustStoreError::InvalidCertificate { origin, .. } => {
                assert_eq!(origin, file.path().display().to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_pem_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(self_signed_pem("x.test").as_bytes()).unwrap();
        file.write_all(self_signed_pem("y.test").as_bytes()).unwrap();

        let store = TrustStore::load_pem_file(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.source(), &TrustSource::Bundle(file.path().to_path_buf()));
    }

    #[test]
    fn test_missing_file() {
        let err = TrustStore::load_pem_file(Path::new("/nonexistent/roots.pem")).unwrap_err();
        assert!(matches!(err, TrustStoreError::Io { .. }));
    }

    #[test]
    fn test_load_follows_source() {
        let source = TrustSource::Bundle(PathBuf::from("/nonexistent/roots.pem"));
        assert!(matches!(TrustStore::load(&source), Err(TrustStoreError::Io { .. })));
    }
}
