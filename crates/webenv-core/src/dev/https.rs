//! HTTPS configuration for the dev server.
//!
//! Custom certificates come from `SSL_CRT_FILE` and `SSL_KEY_FILE`. A pair
//! that fails validation degrades to a self-signed certificate rather than
//! disabling HTTPS.

use crate::env::{EnvSnapshot, SSL_CRT_FILE, SSL_KEY_FILE};
use crate::error::{Error, Result};
use pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use rustls_pemfile::Item;
use rustls_pki_types::PrivateKeyDer;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use sha1::Sha1;
use std::fmt;
use std::path::{Path, PathBuf};
use webenv_util::resolve_path;
use x509_cert::der::{Decode, Encode};

/// Plaintext round-tripped through the key pair during validation.
const VALIDATION_PLAINTEXT: &[u8] = b"test";

/// Certificate and private key read from disk.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificatePair {
    /// PEM-encoded certificate.
    pub cert: Vec<u8>,
    /// PEM-encoded private key.
    pub key: Vec<u8>,
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

impl fmt::Debug for CertificatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificatePair")
            .field("cert_file", &self.cert_file)
            .field("key_file", &self.key_file)
            .finish_non_exhaustive()
    }
}

/// HTTPS setting of the dev server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpsConfig {
    /// HTTPS on or off; when on, the runtime uses a self-signed certificate.
    Enabled(bool),
    /// A validated custom certificate.
    Certificate(CertificatePair),
}

impl HttpsConfig {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Enabled(false))
    }
}

impl Serialize for HttpsConfig {
    // Key material is never written out, only where it came from.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Enabled(enabled) => serializer.serialize_bool(*enabled),
            Self::Certificate(pair) => {
                let mut state = serializer.serialize_struct("HttpsConfig", 2)?;
                state.serialize_field("certFile", &pair.cert_file)?;
                state.serialize_field("keyFile", &pair.key_file)?;
                state.end()
            }
        }
    }
}

/// Check that `cert` and `key` work together.
///
/// Encrypts a fixed plaintext with the certificate's public key (RSA-OAEP),
/// then decrypts it with the private key. The pair is valid when both steps
/// succeed; the decrypted bytes are not compared.
#[must_use]
pub fn validate_certificate_key_pair(cert: &[u8], key: &[u8]) -> bool {
    let Some(public_key) = read_public_key(cert) else {
        return false;
    };

    let mut rng = rand::thread_rng();
    let Ok(encrypted) = public_key.encrypt(&mut rng, Oaep::new::<Sha1>(), VALIDATION_PLAINTEXT)
    else {
        return false;
    };

    let Some(private_key) = read_private_key(key) else {
        return false;
    };

    private_key.decrypt(Oaep::new::<Sha1>(), &encrypted).is_ok()
}

/// Public key of an X.509 certificate, or of a bare SPKI / PKCS#1 public key.
fn read_public_key(pem: &[u8]) -> Option<RsaPublicKey> {
    let mut reader = pem;
    for item in rustls_pemfile::read_all(&mut reader) {
        match item {
            Ok(Item::X509Certificate(der)) => {
                let cert = x509_cert::Certificate::from_der(der.as_ref()).ok()?;
                let spki = cert.tbs_certificate.subject_public_key_info.to_der().ok()?;
                return RsaPublicKey::from_public_key_der(&spki).ok();
            }
            Ok(_) => {}
            Err(_) => return None,
        }
    }

    let text = std::str::from_utf8(pem).ok()?;
    RsaPublicKey::from_public_key_pem(text)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(text))
        .ok()
}

/// RSA private key in PKCS#8 or PKCS#1 PEM form.
fn read_private_key(pem: &[u8]) -> Option<RsaPrivateKey> {
    let mut reader = pem;
    match rustls_pemfile::private_key(&mut reader).ok()?? {
        PrivateKeyDer::Pkcs8(der) => RsaPrivateKey::from_pkcs8_der(der.secret_pkcs8_der()).ok(),
        PrivateKeyDer::Pkcs1(der) => RsaPrivateKey::from_pkcs1_der(der.secret_pkcs1_der()).ok(),
        _ => None,
    }
}

/// Read a file named by an environment variable.
///
/// # Errors
/// Returns [`Error::MissingEnvFile`] when the file does not exist.
fn read_env_file(path: &Path, var: &'static str) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::MissingEnvFile {
            var,
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read(path)?)
}

/// Resolve the HTTPS setting for a dev server.
///
/// When HTTPS is requested and both `SSL_CRT_FILE` and `SSL_KEY_FILE` are
/// set, the files are read relative to `project_root` and validated. Any
/// other case returns `requested` unchanged.
///
/// # Errors
/// Returns [`Error::MissingEnvFile`] when a configured file does not exist.
pub fn resolve_https(
    project_root: &Path,
    requested: bool,
    snapshot: &EnvSnapshot,
) -> Result<HttpsConfig> {
    let (true, Some(crt), Some(key)) = (
        requested,
        snapshot.ssl_crt_file.as_deref(),
        snapshot.ssl_key_file.as_deref(),
    ) else {
        return Ok(HttpsConfig::Enabled(requested));
    };

    let cert_file = resolve_path(project_root, &[crt]);
    let key_file = resolve_path(project_root, &[key]);
    let cert = read_env_file(&cert_file, SSL_CRT_FILE)?;
    let key = read_env_file(&key_file, SSL_KEY_FILE)?;

    if validate_certificate_key_pair(&cert, &key) {
        return Ok(HttpsConfig::Certificate(CertificatePair {
            cert,
            key,
            cert_file,
            key_file,
        }));
    }

    tracing::warn!(
        cert = %cert_file.display(),
        key = %key_file.display(),
        "SSL certificate and key do not form a valid pair, falling back to a self-signed certificate. \
         Re-run without --https to disable HTTPS."
    );
    Ok(HttpsConfig::Enabled(true))
}
