use chrono::Utc;
use openssl::pkcs12::Pkcs12;
use openssl::stack::Stack;
use openssl::x509::X509;

use crate::certificate::{Certificate, PrivateKey, key_matches_certificate};
use crate::error::{ArchiveError, Result};

/// Options for PKCS#12 synthesis.
///
/// Expired certificates are refused by default; `allow_expired` is the
/// explicit opt-out for callers that need to re-bundle historical material.
#[derive(Debug, Default, Clone)]
pub struct PfxOptions {
    pub allow_expired: bool,
}

/// Builds a password protected, DER encoded PKCS#12 container holding the
/// end-entity certificate, the chain certificates in the given order, and
/// the private key bound to the certificate via a generated local key id.
///
/// `friendly_name` is stored as the display label on the bag entries and
/// has no effect on import behavior. An empty password is legal and
/// produces a container importable without a passphrase.
///
/// Fails with [`ArchiveError::KeyMismatch`] when the key does not belong to
/// the certificate and with [`ArchiveError::CertificateExpired`] when the
/// certificate's validity window has ended (unless bypassed via options).
/// Both checks run before any binary assembly is attempted.
///
/// The output carries randomized salts, so two calls with identical inputs
/// are not byte-for-byte equal; re-opening with the same password yields
/// the same certificate and key.
pub fn build_pkcs12(
    cert: &Certificate,
    key: &PrivateKey,
    chain: &[Certificate],
    password: &str,
    friendly_name: &str,
    options: &PfxOptions,
) -> Result<Vec<u8>> {
    if !key_matches_certificate(cert, key)? {
        return Err(ArchiveError::KeyMismatch);
    }
    if !options.allow_expired {
        let not_after = cert.not_after_datetime()?;
        if not_after < Utc::now() {
            return Err(ArchiveError::CertificateExpired {
                not_after: not_after.date_naive(),
            });
        }
    }

    let mut builder = Pkcs12::builder();
    builder.name(friendly_name);
    builder.pkey(&key.pkey);
    builder.cert(&cert.x509);
    if !chain.is_empty() {
        let mut extra: Stack<X509> = Stack::new()?;
        for link in chain {
            extra.push(link.x509.clone())?;
        }
        builder.ca(extra);
    }
    let pkcs12 = builder.build2(password)?;
    Ok(pkcs12.to_der()?)
}

/// Re-opens a DER encoded PKCS#12 container, returning the end-entity
/// certificate, the private key and any extra chain certificates.
pub fn open_pkcs12(der: &[u8], password: &str) -> Result<(Certificate, PrivateKey, Vec<Certificate>)> {
    let pkcs12 = Pkcs12::from_der(der)
        .map_err(|_| ArchiveError::InvalidFormat("not a PKCS#12 container".into()))?;
    let parsed = pkcs12.parse2(password)?;
    let x509 = parsed
        .cert
        .ok_or_else(|| ArchiveError::InvalidFormat("container holds no certificate".into()))?;
    let pkey = parsed
        .pkey
        .ok_or_else(|| ArchiveError::InvalidFormat("container holds no private key".into()))?;
    let chain = parsed
        .ca
        .map(|stack| {
            stack
                .into_iter()
                .map(|x509| Certificate { x509 })
                .collect()
        })
        .unwrap_or_default();
    Ok((Certificate { x509 }, PrivateKey { pkey }, chain))
}
