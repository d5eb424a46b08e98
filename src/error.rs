use chrono::NaiveDate;
use thiserror::Error;

/// Error type for all archive operations.
///
/// Each failure mode callers are expected to react to has its own variant,
/// so a key mismatch can be told apart from an expired certificate or a
/// malformed upload without string matching.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The input was not valid PEM, or its payload did not decode into the
    /// expected certificate or key structure.
    #[error("invalid PEM input: {0}")]
    InvalidFormat(String),

    /// The private key is not the mathematical counterpart of the
    /// certificate's public key.
    #[error("private key does not match the certificate public key")]
    KeyMismatch,

    /// The certificate's validity window has already ended.
    #[error("certificate expired on {not_after}")]
    CertificateExpired { not_after: NaiveDate },

    /// A submission was made without the certificate it requires.
    #[error("submission requires a certificate")]
    MissingCertificate,

    /// Surfaced unmodified from the archive store collaborator.
    #[error("store error: {0}")]
    Persistence(String),

    /// Underlying OpenSSL failure not covered by a more specific variant.
    #[error("openssl error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
