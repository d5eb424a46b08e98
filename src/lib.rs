//! # Cert-Archive
//!
//! ## Description
//!
//! A library for archiving X.509 credential material submitted as PEM text,
//! built on the OpenSSL crate.
//!
//! The package has not been reviewed for any security issues; treat archived
//! private keys with the care they deserve.
//!
//! It covers the steps between "a user pasted some PEM" and "a set of
//! immutable archive records exists":
//! - Parsing certificates and private keys from PEM text, tolerating the
//!   whitespace and line-ending noise real uploads carry
//! - Deriving archival metadata (subject common name, expiration date) from
//!   a parsed certificate
//! - Splitting a concatenated CA bundle into individual certificates,
//!   skipping corrupt fragments instead of failing the whole bundle
//! - Checking that a private key is the counterpart of a certificate
//! - Synthesizing a password protected PKCS#12 (PFX) container from
//!   certificate, chain and key
//! - An append-only archive record model with expiry rules and
//!   case-insensitive search, persisted through a pluggable store
//!
//! Certificate chain *validation* (trust paths, revocation) and key
//! generation are out of scope.
//!
//! ## Basic example bundling a certificate and key into a PFX
//! ```rust,no_run
//! use cert_archive::certificate::{parse_certificate, parse_private_key};
//! use cert_archive::pfx::{PfxOptions, build_pkcs12};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cert_pem = std::fs::read_to_string("cert.pem")?;
//! let key_pem = std::fs::read_to_string("key.pem")?;
//!
//! let cert = parse_certificate(&cert_pem)?;
//! let key = parse_private_key(&key_pem)?;
//!
//! let der = build_pkcs12(&cert, &key, &[], "hunter2", "my-bundle", &PfxOptions::default())?;
//! std::fs::write("bundle.pfx", der)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Basic example submitting a credential set to an archive store
//! ```rust,no_run
//! use cert_archive::pfx::PfxOptions;
//! use cert_archive::store::{ArchiveStore, MemoryStore};
//! use cert_archive::submit::{Submission, submit};
//! use cert_archive::archive::search;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cert_pem = std::fs::read_to_string("cert.pem")?;
//! let key_pem = std::fs::read_to_string("key.pem")?;
//!
//! let mut store = MemoryStore::new();
//! let submission = Submission::new("user-1", "Acme Corp")
//!     .notes("production web server")
//!     .pfx_password("hunter2")
//!     .certificate("cert.pem", &cert_pem)
//!     .private_key("key.pem", &key_pem);
//!
//! // Creates a PEM, a KEY and a PFX record; domain and expiration are
//! // filled from the certificate since none were supplied.
//! let outcome = submit(&mut store, &submission, &PfxOptions::default())?;
//! assert_eq!(outcome.records.len(), 3);
//!
//! for record in search(&store.list()?, "acme") {
//!     println!("{} expires {}", record.file_name, record.expiration_date);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Record types
//!
//! One submission creates between one and four records:
//!
//! | type | content                        | created when                        |
//! | ---- | ------------------------------ | ----------------------------------- |
//! | PEM  | the submitted certificate text | always (certificate is mandatory)   |
//! | KEY  | the submitted private key text | a key slot was submitted            |
//! | PEM  | the submitted chain bundle     | a bundle slot was submitted         |
//! | PFX  | base64 of the PKCS#12 DER      | cert and key present and matching   |
//!
//! A failed PFX synthesis (key mismatch, expired certificate) is reported on
//! the submission outcome but never suppresses the sibling records: uploaded
//! material is not lost because bundling failed.

pub mod archive;
pub mod certificate;
pub mod error;
pub mod pfx;
pub mod store;
pub mod submit;
