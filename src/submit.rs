use chrono::{NaiveDate, Utc};
use openssl::base64::encode_block;
use openssl::bn::{BigNum, MsbOption};
use tracing::{debug, warn};

use crate::archive::{ArchiveRecord, RecordType, resolve_field};
use crate::certificate::{parse_certificate, parse_private_key, split_chain};
use crate::error::{ArchiveError, Result};
use crate::pfx::{PfxOptions, build_pkcs12};
use crate::store::ArchiveStore;

/// An uploaded file: its name and its raw text content.
#[derive(Debug, Clone)]
pub struct FileSlot {
    pub file_name: String,
    pub content: String,
}

impl FileSlot {
    pub fn new(file_name: &str, content: &str) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// One user action bundling a certificate with an optional private key and
/// chain, plus the archival metadata describing them.
///
/// The acting user id is an explicit field, never read from ambient state.
/// User supplied `domain` and `expiration_date` always take precedence over
/// values derived from the certificate; derived values only fill blanks.
pub struct Submission {
    user_id: String,
    client_name: String,
    domain: Option<String>,
    expiration_date: Option<NaiveDate>,
    notes: Option<String>,
    pfx_password: String,
    certificate: Option<FileSlot>,
    private_key: Option<FileSlot>,
    chain_bundle: Option<FileSlot>,
}

impl Submission {
    pub fn new(user_id: &str, client_name: &str) -> Self {
        Self {
            user_id: user_id.into(),
            client_name: client_name.into(),
            domain: None,
            expiration_date: None,
            notes: None,
            pfx_password: String::new(),
            certificate: None,
            private_key: None,
            chain_bundle: None,
        }
    }

    /// Domain this credential set belongs to. Overrides the common name
    /// derived from the certificate.
    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Expiration date to archive under. Overrides the certificate's
    /// validity end.
    pub fn expiration_date(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Password protecting the synthesized PFX. Defaults to the empty
    /// password, which is legal.
    pub fn pfx_password(mut self, password: &str) -> Self {
        self.pfx_password = password.into();
        self
    }

    /// The certificate slot. Mandatory: submission fails without it.
    pub fn certificate(mut self, file_name: &str, content: &str) -> Self {
        self.certificate = Some(FileSlot::new(file_name, content));
        self
    }

    pub fn private_key(mut self, file_name: &str, content: &str) -> Self {
        self.private_key = Some(FileSlot::new(file_name, content));
        self
    }

    pub fn chain_bundle(mut self, file_name: &str, content: &str) -> Self {
        self.chain_bundle = Some(FileSlot::new(file_name, content));
        self
    }
}

/// Result of a submission: the records that were persisted and, when PFX
/// synthesis was attempted but failed, the reason.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub records: Vec<ArchiveRecord>,
    pub pfx_error: Option<ArchiveError>,
}

/// Runs a submission against a store.
///
/// Creates between one and four records: the certificate (PEM), the private
/// key (KEY), the chain bundle (PEM) and, when both certificate and key are
/// present and parseable, a synthesized PKCS#12 container (PFX). A failed
/// synthesis is reported through [`SubmissionOutcome::pfx_error`] and never
/// suppresses the sibling records. A key slot that fails to parse is
/// archived as submitted and the parse failure reported the same way, since
/// uploaded material must not be lost over a bundling problem; corrupt
/// fragments in a bundle slot are skipped as in [`split_chain`].
///
/// Records are persisted sequentially. A persistence failure ends the
/// sequence and propagates; records inserted before it stay in the store.
pub fn submit(
    store: &mut dyn ArchiveStore,
    submission: &Submission,
    options: &PfxOptions,
) -> Result<SubmissionOutcome> {
    let cert_slot = submission
        .certificate
        .as_ref()
        .ok_or(ArchiveError::MissingCertificate)?;
    let cert = parse_certificate(&cert_slot.content)?;
    let meta = cert.metadata()?;

    let user_domain = submission.domain.clone().filter(|d| !d.trim().is_empty());
    let derived_domain = Some(meta.common_name.clone()).filter(|cn| !cn.is_empty());
    let domain = resolve_field(user_domain, derived_domain).unwrap_or_default();
    let expiration_date =
        resolve_field(submission.expiration_date, Some(meta.not_after)).unwrap_or(meta.not_after);

    let notes = submission.notes.clone().filter(|n| !n.trim().is_empty());
    let timestamp = Utc::now().timestamp_millis();

    let new_record = |record_type: RecordType, file_name: &str, content: &str| -> Result<ArchiveRecord> {
        Ok(ArchiveRecord {
            id: new_record_id()?,
            user_id: submission.user_id.clone(),
            client_name: submission.client_name.clone(),
            domain: domain.clone(),
            expiration_date,
            record_type,
            file_name: file_name.into(),
            content: content.into(),
            notes: notes.clone(),
            timestamp,
        })
    };

    let mut records = Vec::new();
    records.push(new_record(RecordType::Pem, &cert_slot.file_name, &cert_slot.content)?);

    let mut key = None;
    let mut pfx_error = None;
    if let Some(slot) = &submission.private_key {
        match parse_private_key(&slot.content) {
            Ok(parsed) => key = Some(parsed),
            Err(err) => {
                warn!("private key not parseable, archived as submitted: {err}");
                pfx_error = Some(err);
            }
        }
        records.push(new_record(RecordType::Key, &slot.file_name, &slot.content)?);
    }

    let mut chain = Vec::new();
    if let Some(slot) = &submission.chain_bundle {
        chain = split_chain(&slot.content);
        records.push(new_record(RecordType::Pem, &slot.file_name, &slot.content)?);
    }

    if let Some(key) = &key {
        match build_pkcs12(
            &cert,
            key,
            &chain,
            &submission.pfx_password,
            &submission.client_name,
            options,
        ) {
            Ok(der) => {
                // a CN-less certificate with no user domain would otherwise
                // name the container ".pfx"
                let stem = if domain.is_empty() {
                    &submission.client_name
                } else {
                    &domain
                };
                let file_name = format!("{stem}.pfx");
                records.push(new_record(RecordType::Pfx, &file_name, &encode_block(&der))?);
            }
            Err(err) => {
                warn!("PFX synthesis failed, archiving remaining records: {err}");
                pfx_error = Some(err);
            }
        }
    }

    let mut persisted = Vec::with_capacity(records.len());
    for record in records {
        store.insert(&record)?;
        debug!(id = %record.id, kind = ?record.record_type, "record archived");
        persisted.push(record);
    }

    Ok(SubmissionOutcome {
        records: persisted,
        pfx_error,
    })
}

// Opaque record ids: random 128-bit bignum, hex encoded.
fn new_record_id() -> Result<String> {
    let mut n = BigNum::new()?;
    n.rand(128, MsbOption::MAYBE_ZERO, false)?;
    Ok(n.to_hex_str()?.to_lowercase())
}
