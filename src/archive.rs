use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of artifact an archive record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A certificate or chain bundle, stored as PEM text.
    Pem,
    /// A private key, stored as PEM text.
    Key,
    /// A synthesized PKCS#12 container, stored as base64 encoded DER.
    Pfx,
}

/// An archived credential artifact.
///
/// Records are append-only: they are created once by the submission
/// workflow and never mutated afterwards; deletion by id is the only
/// post-creation operation. Field names on the wire follow the store row
/// shape (`client_name`, `expiration_date` as `YYYY-MM-DD`, `timestamp` in
/// epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub id: String,
    pub user_id: String,
    pub client_name: String,
    pub domain: String,
    pub expiration_date: NaiveDate,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub file_name: String,
    pub content: String,
    pub notes: Option<String>,
    pub timestamp: i64,
}

impl ArchiveRecord {
    /// True when the record's expiration date lies strictly before `today`.
    /// A record expiring today is not yet expired.
    pub fn is_expired_at(&self, today: NaiveDate) -> bool {
        self.expiration_date < today
    }

    /// [`is_expired_at`](Self::is_expired_at) evaluated against the current
    /// UTC date.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().date_naive())
    }

    /// Transport form of a PFX record: a `data:` URI wrapping the base64
    /// DER payload. PEM and KEY records are downloaded as raw text and
    /// yield `None`.
    pub fn data_uri(&self) -> Option<String> {
        match self.record_type {
            RecordType::Pfx => Some(format!("data:application/x-pkcs12;base64,{}", self.content)),
            _ => None,
        }
    }
}

/// Fill-if-empty merge for submission metadata: a user supplied value
/// always wins, a derived value only fills a blank.
pub fn resolve_field<T>(user: Option<T>, derived: Option<T>) -> Option<T> {
    user.or(derived)
}

/// Case-insensitive substring search over `client_name`, `domain` and
/// `notes`. A record matches if any one field matches; the empty term
/// matches everything. `file_name`, `type` and `content` are never
/// searched. Original order is preserved.
pub fn search<'a>(records: &'a [ArchiveRecord], term: &str) -> Vec<&'a ArchiveRecord> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| {
            needle.is_empty()
                || record.client_name.to_lowercase().contains(&needle)
                || record.domain.to_lowercase().contains(&needle)
                || record
                    .notes
                    .as_ref()
                    .is_some_and(|notes| notes.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(client_name: &str, domain: &str, notes: Option<&str>) -> ArchiveRecord {
        ArchiveRecord {
            id: "abc123".into(),
            user_id: "1".into(),
            client_name: client_name.into(),
            domain: domain.into(),
            expiration_date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            record_type: RecordType::Pem,
            file_name: "cert.pem".into(),
            content: "-----BEGIN CERTIFICATE-----".into(),
            notes: notes.map(String::from),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn record_expiring_today_is_not_expired() {
        let rec = record("Acme", "example.com", None);
        assert!(!rec.is_expired_at(NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()));
    }

    #[test]
    fn record_is_expired_the_day_after() {
        let rec = record("Acme", "example.com", None);
        assert!(rec.is_expired_at(NaiveDate::from_ymd_opt(2030, 6, 2).unwrap()));
    }

    #[test]
    fn record_is_not_expired_the_day_before() {
        let rec = record("Acme", "example.com", None);
        assert!(!rec.is_expired_at(NaiveDate::from_ymd_opt(2030, 5, 31).unwrap()));
    }

    #[test]
    fn empty_term_returns_all_records_in_order() {
        let records = vec![
            record("Beta", "beta.example", None),
            record("Alpha", "alpha.example", None),
        ];
        let found = search(&records, "");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].client_name, "Beta");
        assert_eq!(found[1].client_name, "Alpha");
    }

    #[test]
    fn search_is_case_insensitive_on_domain() {
        let records = vec![record("Acme", "example.com", None)];
        assert_eq!(search(&records, "EXAMPLE").len(), 1);
    }

    #[test]
    fn search_matches_notes_when_present() {
        let records = vec![
            record("Acme", "a.example", Some("renewal due in spring")),
            record("Other", "b.example", None),
        ];
        let found = search(&records, "RENEWAL");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].client_name, "Acme");
    }

    #[test]
    fn search_never_matches_file_name_or_content() {
        let records = vec![record("Acme", "a.example", None)];
        assert!(search(&records, "cert.pem").is_empty());
        assert!(search(&records, "BEGIN CERTIFICATE").is_empty());
    }

    #[test]
    fn user_value_wins_over_derived() {
        assert_eq!(
            resolve_field(Some("user.example"), Some("derived.example")),
            Some("user.example")
        );
    }

    #[test]
    fn derived_value_fills_a_blank() {
        assert_eq!(
            resolve_field(None, Some("derived.example")),
            Some("derived.example")
        );
    }

    #[test]
    fn data_uri_only_for_pfx_records() {
        let mut rec = record("Acme", "example.com", None);
        assert_eq!(rec.data_uri(), None);
        rec.record_type = RecordType::Pfx;
        rec.content = "AAAA".into();
        assert_eq!(
            rec.data_uri().as_deref(),
            Some("data:application/x-pkcs12;base64,AAAA")
        );
    }

    #[test]
    fn wire_shape_matches_store_row() {
        let mut rec = record("Acme", "example.com", Some("prod"));
        rec.record_type = RecordType::Pfx;
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["client_name"], "Acme");
        assert_eq!(json["expiration_date"], "2030-06-01");
        assert_eq!(json["type"], "PFX");
        assert_eq!(json["file_name"], "cert.pem");
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
    }
}
