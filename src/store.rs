use crate::archive::ArchiveRecord;
use crate::error::Result;

/// Contract of the persistent row store the engine delegates all I/O to.
///
/// The engine never talks to a backend directly; the submission workflow
/// takes any implementation of this trait, so it runs the same against a
/// SQL-backed store or the in-memory one used in tests. Implementations
/// surface their failures as
/// [`ArchiveError::Persistence`](crate::error::ArchiveError::Persistence).
pub trait ArchiveStore {
    /// All records, in whatever order the backend returns them.
    fn list(&self) -> Result<Vec<ArchiveRecord>>;

    /// Appends a record. Records are immutable; there is no update call.
    fn insert(&mut self, record: &ArchiveRecord) -> Result<()>;

    /// Deletes a record by id. Deleting an unknown id is a no-op, keeping
    /// the call idempotent.
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// In-memory [`ArchiveStore`] holding records in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<ArchiveRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArchiveStore for MemoryStore {
    fn list(&self) -> Result<Vec<ArchiveRecord>> {
        Ok(self.records.clone())
    }

    fn insert(&mut self, record: &ArchiveRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.records.retain(|record| record.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::RecordType;
    use chrono::NaiveDate;

    fn record(id: &str) -> ArchiveRecord {
        ArchiveRecord {
            id: id.into(),
            user_id: "1".into(),
            client_name: "Acme".into(),
            domain: "example.com".into(),
            expiration_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            record_type: RecordType::Pem,
            file_name: "cert.pem".into(),
            content: "content".into(),
            notes: None,
            timestamp: 0,
        }
    }

    #[test]
    fn insert_then_list_preserves_order() {
        let mut store = MemoryStore::new();
        store.insert(&record("a")).unwrap();
        store.insert(&record("b")).unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "a");
        assert_eq!(listed[1].id, "b");
    }

    #[test]
    fn delete_removes_by_id() {
        let mut store = MemoryStore::new();
        store.insert(&record("a")).unwrap();
        store.insert(&record("b")).unwrap();
        store.delete("a").unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "b");
    }

    #[test]
    fn delete_of_unknown_id_is_a_noop() {
        let mut store = MemoryStore::new();
        store.insert(&record("a")).unwrap();
        assert!(store.delete("missing").is_ok());
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
