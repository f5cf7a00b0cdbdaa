//! The supplier contact directory.
//!
//! Every mutation reads the full record list, edits it in memory and hands
//! the whole list back to the backend, then returns a freshly loaded
//! [`Grouping`] so callers never hold stale data.

use crate::error::{Error, Result};
use crate::models::{Contact, ContactId, ContactRecord};
use crate::storage::DirectoryBackend;
use indexmap::IndexMap;
use serde::Serialize;

/// Contacts keyed by supplier name, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grouping {
    suppliers: IndexMap<String, Vec<Contact>>,
}

impl Grouping {
    pub fn from_records(records: impl IntoIterator<Item = ContactRecord>) -> Self {
        let mut suppliers: IndexMap<String, Vec<Contact>> = IndexMap::new();
        for (idx, record) in records.into_iter().enumerate() {
            suppliers
                .entry(record.supplier.clone())
                .or_default()
                .push(Contact { id: ContactId(idx), record });
        }
        Self { suppliers }
    }

    pub fn suppliers(&self) -> impl Iterator<Item = &str> {
        self.suppliers.keys().map(String::as_str)
    }

    pub fn contacts(&self, supplier: &str) -> &[Contact] {
        self.suppliers.get(supplier).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Contact])> {
        self.suppliers.iter().map(|(name, contacts)| (name.as_str(), contacts.as_slice()))
    }

    /// All contacts, supplier group by supplier group.
    pub fn contacts_grouped(&self) -> impl Iterator<Item = &Contact> {
        self.suppliers.values().flatten()
    }

    /// All records in the order they sit in the store.
    pub fn records(&self) -> Vec<ContactRecord> {
        let mut contacts: Vec<&Contact> = self.contacts_grouped().collect();
        contacts.sort_by_key(|c| c.id);
        contacts.into_iter().map(|c| c.record.clone()).collect()
    }

    pub fn find(&self, id: ContactId) -> Option<&Contact> {
        self.contacts_grouped().find(|c| c.id == id)
    }

    /// Number of contacts.
    pub fn len(&self) -> usize {
        self.suppliers.values().map(Vec::len).sum()
    }

    pub fn supplier_count(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

pub struct DirectoryStore<B> {
    backend: B,
}

impl<B: DirectoryBackend> DirectoryStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Wraps `backend` and makes sure it holds at least a header.
    pub fn open(backend: B) -> Result<Self> {
        let store = Self::new(backend);
        store.ensure_initialized()?;
        Ok(store)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.backend.exists() {
            log::info!("creating empty supplier directory");
            self.backend.initialize()?;
        }
        Ok(())
    }

    pub fn load(&self) -> Result<Grouping> {
        let grouping = Grouping::from_records(self.backend.read_records()?);
        log::debug!(
            "loaded {} contact(s) across {} supplier(s)",
            grouping.len(),
            grouping.supplier_count()
        );
        Ok(grouping)
    }

    pub fn append(&self, record: &ContactRecord) -> Result<Grouping> {
        let record = record.validated()?;
        let mut records = self.backend.read_records()?;
        log::info!("adding {} at {}", record.contact_name, record.supplier);
        records.push(record);
        self.backend.write_records(&records)?;
        self.load()
    }

    /// Replaces the first record equal to `identity`.
    ///
    /// A missing identity leaves the store untouched and is not an error.
    pub fn update(&self, identity: &ContactRecord, new_record: &ContactRecord) -> Result<Grouping> {
        let new_record = new_record.validated()?;
        let mut records = self.backend.read_records()?;
        match records.iter().position(|r| r == identity) {
            Some(idx) => {
                log::info!("updating contact at row {}", idx);
                records[idx] = new_record;
                self.backend.write_records(&records)?;
            }
            None => log::warn!(
                "update skipped: no contact {} at {}",
                identity.label(),
                identity.supplier
            ),
        }
        self.load()
    }

    /// Removes the first record equal to `identity`.
    ///
    /// A missing identity leaves the store untouched and is not an error.
    pub fn delete(&self, identity: &ContactRecord) -> Result<Grouping> {
        let mut records = self.backend.read_records()?;
        match records.iter().position(|r| r == identity) {
            Some(idx) => {
                log::info!("deleting contact at row {}", idx);
                records.remove(idx);
                self.backend.write_records(&records)?;
            }
            None => log::warn!(
                "delete skipped: no contact {} at {}",
                identity.label(),
                identity.supplier
            ),
        }
        self.load()
    }

    /// Replaces the row loaded as `id`, provided it still holds `expected`.
    ///
    /// Fails with `ContactNotFound` when the row is gone or now holds a
    /// different contact, so an id from an out-of-date grouping never hits
    /// the wrong row.
    pub fn update_by_id(
        &self,
        id: ContactId,
        expected: &ContactRecord,
        new_record: &ContactRecord,
    ) -> Result<Grouping> {
        let new_record = new_record.validated()?;
        let mut records = self.backend.read_records()?;
        let idx = locate(&records, id, expected)?;
        log::info!("updating contact at row {}", id);
        records[idx] = new_record;
        self.backend.write_records(&records)?;
        self.load()
    }

    /// Removes the row loaded as `id`, provided it still holds `expected`.
    pub fn delete_by_id(&self, id: ContactId, expected: &ContactRecord) -> Result<Grouping> {
        let mut records = self.backend.read_records()?;
        let idx = locate(&records, id, expected)?;
        log::info!("deleting contact at row {}", id);
        records.remove(idx);
        self.backend.write_records(&records)?;
        self.load()
    }
}

fn locate(records: &[ContactRecord], id: ContactId, expected: &ContactRecord) -> Result<usize> {
    match records.get(id.0) {
        Some(record) if record == expected => Ok(id.0),
        Some(_) => {
            log::warn!("row {} no longer holds {}", id, expected.label());
            Err(Error::ContactNotFound(id))
        }
        None => Err(Error::ContactNotFound(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Field;
    use crate::storage::MemoryBackend;

    fn rec(supplier: &str, contact: &str, email: &str) -> ContactRecord {
        ContactRecord::new(supplier, contact, email)
    }

    fn seeded() -> DirectoryStore<MemoryBackend> {
        DirectoryStore::new(MemoryBackend::with_records(vec![
            rec("Acme", "Jo", "jo@acme.test"),
            rec("Bolt", "Sam", "sam@bolt.test"),
            rec("Acme", "Kim", "kim@acme.test"),
            rec("Acme", "Jo", "jo@acme.test"),
        ]))
    }

    fn names(grouping: &Grouping, supplier: &str) -> Vec<String> {
        grouping
            .contacts(supplier)
            .iter()
            .map(|c| c.record.contact_name.clone())
            .collect()
    }

    #[test]
    fn test_ensure_initialized_is_idempotent() {
        let store = DirectoryStore::new(MemoryBackend::new());
        store.ensure_initialized().unwrap();
        store.append(&rec("Acme", "Jo", "jo@acme.test")).unwrap();
        store.ensure_initialized().unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_load_groups_in_first_seen_order() {
        let grouping = seeded().load().unwrap();
        let suppliers: Vec<&str> = grouping.suppliers().collect();
        assert_eq!(suppliers, vec!["Acme", "Bolt"]);
        assert_eq!(names(&grouping, "Acme"), vec!["Jo", "Kim", "Jo"]);
        assert_eq!(names(&grouping, "Bolt"), vec!["Sam"]);
        assert!(grouping.contacts("Nobody").is_empty());
        assert_eq!(grouping.len(), 4);
        assert_eq!(grouping.supplier_count(), 2);
    }

    #[test]
    fn test_ids_follow_store_rows() {
        let grouping = seeded().load().unwrap();
        let ids: Vec<usize> = grouping.contacts("Acme").iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![0, 2, 3]);
        assert_eq!(grouping.find(ContactId(1)).unwrap().record.contact_name, "Sam");
        assert!(grouping.find(ContactId(9)).is_none());
        assert_eq!(grouping.records(), seeded().backend().read_records().unwrap());
    }

    #[test]
    fn test_append_adds_after_existing_contacts() {
        let store = seeded();
        let grouping = store.append(&rec(" Bolt ", " Lee", "lee@bolt.test ")).unwrap();
        assert_eq!(names(&grouping, "Bolt"), vec!["Sam", "Lee"]);
        assert_eq!(
            grouping.contacts("Bolt")[1].record,
            rec("Bolt", "Lee", "lee@bolt.test")
        );
    }

    #[test]
    fn test_append_rejects_empty_field_without_writing() {
        let store = seeded();
        let before = store.backend().read_records().unwrap();
        let err = store.append(&rec("Acme", "  ", "x@acme.test")).unwrap_err();
        assert!(matches!(err, Error::Validation(Field::ContactName)));
        assert_eq!(store.backend().read_records().unwrap(), before);
    }

    #[test]
    fn test_update_replaces_first_match_only() {
        let store = seeded();
        let grouping = store
            .update(&rec("Acme", "Jo", "jo@acme.test"), &rec("Acme", "Joanne", "joanne@acme.test"))
            .unwrap();
        assert_eq!(names(&grouping, "Acme"), vec!["Joanne", "Kim", "Jo"]);
        assert_eq!(names(&grouping, "Bolt"), vec!["Sam"]);
    }

    #[test]
    fn test_update_can_move_contact_to_new_supplier() {
        let store = seeded();
        let grouping = store
            .update(&rec("Bolt", "Sam", "sam@bolt.test"), &rec("Crane", "Sam", "sam@crane.test"))
            .unwrap();
        let suppliers: Vec<&str> = grouping.suppliers().collect();
        assert_eq!(suppliers, vec!["Acme", "Crane"]);
    }

    #[test]
    fn test_update_missing_identity_is_noop() {
        let store = seeded();
        let before = store.backend().read_records().unwrap();
        store
            .update(&rec("Acme", "Nobody", "n@acme.test"), &rec("Acme", "X", "x@acme.test"))
            .unwrap();
        assert_eq!(store.backend().read_records().unwrap(), before);
    }

    #[test]
    fn test_update_validates_new_record() {
        let store = seeded();
        let err = store
            .update(&rec("Acme", "Jo", "jo@acme.test"), &rec("Acme", "Jo", ""))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_delete_removes_one_match_and_repeats_quietly() {
        let store = seeded();
        let jo = rec("Acme", "Jo", "jo@acme.test");

        let grouping = store.delete(&jo).unwrap();
        assert_eq!(names(&grouping, "Acme"), vec!["Kim", "Jo"]);

        let grouping = store.delete(&jo).unwrap();
        assert_eq!(names(&grouping, "Acme"), vec!["Kim"]);

        let grouping = store.delete(&jo).unwrap();
        assert_eq!(grouping.len(), 2);
    }

    #[test]
    fn test_delete_last_contact_drops_supplier() {
        let store = seeded();
        let grouping = store.delete(&rec("Bolt", "Sam", "sam@bolt.test")).unwrap();
        assert_eq!(grouping.supplier_count(), 1);
    }

    #[test]
    fn test_by_id_targets_duplicate_rows() {
        let store = seeded();
        let jo = rec("Acme", "Jo", "jo@acme.test");
        let grouping = store
            .update_by_id(ContactId(3), &jo, &rec("Acme", "Jo Two", "jo2@acme.test"))
            .unwrap();
        assert_eq!(names(&grouping, "Acme"), vec!["Jo", "Kim", "Jo Two"]);

        let grouping = store.delete_by_id(ContactId(0), &jo).unwrap();
        assert_eq!(names(&grouping, "Acme"), vec!["Kim", "Jo Two"]);
    }

    #[test]
    fn test_by_id_out_of_range() {
        let store = seeded();
        let jo = rec("Acme", "Jo", "jo@acme.test");
        let err = store.delete_by_id(ContactId(4), &jo).unwrap_err();
        assert!(matches!(err, Error::ContactNotFound(ContactId(4))));
        let err = store.update_by_id(ContactId(10), &jo, &jo).unwrap_err();
        assert!(matches!(err, Error::ContactNotFound(_)));
    }

    #[test]
    fn test_by_id_rejects_out_of_date_grouping() {
        let store = DirectoryStore::open(MemoryBackend::new()).unwrap();
        store.append(&rec("Acme", "Jo", "jo@acme.test")).unwrap();
        store.append(&rec("Acme", "Kim", "kim@acme.test")).unwrap();
        let old = store.append(&rec("Bolt", "Sam", "sam@bolt.test")).unwrap();

        let jo = old.contacts("Acme")[0].clone();
        let kim = old.contacts("Acme")[1].clone();
        store.delete_by_id(jo.id, &jo.record).unwrap();

        // Kim's old row now holds Sam
        let err = store.delete_by_id(kim.id, &kim.record).unwrap_err();
        assert!(matches!(err, Error::ContactNotFound(_)));
        let err = store
            .update_by_id(kim.id, &kim.record, &rec("Acme", "Kimberly", "kim@acme.test"))
            .unwrap_err();
        assert!(matches!(err, Error::ContactNotFound(_)));

        let remaining = store.load().unwrap().records();
        assert_eq!(
            remaining,
            vec![rec("Acme", "Kim", "kim@acme.test"), rec("Bolt", "Sam", "sam@bolt.test")]
        );
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let store = seeded();
        let before = store.backend().read_records().unwrap();
        store.backend().set_fail_writes(true);

        let err = store.append(&rec("Crane", "Lee", "lee@crane.test")).unwrap_err();
        assert!(matches!(err, Error::StorageWrite(_)));
        assert!(store.delete(&rec("Bolt", "Sam", "sam@bolt.test")).is_err());
        assert_eq!(store.backend().read_records().unwrap(), before);
    }

    #[test]
    fn test_append_round_trip_counts() {
        let store = DirectoryStore::open(MemoryBackend::new()).unwrap();
        let inserted = [
            rec("Acme", "Jo", "jo@acme.test"),
            rec("Bolt", "Sam", "sam@bolt.test"),
            rec("Acme", "Kim", "kim@acme.test"),
            rec("Crane", "Lee", "lee@crane.test"),
            rec("Bolt", "Ash", "ash@bolt.test"),
        ];
        for record in &inserted {
            store.append(record).unwrap();
        }
        let grouping = store.load().unwrap();
        assert_eq!(grouping.len(), inserted.len());
        assert_eq!(grouping.supplier_count(), 3);
        assert_eq!(grouping.records(), inserted.to_vec());
    }
}
