//! In-memory record store: the single source of truth for filtering and lookup

use crate::model::CountryRecord;
use std::collections::HashMap;

/// The full fetched record set.
///
/// Built exactly once from a fetch result and read-only afterwards; share it
/// behind an `Arc` when several components need it.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<CountryRecord>,
    by_key: HashMap<String, usize>,
}

impl RecordStore {
    pub fn new(records: Vec<CountryRecord>) -> Self {
        let mut by_key = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if by_key.contains_key(&record.cca3) {
                log::warn!("Duplicate country key {} in catalog, keeping first", record.cca3);
                continue;
            }
            by_key.insert(record.cca3.clone(), idx);
        }
        Self { records, by_key }
    }

    /// Store with no records (before load, or after a failed fetch)
    pub fn empty() -> Self {
        Self::default()
    }

    /// All records in catalog order
    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn get(&self, key: &str) -> Option<&CountryRecord> {
        self.by_key.get(key).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Display name for a key, if it resolves in this set
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.get(key).map(CountryRecord::display_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    #[test]
    fn test_lookup_by_key() {
        let store = RecordStore::new(vec![
            record("FRA", "France", "Europe"),
            record("DEU", "Germany", "Europe"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.display_name("DEU"), Some("Germany"));
        assert!(store.get("ESP").is_none());
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let store = RecordStore::new(vec![
            record("FRA", "France", "Europe"),
            record("FRA", "Not France", "Europe"),
        ]);
        assert_eq!(store.display_name("FRA"), Some("France"));
        // The set itself is kept verbatim
        assert_eq!(store.records().len(), 2);
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::empty();
        assert!(store.is_empty());
        assert!(!store.contains("FRA"));
    }
}
