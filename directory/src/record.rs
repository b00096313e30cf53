use crate::error::{DirectoryError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single user entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier, unique within a store
    pub id: u64,

    pub first_name: String,

    pub last_name: String,

    /// ISO 8601 date as delivered by the source; may be malformed
    #[serde(default)]
    pub birth_date: String,

    /// Partition key (the city)
    pub group_key: String,
}

impl Record {
    pub fn new(
        id: u64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: impl Into<String>,
        group_key: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: birth_date.into(),
            group_key: group_key.into(),
        }
    }

    /// Parsed birth date, `None` when the raw value is missing or malformed.
    pub fn born_at(&self) -> Option<NaiveDateTime> {
        parse_birth_date(&self.birth_date)
    }
}

/// Parse a birth date.
///
/// Accepts `YYYY-M-D` with optional zero padding, ISO 8601 date-times without
/// an offset (taken as-is) and RFC 3339 date-times (normalized to UTC).
/// Date-only values are placed at midnight.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    if let Ok(local) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(local);
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .as_ref()
        .map(DateTime::naive_utc)
}

/// Immutable, insertion-ordered snapshot of ingested records
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Build a store, rejecting the whole batch on a duplicate id.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(DirectoryError::DuplicateId(record.id));
            }
        }
        Ok(Self { records })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct group keys in first-seen order
    pub fn group_keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|record| record.group_key.as_str())
            .filter(|key| seen.insert(*key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_parse_padded_and_unpadded_dates() {
        assert_eq!(parse_birth_date("1990-05-01"), Some(midnight(1990, 5, 1)));
        assert_eq!(parse_birth_date("1996-5-30"), Some(midnight(1996, 5, 30)));
        assert_eq!(parse_birth_date(" 2000-1-1 "), Some(midnight(2000, 1, 1)));
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let parsed = parse_birth_date("1990-05-01T02:00:00+02:00").unwrap();
        assert_eq!(parsed, midnight(1990, 5, 1));
    }

    #[test]
    fn test_parse_datetime_without_offset() {
        let at_ten = NaiveDate::from_ymd_opt(1980, 1, 1)
            .and_then(|date| date.and_hms_opt(10, 0, 0))
            .unwrap();
        assert_eq!(parse_birth_date("1980-01-01T10:00:00"), Some(at_ten));
        assert_eq!(parse_birth_date("1980-01-01T10:00:00.000"), Some(at_ten));
        assert_eq!(parse_birth_date("1980-01-01T25:00:00"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_birth_date(""), None);
        assert_eq!(parse_birth_date("yesterday"), None);
        assert_eq!(parse_birth_date("1990-13-01"), None);
        assert_eq!(parse_birth_date("1990-02-30"), None);
    }

    #[test]
    fn test_store_rejects_duplicate_ids() {
        let records = vec![
            Record::new(1, "Ann", "Lee", "1990-05-01", "Lyon"),
            Record::new(1, "Ben", "Ng", "1985-02-10", "Lyon"),
        ];

        let err = RecordStore::new(records).unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateId(1)));
    }

    #[test]
    fn test_group_keys_first_seen_order() {
        let store = RecordStore::new(vec![
            Record::new(1, "Ann", "Lee", "1990-05-01", "Lyon"),
            Record::new(2, "Cy", "Ann", "2000-01-01", "Metz"),
            Record::new(3, "Ben", "Ng", "1985-02-10", "Lyon"),
            Record::new(4, "Dee", "Ox", "1970-07-07", "lyon"),
        ])
        .unwrap();

        assert_eq!(store.group_keys(), vec!["Lyon", "Metz", "lyon"]);
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(2).map(|r| r.id), Some(3));
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::empty();
        assert!(store.is_empty());
        assert!(store.group_keys().is_empty());
    }
}
