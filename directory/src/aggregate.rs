use crate::record::Record;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use log::{debug, warn};

#[derive(Debug, Clone)]
struct Oldest {
    record: Record,
    born_at: NaiveDateTime,
}

/// Earliest-born record per group key.
///
/// Computed from the full record set only; filters never influence it, so a
/// group's holder may well be hidden from the current view. Ties keep the
/// record seen first. Records with an unparseable birth date are left out of
/// the comparison and listed in [`GroupAggregate::invalid_dates`]; a group
/// made up only of such records has no entry.
#[derive(Debug, Clone, Default)]
pub struct GroupAggregate {
    oldest: IndexMap<String, Oldest>,
    invalid_dates: Vec<u64>,
}

impl GroupAggregate {
    pub fn compute(records: &[Record]) -> Self {
        let mut oldest: IndexMap<String, Oldest> = IndexMap::new();
        let mut invalid_dates = Vec::new();

        for record in records {
            let Some(born_at) = record.born_at() else {
                warn!(
                    "Record {} has unparseable birth date {:?}; skipped for aggregation",
                    record.id, record.birth_date
                );
                invalid_dates.push(record.id);
                continue;
            };

            match oldest.get_mut(&record.group_key) {
                Some(best) if born_at < best.born_at => {
                    best.record = record.clone();
                    best.born_at = born_at;
                }
                Some(_) => {}
                None => {
                    oldest.insert(
                        record.group_key.clone(),
                        Oldest {
                            record: record.clone(),
                            born_at,
                        },
                    );
                }
            }
        }

        debug!(
            "Aggregated {} records into {} groups ({} invalid dates)",
            records.len(),
            oldest.len(),
            invalid_dates.len()
        );

        Self {
            oldest,
            invalid_dates,
        }
    }

    /// The earliest-born record of `group_key`
    pub fn get(&self, group_key: &str) -> Option<&Record> {
        self.oldest.get(group_key).map(|entry| &entry.record)
    }

    pub fn holder_id(&self, group_key: &str) -> Option<u64> {
        self.get(group_key).map(|record| record.id)
    }

    /// Whether `record` holds its group's minimum
    pub fn is_group_minimum(&self, record: &Record) -> bool {
        self.holder_id(&record.group_key) == Some(record.id)
    }

    /// Groups and their holders, in first-seen group order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.oldest
            .iter()
            .map(|(group, entry)| (group.as_str(), &entry.record))
    }

    /// Ids of records excluded because their birth date did not parse
    pub fn invalid_dates(&self) -> &[u64] {
        &self.invalid_dates
    }

    pub fn len(&self) -> usize {
        self.oldest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oldest.is_empty()
    }
}
