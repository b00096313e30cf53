use crate::record::Record;
use log::debug;
use serde::{Deserialize, Serialize};

/// Operator-controlled filters. An empty field means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    /// Settled name pattern, matched case-insensitively
    pub name_pattern: String,

    /// Exact group key to keep
    pub group_filter: String,
}

impl FilterState {
    pub fn new(name_pattern: impl Into<String>, group_filter: impl Into<String>) -> Self {
        Self {
            name_pattern: name_pattern.into(),
            group_filter: group_filter.into(),
        }
    }

    /// True when no predicate is active
    pub fn is_unrestricted(&self) -> bool {
        self.name_pattern.is_empty() && self.group_filter.is_empty()
    }

    /// Predicates that currently restrict the visible set
    pub fn active_predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(2);
        if !self.name_pattern.is_empty() {
            predicates.push(Predicate::NameContains(self.name_pattern.to_lowercase()));
        }
        if !self.group_filter.is_empty() {
            predicates.push(Predicate::GroupEquals(self.group_filter.clone()));
        }
        predicates
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.active_predicates()
            .iter()
            .all(|predicate| predicate.test(record))
    }
}

/// A single pure filter predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Lowercased needle found in the first or last name
    NameContains(String),
    /// Group key equal to the given value, case-sensitive
    GroupEquals(String),
}

impl Predicate {
    pub fn test(&self, record: &Record) -> bool {
        match self {
            Predicate::NameContains(needle) => {
                record.first_name.to_lowercase().contains(needle.as_str())
                    || record.last_name.to_lowercase().contains(needle.as_str())
            }
            Predicate::GroupEquals(group) => record.group_key == *group,
        }
    }
}

/// Indices of the records passing every active predicate, in store order.
pub fn compose_visible(records: &[Record], filter: &FilterState) -> Vec<usize> {
    let predicates = filter.active_predicates();
    debug!(
        "Filtering {} records with {} active predicates",
        records.len(),
        predicates.len()
    );

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| predicates.iter().all(|predicate| predicate.test(record)))
        .map(|(idx, _)| idx)
        .collect()
}
