use crate::aggregate::GroupAggregate;
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// A visible record with its highlight decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedRow {
    pub record: Record,

    /// Highlighting is on and this record is its group's earliest-born
    pub is_flagged: bool,
}

/// What the presentation layer renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedView {
    /// Visible rows in store order
    pub rows: Vec<ProjectedRow>,

    /// Number of visible rows
    pub count: usize,

    /// Ingestion has not completed yet
    pub loading: bool,
}

impl ProjectedView {
    /// Set loading flag
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Rows currently flagged
    pub fn flagged(&self) -> impl Iterator<Item = &ProjectedRow> {
        self.rows.iter().filter(|row| row.is_flagged)
    }

    pub fn flagged_ids(&self) -> Vec<u64> {
        self.flagged().map(|row| row.record.id).collect()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.rows.iter().map(|row| row.record.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Join the visible records with the aggregate.
pub fn project<'a>(
    visible: impl IntoIterator<Item = &'a Record>,
    aggregate: &GroupAggregate,
    highlight_enabled: bool,
) -> ProjectedView {
    let rows: Vec<ProjectedRow> = visible
        .into_iter()
        .map(|record| ProjectedRow {
            is_flagged: highlight_enabled && aggregate.is_group_minimum(record),
            record: record.clone(),
        })
        .collect();

    ProjectedView {
        count: rows.len(),
        rows,
        loading: false,
    }
}
