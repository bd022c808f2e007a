use serde::{Deserialize, Serialize};

use super::{Assignment, TrackedField};

/// Assignments of one period that landed in the same change bucket.
///
/// `class_title` names the class the entry was diffed from. It stays with
/// the report so the entry can be labeled after the snapshot at
/// `period_index` has moved on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodChanges<T> {
    pub period_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_title: Option<String>,
    pub assignments: Vec<T>,
}

impl<T> PeriodChanges<T> {
    pub fn new(period_index: usize, assignments: Vec<T>) -> Self {
        Self {
            period_index,
            class_title: None,
            assignments,
        }
    }

    pub fn titled(mut self, class_title: impl Into<String>) -> Self {
        self.class_title = Some(class_title.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedAssignment {
    pub measure: String,
    pub changed_fields: Vec<TrackedField>,
}

/// Result of diffing two snapshots. Buckets with no entries are left out
/// of the JSON document and read back as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<PeriodChanges<Assignment>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<PeriodChanges<Assignment>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed: Vec<PeriodChanges<ChangedAssignment>>,
}

impl ChangeReport {
    pub fn is_empty(&self) -> bool {
        self.added.iter().all(|entry| entry.assignments.is_empty())
            && self.removed.iter().all(|entry| entry.assignments.is_empty())
            && self.changed.iter().all(|entry| entry.assignments.is_empty())
    }

    /// Number of (added, changed, removed) assignments across all periods.
    pub fn counts(&self) -> (usize, usize, usize) {
        fn total<T>(entries: &[PeriodChanges<T>]) -> usize {
            entries.iter().map(|entry| entry.assignments.len()).sum()
        }
        (total(&self.added), total(&self.changed), total(&self.removed))
    }
}
