//! Change detection between two gradebook snapshots.
//!
//! Periods are paired either by position (the feed's native order) or by
//! class identity. Within a pair, assignments are matched by `measure`,
//! first match wins, and only the tracked fields are compared.

use std::str::FromStr;

use thiserror::Error;

use crate::models::{Assignment, ChangeReport, ChangedAssignment, PeriodChanges, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("snapshot shape mismatch: previous has {previous} periods, current has {current}")]
    ShapeMismatch { previous: usize, current: usize },
}

/// How periods of the previous snapshot are paired with the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeriodAlignment {
    /// Same index in both snapshots. Counts must match.
    #[default]
    Position,
    /// Same `ClassPeriod::key()`, wherever the class sits in each snapshot.
    Class,
}

impl FromStr for PeriodAlignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "position" | "positional" => Ok(Self::Position),
            "class" | "class_id" => Ok(Self::Class),
            other => Err(format!("unknown period alignment: {}", other)),
        }
    }
}

pub fn diff(
    previous: &Snapshot,
    current: &Snapshot,
    alignment: PeriodAlignment,
) -> Result<ChangeReport, DiffError> {
    match alignment {
        PeriodAlignment::Position => compute_changes(previous, current),
        PeriodAlignment::Class => Ok(compute_changes_by_class(previous, current)),
    }
}

/// Positional diff. Refuses to guess when a class was added or dropped.
pub fn compute_changes(previous: &Snapshot, current: &Snapshot) -> Result<ChangeReport, DiffError> {
    if previous.len() != current.len() {
        return Err(DiffError::ShapeMismatch {
            previous: previous.len(),
            current: current.len(),
        });
    }

    let mut report = ChangeReport::default();
    for (index, (old, new)) in previous.iter().zip(current.iter()).enumerate() {
        record(&mut report, index, &new.title, diff_period(&old.assignments, &new.assignments));
    }
    Ok(report)
}

/// Diff keyed by class identity.
///
/// Matched and newly enrolled classes report under their current index. A
/// dropped class reports its assignments as removed under its previous index,
/// carrying its own title since that index may now hold another class.
pub fn compute_changes_by_class(previous: &Snapshot, current: &Snapshot) -> ChangeReport {
    let mut report = ChangeReport::default();
    let mut unmatched: Vec<_> = previous.iter().enumerate().collect();

    for (index, new) in current.iter().enumerate() {
        let period = match unmatched.iter().position(|(_, old)| old.key() == new.key()) {
            Some(pos) => {
                let (_, old) = unmatched.remove(pos);
                diff_period(&old.assignments, &new.assignments)
            }
            None => diff_period(&[], &new.assignments),
        };
        record(&mut report, index, &new.title, period);
    }

    for (index, old) in unmatched {
        record(&mut report, index, &old.title, diff_period(&old.assignments, &[]));
    }

    report.removed.sort_by_key(|entry| entry.period_index);
    report
}

#[derive(Debug, Default)]
struct PeriodDiff {
    added: Vec<Assignment>,
    removed: Vec<Assignment>,
    changed: Vec<ChangedAssignment>,
}

fn diff_period(previous: &[Assignment], current: &[Assignment]) -> PeriodDiff {
    let mut remaining: Vec<&Assignment> = previous.iter().collect();
    let mut period = PeriodDiff::default();

    for new in current {
        match remaining.iter().position(|old| old.measure == new.measure) {
            None => period.added.push(new.clone()),
            Some(pos) => {
                let old = remaining.remove(pos);
                let changed_fields = old.changed_fields(new);
                if !changed_fields.is_empty() {
                    period.changed.push(ChangedAssignment {
                        measure: new.measure.clone(),
                        changed_fields,
                    });
                }
            }
        }
    }

    period.removed = remaining.into_iter().cloned().collect();
    period
}

fn record(report: &mut ChangeReport, period_index: usize, class_title: &str, period: PeriodDiff) {
    if !period.added.is_empty() {
        report
            .added
            .push(PeriodChanges::new(period_index, period.added).titled(class_title));
    }
    if !period.removed.is_empty() {
        report
            .removed
            .push(PeriodChanges::new(period_index, period.removed).titled(class_title));
    }
    if !period.changed.is_empty() {
        report
            .changed
            .push(PeriodChanges::new(period_index, period.changed).titled(class_title));
    }
}
