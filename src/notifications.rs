//! Turns a change report into alert text, one alert per assignment.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{ChangeReport, PeriodChanges, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Changed,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub period_index: usize,
    pub class_title: String,
    pub kind: ChangeKind,
    pub title: String,
    pub body: String,
}

/// Grouped by period and class, then added, changed, removed within a group.
///
/// Entries are labeled with the class title stored in the report. Reports
/// written without one fall back to the class at that index in `snapshot`.
pub fn notifications(report: &ChangeReport, snapshot: &Snapshot) -> Vec<Notification> {
    let groups: BTreeSet<(usize, String)> = report
        .added
        .iter()
        .map(|e| group_of(e, snapshot))
        .chain(report.changed.iter().map(|e| group_of(e, snapshot)))
        .chain(report.removed.iter().map(|e| group_of(e, snapshot)))
        .collect();

    let mut out = Vec::new();
    for (index, class_title) in groups {
        let notify = |kind: ChangeKind, title: &str, body: String| Notification {
            period_index: index,
            class_title: class_title.clone(),
            kind,
            title: format!("{}: {}", class_title, title),
            body,
        };
        let group = (index, class_title.as_str());

        for assignment in in_group(&report.added, group, snapshot) {
            let body = match assignment.points.as_deref().filter(|p| !p.trim().is_empty()) {
                Some(points) => format!("{} was posted ({})", assignment.measure, points),
                None => format!("{} was posted", assignment.measure),
            };
            out.push(notify(ChangeKind::Added, "New assignment", body));
        }

        for changed in in_group(&report.changed, group, snapshot) {
            let labels: Vec<&str> = changed.changed_fields.iter().map(|f| f.label()).collect();
            let body = format!("{}: {} updated", changed.measure, labels.join(", "));
            out.push(notify(ChangeKind::Changed, "Assignment updated", body));
        }

        for assignment in in_group(&report.removed, group, snapshot) {
            let body = format!("{} was removed", assignment.measure);
            out.push(notify(ChangeKind::Removed, "Assignment removed", body));
        }
    }
    out
}

fn group_of<T>(entry: &PeriodChanges<T>, snapshot: &Snapshot) -> (usize, String) {
    let title = match &entry.class_title {
        Some(title) => title.clone(),
        None => snapshot
            .get(entry.period_index)
            .map(|period| period.title.clone())
            .unwrap_or_else(|| format!("Period {}", entry.period_index + 1)),
    };
    (entry.period_index, title)
}

fn in_group<'a, T>(
    entries: &'a [PeriodChanges<T>],
    group: (usize, &'a str),
    snapshot: &'a Snapshot,
) -> impl Iterator<Item = &'a T> {
    entries
        .iter()
        .filter(move |entry| {
            let (index, title) = group_of(entry, snapshot);
            index == group.0 && title == group.1
        })
        .flat_map(|entry| entry.assignments.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_changes_by_class;
    use crate::models::{Assignment, ChangedAssignment, ClassPeriod, TrackedField};

    #[test]
    fn formats_one_alert_per_assignment() {
        let snapshot = Snapshot::new(vec![
            ClassPeriod::new("Algebra II", "Mr. Lind"),
            ClassPeriod::new("Chemistry", "Ms. Okafor"),
        ]);
        let report = ChangeReport {
            added: vec![PeriodChanges::new(0, vec![Assignment::named("Quiz 2").points("10/10")])],
            removed: vec![PeriodChanges::new(1, vec![Assignment::named("Lab 0")])],
            changed: vec![PeriodChanges::new(
                0,
                vec![ChangedAssignment {
                    measure: "Quiz 1".to_string(),
                    changed_fields: vec![TrackedField::Points, TrackedField::Notes],
                }],
            )],
        };

        let alerts = notifications(&report, &snapshot);

        let summary: Vec<(usize, ChangeKind, &str)> = alerts
            .iter()
            .map(|n| (n.period_index, n.kind, n.body.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, ChangeKind::Added, "Quiz 2 was posted (10/10)"),
                (0, ChangeKind::Changed, "Quiz 1: Points, Notes updated"),
                (1, ChangeKind::Removed, "Lab 0 was removed"),
            ]
        );
        assert_eq!(alerts[0].title, "Algebra II: New assignment");
        assert_eq!(alerts[2].class_title, "Chemistry");
    }

    #[test]
    fn unknown_period_falls_back_to_number() {
        let report = ChangeReport {
            added: vec![PeriodChanges::new(4, vec![Assignment::named("Project")])],
            ..Default::default()
        };

        let alerts = notifications(&report, &Snapshot::default());
        assert_eq!(alerts[0].class_title, "Period 5");
        assert_eq!(alerts[0].body, "Project was posted");
    }

    #[test]
    fn dropped_class_is_titled_from_the_report() {
        let previous = Snapshot::new(vec![
            ClassPeriod::new("Algebra II", "Mr. Lind")
                .with_assignments(vec![Assignment::named("Quiz 1").points("8/10")]),
            ClassPeriod::new("Chemistry", "Ms. Okafor")
                .with_assignments(vec![Assignment::named("Lab 1").points("18/20")]),
            ClassPeriod::new("English 10", "Mr. Reyes")
                .with_assignments(vec![Assignment::named("Essay").notes("Draft")]),
        ]);
        let current = Snapshot::new(vec![
            ClassPeriod::new("Algebra II", "Mr. Lind")
                .with_assignments(vec![Assignment::named("Quiz 1").points("8/10")]),
            ClassPeriod::new("English 10", "Mr. Reyes"),
        ]);

        let report = compute_changes_by_class(&previous, &current);
        let alerts = notifications(&report, &current);

        let titles: Vec<(&str, &str)> = alerts
            .iter()
            .map(|n| (n.title.as_str(), n.body.as_str()))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("Chemistry: Assignment removed", "Lab 1 was removed"),
                ("English 10: Assignment removed", "Essay was removed"),
            ]
        );
    }

    #[test]
    fn stored_title_outlives_a_reshaped_snapshot() {
        let report = ChangeReport {
            removed: vec![PeriodChanges::new(2, vec![Assignment::named("Essay")]).titled("English 10")],
            ..Default::default()
        };
        let rebaselined = Snapshot::new(vec![
            ClassPeriod::new("Algebra II", "Mr. Lind"),
            ClassPeriod::new("Spanish I", "Sra. Vega"),
            ClassPeriod::new("Biology", "Dr. Hale"),
            ClassPeriod::new("English 10", "Mr. Reyes"),
        ]);

        let alerts = notifications(&report, &rebaselined);
        assert_eq!(alerts[0].title, "English 10: Assignment removed");
        assert_eq!(alerts[0].period_index, 2);
    }

    #[test]
    fn empty_report_has_no_alerts() {
        assert!(notifications(&ChangeReport::default(), &Snapshot::default()).is_empty());
    }
}
