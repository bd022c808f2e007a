use serde::{Deserialize, Serialize};

use crate::models::{Assignment, ClassPeriod, Grade, Snapshot};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GradebookResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Course {
    #[serde(default)]
    pub period: Option<NumberOrText>,
    pub title: String,
    #[serde(default)]
    pub staff: String,
    #[serde(rename = "ClassID", default)]
    pub class_id: Option<NumberOrText>,
    #[serde(default)]
    pub calculated_score_string: String,
    #[serde(default)]
    pub calculated_score_raw: Option<NumberOrText>,
    #[serde(default)]
    pub assignments: Vec<AssignmentEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssignmentEntry {
    pub measure: String,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub points: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "GradebookID", default)]
    pub gradebook_id: Option<NumberOrText>,
}

/// The feed is inconsistent about quoting numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().trim_end_matches('%').parse().ok(),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            NumberOrText::Number(n) if n.fract() == 0.0 => format!("{}", n as i64),
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s,
        }
    }
}

impl Course {
    fn period_number(&self) -> Option<u32> {
        self.period
            .as_ref()
            .and_then(NumberOrText::as_f64)
            .filter(|n| *n >= 0.0)
            .map(|n| n as u32)
    }
}

impl From<AssignmentEntry> for Assignment {
    fn from(entry: AssignmentEntry) -> Self {
        Assignment {
            measure: entry.measure,
            kind: entry.kind,
            due_date: entry.due_date,
            points: entry.points,
            notes: entry.notes,
            gradebook_id: entry.gradebook_id.map(NumberOrText::into_text),
        }
    }
}

impl From<Course> for ClassPeriod {
    fn from(course: Course) -> Self {
        ClassPeriod {
            title: course.title,
            teacher: course.staff,
            grade: Grade {
                letter: course.calculated_score_string,
                percent: course.calculated_score_raw.as_ref().and_then(NumberOrText::as_f64),
            },
            class_id: course.class_id.map(NumberOrText::into_text),
            assignments: course.assignments.into_iter().map(Assignment::from).collect(),
        }
    }
}

impl GradebookResponse {
    /// Orders courses by their period number so positions line up across
    /// refreshes. Courses without a readable period keep feed order, last.
    pub fn into_snapshot(self) -> Snapshot {
        let mut courses = self.courses;
        courses.sort_by_key(|course| match course.period_number() {
            Some(n) => (0, n),
            None => (1, 0),
        });
        Snapshot::new(courses.into_iter().map(ClassPeriod::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_feed_document_in_period_order() {
        let body = r#"{
            "Courses": [
                {
                    "Period": "2",
                    "Title": "Chemistry",
                    "Staff": "Ms. Okafor",
                    "ClassID": 4411,
                    "CalculatedScoreString": "B+",
                    "CalculatedScoreRaw": "88.4",
                    "Assignments": [
                        {"Measure": "Lab 1", "Type": "Lab", "DueDate": "9/10/2024", "Points": "18 / 20", "Notes": "", "GradebookID": 731}
                    ]
                },
                {
                    "Period": 1,
                    "Title": "Algebra II",
                    "Staff": "Mr. Lind",
                    "CalculatedScoreString": "A",
                    "CalculatedScoreRaw": 95,
                    "Assignments": []
                }
            ]
        }"#;

        let snapshot = serde_json::from_str::<GradebookResponse>(body)
            .unwrap()
            .into_snapshot();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.periods[0].title, "Algebra II");
        assert_eq!(snapshot.periods[0].grade.percent, Some(95.0));

        let chem = &snapshot.periods[1];
        assert_eq!(chem.teacher, "Ms. Okafor");
        assert_eq!(chem.class_id.as_deref(), Some("4411"));
        assert_eq!(chem.grade.letter, "B+");
        assert_eq!(chem.assignments[0].kind.as_deref(), Some("Lab"));
        assert_eq!(chem.assignments[0].gradebook_id.as_deref(), Some("731"));
    }

    #[test]
    fn missing_tracked_fields_stay_missing() {
        let body = r#"{"Courses": [{"Title": "Art", "Assignments": [{"Measure": "Sketchbook"}]}]}"#;
        let snapshot = serde_json::from_str::<GradebookResponse>(body)
            .unwrap()
            .into_snapshot();

        let sketchbook = &snapshot.periods[0].assignments[0];
        assert_eq!(sketchbook.points, None);
        assert_eq!(sketchbook.due_date, None);
    }

    #[test]
    fn null_notes_decode_to_a_stable_snapshot() {
        let body = r#"{"Courses": [{"Title": "Art", "Assignments": [
            {"Measure": "Sketchbook", "Type": "Project", "DueDate": "9/1/2024", "Points": "", "Notes": null}
        ]}]}"#;
        let snapshot = serde_json::from_str::<GradebookResponse>(body)
            .unwrap()
            .into_snapshot();

        assert_eq!(snapshot.periods[0].assignments[0].notes, None);
        assert!(crate::diff::compute_changes(&snapshot, &snapshot).unwrap().is_empty());
    }
}
