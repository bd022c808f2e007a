use serde::{Deserialize, Serialize};

use super::Assignment;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub letter: String,
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPeriod {
    pub title: String,
    pub teacher: String,
    #[serde(default)]
    pub grade: Grade,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl ClassPeriod {
    pub fn new(title: impl Into<String>, teacher: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            teacher: teacher.into(),
            grade: Grade::default(),
            class_id: None,
            assignments: Vec::new(),
        }
    }

    pub fn with_class_id(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn with_assignments(mut self, assignments: Vec<Assignment>) -> Self {
        self.assignments = assignments;
        self
    }

    /// Identity used when periods are aligned by class instead of position.
    pub fn key(&self) -> &str {
        self.class_id.as_deref().unwrap_or(&self.title)
    }
}

/// Gradebook state at one refresh, one entry per enrolled class in period
/// order. Positions are the period indices a `ChangeReport` refers to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub periods: Vec<ClassPeriod>,
}

impl Snapshot {
    pub fn new(periods: Vec<ClassPeriod>) -> Self {
        Self { periods }
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ClassPeriod> {
        self.periods.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassPeriod> {
        self.periods.iter()
    }
}

impl From<Vec<ClassPeriod>> for Snapshot {
    fn from(periods: Vec<ClassPeriod>) -> Self {
        Self::new(periods)
    }
}
