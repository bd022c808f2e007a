use serde::{Deserialize, Serialize};

/// One gradebook entry inside a class period.
///
/// `measure` is the display name and acts as the natural key when two
/// snapshots of the same period are compared. The four tracked fields are
/// optional because the upstream feed occasionally omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub measure: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub points: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Rendering key only, never compared.
    #[serde(default)]
    pub gradebook_id: Option<String>,
}

impl Assignment {
    /// Well-formed assignment with every tracked field present but blank.
    pub fn named(measure: impl Into<String>) -> Self {
        Self {
            measure: measure.into(),
            kind: Some(String::new()),
            due_date: Some(String::new()),
            points: Some(String::new()),
            notes: Some(String::new()),
            gradebook_id: None,
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn points(mut self, points: impl Into<String>) -> Self {
        self.points = Some(points.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn gradebook_id(mut self, id: impl Into<String>) -> Self {
        self.gradebook_id = Some(id.into());
        self
    }

    pub fn tracked(&self, field: TrackedField) -> Option<&str> {
        match field {
            TrackedField::Type => self.kind.as_deref(),
            TrackedField::DueDate => self.due_date.as_deref(),
            TrackedField::Points => self.points.as_deref(),
            TrackedField::Notes => self.notes.as_deref(),
        }
    }

    /// Tracked fields whose values differ from `other`, in label order.
    ///
    /// A field missing on one side never matches a present one; missing on
    /// both sides compares equal.
    pub fn changed_fields(&self, other: &Assignment) -> Vec<TrackedField> {
        TrackedField::ALL
            .into_iter()
            .filter(|field| self.tracked(*field) != other.tracked(*field))
            .collect()
    }
}

/// Assignment attributes the diff engine compares. Serialized as the label
/// shown to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedField {
    #[serde(rename = "Type")]
    Type,
    #[serde(rename = "Due Date")]
    DueDate,
    #[serde(rename = "Points")]
    Points,
    #[serde(rename = "Notes")]
    Notes,
}

impl TrackedField {
    pub const ALL: [TrackedField; 4] = [
        TrackedField::Type,
        TrackedField::DueDate,
        TrackedField::Points,
        TrackedField::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TrackedField::Type => "Type",
            TrackedField::DueDate => "Due Date",
            TrackedField::Points => "Points",
            TrackedField::Notes => "Notes",
        }
    }
}

impl std::fmt::Display for TrackedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
