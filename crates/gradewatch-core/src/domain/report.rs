//! Change detection between two observations
//!
//! [`compare`] is the diff engine: it turns the current [`Observation`] and
//! the previously stored one into a [`ChangeReport`]. All comparisons are
//! exact string equality; GPA, rank and grade descriptors are opaque tokens.
//!
//! Courses that disappear from the current observation are not reported.
//! Posted grades are not expected to be withdrawn by the source, so only
//! additions and modifications produce entries.

use serde::{Deserialize, Serialize};

use super::observation::Observation;

/// Kind of a single detected change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Overall GPA differs
    GpaChanged,
    /// Major ranking differs
    RankChanged,
    /// A course grade was posted for the first time
    CourseAdded,
    /// An already posted course grade differs
    CourseGradeChanged,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChangeKind::GpaChanged => "gpa_changed",
            ChangeKind::RankChanged => "rank_changed",
            ChangeKind::CourseAdded => "course_added",
            ChangeKind::CourseGradeChanged => "course_grade_changed",
        };
        write!(f, "{}", s)
    }
}

/// One detected change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    kind: ChangeKind,
    /// Course name for course-level changes
    #[serde(skip_serializing_if = "Option::is_none")]
    course: Option<String>,
    /// Previous value, absent for newly posted courses
    old_value: Option<String>,
    new_value: String,
}

impl ChangeEntry {
    pub fn gpa_changed(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::GpaChanged,
            course: None,
            old_value: Some(old.into()),
            new_value: new.into(),
        }
    }

    pub fn rank_changed(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::RankChanged,
            course: None,
            old_value: Some(old.into()),
            new_value: new.into(),
        }
    }

    pub fn course_added(course: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::CourseAdded,
            course: Some(course.into()),
            old_value: None,
            new_value: grade.into(),
        }
    }

    pub fn course_grade_changed(
        course: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            kind: ChangeKind::CourseGradeChanged,
            course: Some(course.into()),
            old_value: Some(old.into()),
            new_value: new.into(),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn course(&self) -> Option<&str> {
        self.course.as_deref()
    }

    pub fn old_value(&self) -> Option<&str> {
        self.old_value.as_deref()
    }

    pub fn new_value(&self) -> &str {
        &self.new_value
    }
}

/// Outcome of comparing a fresh observation against the stored snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    changed: bool,
    is_first_run: bool,
    entries: Vec<ChangeEntry>,
    /// GPA of the current observation, for the summary line
    gpa: String,
    /// Rank of the current observation, for the summary line
    rank: String,
}

impl ChangeReport {
    /// Report for a round with no stored baseline
    pub fn first_run(current: &Observation) -> Self {
        Self {
            changed: true,
            is_first_run: true,
            entries: Vec::new(),
            gpa: current.gpa().to_string(),
            rank: current.rank().to_string(),
        }
    }

    fn from_entries(current: &Observation, entries: Vec<ChangeEntry>) -> Self {
        Self {
            changed: !entries.is_empty(),
            is_first_run: false,
            entries,
            gpa: current.gpa().to_string(),
            rank: current.rank().to_string(),
        }
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn is_first_run(&self) -> bool {
        self.is_first_run
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn gpa(&self) -> &str {
        &self.gpa
    }

    pub fn rank(&self) -> &str {
        &self.rank
    }

    /// Number of entries of the given kind
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

/// Compares the current observation with the previous snapshot
///
/// `None` for `previous` means no baseline exists: the report is flagged as
/// a first run with no entries.
pub fn compare(current: &Observation, previous: Option<&Observation>) -> ChangeReport {
    let Some(previous) = previous else {
        return ChangeReport::first_run(current);
    };

    let mut entries = Vec::new();

    if current.gpa() != previous.gpa() {
        entries.push(ChangeEntry::gpa_changed(previous.gpa(), current.gpa()));
    }
    if current.rank() != previous.rank() {
        entries.push(ChangeEntry::rank_changed(previous.rank(), current.rank()));
    }

    for (course, grade) in current.grades() {
        match previous.grade(course) {
            None => entries.push(ChangeEntry::course_added(course, grade)),
            Some(old) if old != grade => {
                entries.push(ChangeEntry::course_grade_changed(course, old, grade))
            }
            Some(_) => {}
        }
    }

    ChangeReport::from_entries(current, entries)
}
