//! Observation domain entity
//!
//! An [`Observation`] is the result of one successful acquisition: the
//! overall GPA, the major ranking and every course grade the source rendered.
//! It is also the exact record persisted as the snapshot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder used when the source did not render a GPA or ranking
pub const UNKNOWN: &str = "unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// One scrape of the student's grade sheet
///
/// All values are display strings exactly as rendered by the source. Course
/// names are kept verbatim (no trimming or case folding) and iterate in the
/// order the source produced them.
///
/// Observations are immutable once built; use [`Observation::new`] together
/// with [`with_grade`](Observation::with_grade) to construct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Overall grade point average
    #[serde(default = "unknown")]
    gpa: String,
    /// Ranking within the major
    #[serde(default = "unknown")]
    rank: String,
    /// Course name to grade descriptor, in source order
    #[serde(default)]
    grades: IndexMap<String, String>,
}

impl Observation {
    /// Creates an observation with no course grades
    pub fn new(gpa: impl Into<String>, rank: impl Into<String>) -> Self {
        Self {
            gpa: gpa.into(),
            rank: rank.into(),
            grades: IndexMap::new(),
        }
    }

    /// Creates an observation from already collected parts
    pub fn from_parts(
        gpa: impl Into<String>,
        rank: impl Into<String>,
        grades: IndexMap<String, String>,
    ) -> Self {
        Self {
            gpa: gpa.into(),
            rank: rank.into(),
            grades,
        }
    }

    /// Adds (or replaces) the grade descriptor for a course
    ///
    /// A replaced course keeps its original position.
    pub fn with_grade(mut self, course: impl Into<String>, grade: impl Into<String>) -> Self {
        self.grades.insert(course.into(), grade.into());
        self
    }

    pub fn gpa(&self) -> &str {
        &self.gpa
    }

    pub fn rank(&self) -> &str {
        &self.rank
    }

    pub fn grades(&self) -> &IndexMap<String, String> {
        &self.grades
    }

    /// Returns the grade descriptor for a course, if present
    pub fn grade(&self, course: &str) -> Option<&str> {
        self.grades.get(course).map(String::as_str)
    }

    /// Number of courses with a posted grade
    pub fn course_count(&self) -> usize {
        self.grades.len()
    }

    /// Whether the source rendered a GPA
    pub fn has_gpa(&self) -> bool {
        self.gpa != UNKNOWN
    }
}

impl Default for Observation {
    fn default() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }
}
