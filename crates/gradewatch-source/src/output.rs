//! Parsing of scraper output into an [`Observation`]
//!
//! Two JSON shapes are accepted. The snapshot shape carries ready-made
//! grade descriptors:
//!
//! ```json
//! { "gpa": "3.52", "rank": "12/180", "grades": { "Calculus": "92 | 4.2" } }
//! ```
//!
//! The row shape carries the raw table cells, which are composed into
//! descriptors here:
//!
//! ```json
//! { "gpa": "3.52", "rank": "12/180",
//!   "courses": [ { "name": "Calculus", "grade": "92", "points": "4.2" } ] }
//! ```
//!
//! Both may appear together; `grades` come first, then `courses`. Missing
//! or blank GPA and rank become [`UNKNOWN`].

use gradewatch_core::domain::{compose_grade, Observation, UNKNOWN};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::SourceError;

#[derive(Debug, Deserialize)]
struct RawObservation {
    #[serde(default)]
    gpa: Option<String>,
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    grades: IndexMap<String, String>,
    #[serde(default)]
    courses: Vec<CourseRow>,
}

#[derive(Debug, Deserialize)]
struct CourseRow {
    name: String,
    grade: String,
    #[serde(default)]
    points: Option<String>,
}

fn or_unknown(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Parses scraper output into an observation
///
/// Scrapers that print progress before their result are tolerated: when the
/// whole text is not valid JSON, the last non-blank line is tried.
pub fn parse_observation(text: &str) -> Result<Observation, SourceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SourceError::InvalidOutput("no output".to_string()));
    }

    let raw: RawObservation = match serde_json::from_str(trimmed) {
        Ok(raw) => raw,
        Err(first_err) => {
            let last_line = trimmed.lines().rev().find(|l| !l.trim().is_empty());
            match last_line.map(|l| serde_json::from_str(l.trim())) {
                Some(Ok(raw)) => raw,
                _ => return Err(SourceError::InvalidOutput(first_err.to_string())),
            }
        }
    };

    let mut grades = raw.grades;
    for row in raw.courses {
        let name = row.name.trim();
        let grade = row.grade.trim();
        // Header and spacer rows carry no course or no grade
        if name.is_empty() || grade.is_empty() {
            continue;
        }
        grades.insert(name.to_string(), compose_grade(grade, row.points.as_deref()));
    }

    Ok(Observation::from_parts(
        or_unknown(raw.gpa),
        or_unknown(raw.rank),
        grades,
    ))
}
