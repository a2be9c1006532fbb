//! Grade descriptor helpers
//!
//! A grade descriptor is the display string stored per course. When the
//! source renders both a letter grade and a grade-point value the two are
//! joined as `"A | 4.0"`; pass/fail style courses whose point column is empty
//! or `--` keep just the letter.
//!
//! These helpers exist for adapters and display only. Change detection
//! compares descriptors as opaque strings.

/// Separator between the letter grade and the grade-point value
pub const GRADE_SEPARATOR: &str = " | ";

/// Marker the source uses for "no grade points"
const NO_POINTS: &str = "--";

/// Builds a descriptor from a letter grade and an optional point value
pub fn compose_grade(grade: &str, points: Option<&str>) -> String {
    let grade = grade.trim();
    match points.map(str::trim) {
        Some(p) if !p.is_empty() && p != NO_POINTS => format!("{grade}{GRADE_SEPARATOR}{p}"),
        _ => grade.to_string(),
    }
}

/// Splits a descriptor into `(grade, points)`
///
/// Descriptors without the separator are returned whole with no points.
pub fn split_grade(descriptor: &str) -> (&str, Option<&str>) {
    match descriptor.split_once(GRADE_SEPARATOR.trim()) {
        Some((grade, points)) => {
            let points = points.trim();
            (grade.trim(), (!points.is_empty()).then_some(points))
        }
        None => (descriptor.trim(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_with_points() {
        assert_eq!(compose_grade("A", Some("4.0")), "A | 4.0");
        assert_eq!(compose_grade(" B+ ", Some(" 3.3 ")), "B+ | 3.3");
    }

    #[test]
    fn test_compose_without_points() {
        assert_eq!(compose_grade("P", None), "P");
        assert_eq!(compose_grade("P", Some("--")), "P");
        assert_eq!(compose_grade("P", Some("")), "P");
    }

    #[test]
    fn test_split() {
        assert_eq!(split_grade("A | 4.0"), ("A", Some("4.0")));
        assert_eq!(split_grade("A|4.0"), ("A", Some("4.0")));
        assert_eq!(split_grade("P"), ("P", None));
        assert_eq!(split_grade("A | "), ("A", None));
    }

    #[test]
    fn test_split_inverts_compose() {
        let d = compose_grade("A-", Some("3.7"));
        assert_eq!(split_grade(&d), ("A-", Some("3.7")));
    }
}
