//! Status command - Display the stored grade snapshot
//!
//! Provides the `gradewatch status` CLI command which shows the GPA, the
//! ranking and every course grade from the last successful check.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use gradewatch_core::{
    domain::{split_grade, Observation, SnapshotError},
    ports::ISnapshotStore,
};
use gradewatch_store::JsonSnapshotStore;
use tracing::info;

use super::load_config;
use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Status command
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Only show courses whose name contains this text
    #[arg(long)]
    pub course: Option<String>,
}

impl StatusCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format.is_json());
        let config = load_config(config_path)?;
        let store = JsonSnapshotStore::new(&config.storage.snapshot_path);

        info!(snapshot = %store.path().display(), "Showing stored snapshot");

        let snapshot = match store.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                if format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "snapshot_path": store.path().display().to_string(),
                        "snapshot": null,
                    }));
                } else {
                    formatter.info("No grades recorded yet. Run 'gradewatch check' first.");
                }
                return Ok(());
            }
            Err(e @ SnapshotError::Corrupt { .. }) => {
                formatter.error(&e.to_string());
                formatter.info("The next successful check will replace it.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let courses = self.filter(&snapshot);

        if format.is_json() {
            let grades: serde_json::Map<String, serde_json::Value> = courses
                .iter()
                .map(|(course, grade)| (course.to_string(), serde_json::json!(grade)))
                .collect();
            formatter.print_json(&serde_json::json!({
                "snapshot_path": store.path().display().to_string(),
                "gpa": snapshot.gpa(),
                "rank": snapshot.rank(),
                "course_count": snapshot.course_count(),
                "grades": grades,
            }));
        } else {
            render_snapshot(&snapshot, &courses, &*formatter);
        }

        Ok(())
    }

    fn filter<'a>(&self, snapshot: &'a Observation) -> Vec<(&'a str, &'a str)> {
        let needle = self.course.as_deref().map(str::to_lowercase);
        snapshot
            .grades()
            .iter()
            .filter(|(course, _)| match &needle {
                Some(n) => course.to_lowercase().contains(n),
                None => true,
            })
            .map(|(course, grade)| (course.as_str(), grade.as_str()))
            .collect()
    }
}

fn render_snapshot(snapshot: &Observation, courses: &[(&str, &str)], formatter: &dyn OutputFormatter) {
    formatter.success(&format!(
        "GPA: {} | Rank: {}",
        snapshot.gpa(),
        snapshot.rank()
    ));
    formatter.info("");

    if courses.is_empty() {
        formatter.info("No matching courses.");
        return;
    }

    formatter.row("Course", "Grade (points)");
    for (course, descriptor) in courses {
        let (grade, points) = split_grade(descriptor);
        let value = match points {
            Some(points) => format!("{grade} ({points})"),
            None => grade.to_string(),
        };
        formatter.row(course, &value);
    }
    formatter.info("");
    formatter.info(&format!("{} course(s)", courses.len()));
}
