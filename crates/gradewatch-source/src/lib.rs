//! GradeWatch Source - Grade acquisition adapters
//!
//! Implementations of the core's `IGradeSource` port:
//!
//! - [`CommandGradeSource`] - runs an external scraper and reads its JSON output
//! - [`FileGradeSource`] - reads an observation from a JSON file
//!
//! Portal login and page parsing live entirely in the scraper; this crate
//! only launches it and validates what comes back.

pub mod command;
pub mod error;
pub mod file;
pub mod output;

use std::sync::Arc;

use gradewatch_core::{
    config::{SourceConfig, SourceKind},
    ports::IGradeSource,
};

pub use command::CommandGradeSource;
pub use error::SourceError;
pub use file::FileGradeSource;
pub use output::parse_observation;

/// Builds the grade source selected by the `source` configuration section
pub fn from_config(config: &SourceConfig) -> Result<Arc<dyn IGradeSource>, SourceError> {
    match config.kind {
        SourceKind::Command => {
            let program = config
                .command
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| {
                    SourceError::NotConfigured("source.command is not set".to_string())
                })?;
            Ok(Arc::new(
                CommandGradeSource::new(program)
                    .with_args(config.args.clone())
                    .with_headless(config.headless),
            ))
        }
        SourceKind::File => {
            let path = config.file.clone().ok_or_else(|| {
                SourceError::NotConfigured("source.file is not set".to_string())
            })?;
            Ok(Arc::new(FileGradeSource::new(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_from_config_command() {
        let config = SourceConfig {
            command: Some("fetch-grades".to_string()),
            ..Default::default()
        };
        let source = from_config(&config).unwrap();
        assert_eq!(source.name(), "command");
    }

    #[test]
    fn test_from_config_file() {
        let config = SourceConfig {
            kind: SourceKind::File,
            file: Some(PathBuf::from("/tmp/observation.json")),
            ..Default::default()
        };
        let source = from_config(&config).unwrap();
        assert_eq!(source.name(), "file");
    }

    #[test]
    fn test_from_config_requires_target() {
        let err = from_config(&SourceConfig::default()).err().unwrap();
        assert!(matches!(err, SourceError::NotConfigured(_)));

        let config = SourceConfig {
            kind: SourceKind::File,
            ..Default::default()
        };
        assert!(from_config(&config).is_err());
    }
}
