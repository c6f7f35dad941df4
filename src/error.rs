//! Error types shared by the extraction and estimation pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolarYieldError {
    #[error("unexpected input for year: '{0}'")]
    InvalidYear(i32),

    #[error("unexpected year input range start for year: '{0}'")]
    InvalidYearRangeStart(i32),

    #[error("unexpected year input range end for year: '{0}'")]
    InvalidYearRangeEnd(i32),

    #[error("Invalid DMS format: {0:?}")]
    InvalidDms(String),

    #[error("Month number must be between 1 and 12, got {0}")]
    InvalidMonth(i64),

    #[error("Expected gridded files ending with .{extension} got this instead: {files:?}")]
    UnexpectedExtension {
        extension: String,
        files: Vec<PathBuf>,
    },

    #[error("failed to read dataset {path:?}: {message}")]
    Dataset { path: PathBuf, message: String },

    #[error("malformed declination entry at row {row}, column {column}: {source}")]
    DeclinationTable {
        row: usize,
        column: String,
        #[source]
        source: Box<SolarYieldError>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl SolarYieldError {
    /// True for errors caused by the caller's input rather than by the
    /// dataset or the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SolarYieldError::InvalidYear(_)
                | SolarYieldError::InvalidYearRangeStart(_)
                | SolarYieldError::InvalidYearRangeEnd(_)
                | SolarYieldError::InvalidDms(_)
                | SolarYieldError::InvalidMonth(_)
                | SolarYieldError::UnexpectedExtension { .. }
        )
    }

    pub(crate) fn dataset(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        SolarYieldError::Dataset {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SolarYieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_message_names_the_year() {
        let message = format!("{}", SolarYieldError::InvalidYear(1850));
        assert_eq!(message, "unexpected input for year: '1850'");
    }

    #[test]
    fn validation_vs_internal() {
        assert!(SolarYieldError::InvalidDms("x".into()).is_validation());
        assert!(SolarYieldError::InvalidMonth(13).is_validation());
        assert!(!SolarYieldError::dataset("a.nc", "variable SDL not found").is_validation());
        assert!(!SolarYieldError::Io(std::io::Error::other("boom")).is_validation());
    }
}
