//! Forcing and calendar errors.

use thiserror::Error;

/// Result type for climate operations.
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Errors that can occur while reading forcing or calendar tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClimateError {
    /// Hour index beyond the end of the forcing table.
    #[error("Hour {hour} out of range (forcing has {len} hours)")]
    HourOutOfRange { hour: usize, len: usize },

    /// Grid cell outside the forcing grid.
    #[error("Grid cell ({row}, {col}) outside {rows}x{cols} forcing grid")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Time period beyond the calendar table.
    #[error("Time period {period} out of range (table has {len} periods)")]
    PeriodOutOfRange { period: usize, len: usize },

    /// Forcing records do not fit the declared grid shape.
    #[error("Forcing shape mismatch: {what}")]
    ShapeMismatch { what: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ClimateError::HourOutOfRange { hour: 30, len: 24 };
        assert!(err.to_string().contains("30"));

        let err = ClimateError::ShapeMismatch {
            what: "25 records for 2 cells".into(),
        };
        assert!(err.to_string().contains("2 cells"));
    }
}
