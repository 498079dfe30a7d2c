//! Error types shared by the chart builders, renderers and viewer.

use polars::prelude::PolarsError;
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Series '{series}' has {actual} values, expected {expected}")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },
    #[error("Series '{0}' is empty")]
    EmptySeries(String),
    #[error("Series '{series}' has a non-finite value at index {index}")]
    NonFinite { series: String, index: usize },
    #[error("Missing column '{0}'")]
    MissingColumn(String),
    #[error("Column '{column}' has a null value at row {row}")]
    NullValue { column: String, row: usize },
    #[error("Degree {degree} fit needs at least {required} points, got {actual}")]
    InsufficientPoints {
        degree: usize,
        required: usize,
        actual: usize,
    },
    #[error("Least-squares system is singular")]
    SingularFit,
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Failed to open chart window: {0}")]
    Display(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}
