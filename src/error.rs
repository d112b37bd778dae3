//! Error types surfaced by the chart facade.
//!
//! Coercion never fails. Unreadable numbers become `NaN` and unreadable dates
//! become an invalid [`Timestamp`](crate::coerce::Timestamp).

use thiserror::Error;

/// Failure raised while normalizing data, merging options, or drawing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// No charting backend was provided or detected.
    #[error("Please install Google Charts or Highcharts")]
    LibraryNotInstalled,
    /// The target element id does not exist in the document.
    #[error("element not found: {0}")]
    ElementNotFound(String),
    /// The backend refused the normalized data or merged options.
    #[error("{0}")]
    Backend(String),
}

/// Terminal failure of one render attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Network/HTTP failure or a payload that is not JSON.
    #[error("{0}")]
    DataFetch(String),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
