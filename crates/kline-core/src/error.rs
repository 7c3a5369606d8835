// File: crates/kline-core/src/error.rs
// Summary: Library error type covering capture and raster failures.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// The requested capture target date is not resolvable in the series.
    /// Raised before any pane state is touched.
    #[error("capture target {0} not found in data series")]
    CaptureTargetNotFound(NaiveDate),

    /// No registered pane has established scales yet; nothing to capture.
    #[error("no ready pane available")]
    PaneNotReady,

    /// The data series holds no bars.
    #[error("data series is empty")]
    EmptySeries,

    /// Raster surface creation or pixel readback failed.
    #[error("raster rendering failed")]
    Render(#[source] anyhow::Error),
}
