//! Pipeline error taxonomy.

use cartera_optimizer::OptimizerError;
use cartera_primitives::CleaningReport;
use cartera_returns::ReturnsError;
use cartera_screen::ScreenError;

use crate::Stage;

/// Errors surfaced by the pipeline.
///
/// Recoverable errors leave the context in the state of the last completed
/// stage; the caller can adjust parameters or data and re-run the failed
/// stage. Non-recoverable errors indicate a numerical or data-processing
/// fault that re-running with the same inputs will not fix.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Cleaning removed every row.
    #[error(
        "cleaning removed all {} rows ({} removal reasons recorded)",
        report.initial_rows,
        report.removed.len()
    )]
    DataQuality {
        /// The full cleaning report, for surfacing per-reason counts.
        report: CleaningReport,
    },

    /// A stage was invoked with invalid parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A stage was attempted before its predecessor completed.
    #[error("stage '{attempted}' requires '{required}' to complete first")]
    StageNotReady {
        /// The stage whose output is missing.
        required: Stage,
        /// The stage that was attempted.
        attempted: Stage,
    },

    /// Screening stage error.
    #[error(transparent)]
    Screen(#[from] ScreenError),

    /// Returns analysis error.
    #[error(transparent)]
    Returns(#[from] ReturnsError),

    /// Optimization error.
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}

impl PipelineError {
    /// Whether the caller can recover by correcting inputs or parameters
    /// and re-running the failed stage.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::DataQuality { .. } | Self::Configuration(_) | Self::StageNotReady { .. } => {
                true
            }
            Self::Screen(err) => !matches!(
                err,
                ScreenError::Polars(_) | ScreenError::Math(_)
            ),
            Self::Returns(err) => !matches!(err, ReturnsError::Math(_)),
            Self::Optimizer(err) => !matches!(err, OptimizerError::Math(_)),
        }
    }
}
