//! Fitness evaluation outcomes
//!
//! A particle evaluation either produces a score or fails. Failures never
//! abort a search: the swarm loop scores them with the strategy's failure
//! score (0.0 unless the strategy says otherwise) and keeps going.

use core::fmt;

/// Score assigned to a failed evaluation when the strategy has no override.
pub const FAILURE_SCORE: f64 = 0.0;

/// Result of evaluating one particle
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The callback produced a finite score
    Scored(f64),
    /// The particle could not be scored
    Failed(FailureReason),
}

/// Why a particle evaluation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Training labels contain fewer than two classes
    SingleClass,
    /// The held-out portion has no rows
    EmptyTestSet,
    /// No feature columns were selected
    EmptySelection,
    /// A selected column index is past the matrix width
    ColumnOutOfRange { column: usize, cols: usize },
    /// The callback returned NaN or an infinity
    NonFinite,
    /// The callback returned an error
    Callback(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::SingleClass => write!(f, "training labels contain a single class"),
            FailureReason::EmptyTestSet => write!(f, "held-out split is empty"),
            FailureReason::EmptySelection => write!(f, "no features selected"),
            FailureReason::ColumnOutOfRange { column, cols } => {
                write!(f, "column {column} out of range for {cols} features")
            }
            FailureReason::NonFinite => write!(f, "score is not finite"),
            FailureReason::Callback(msg) => write!(f, "callback failed: {msg}"),
        }
    }
}

impl Evaluation {
    /// Wrap a callback result; errors and non-finite scores become failures.
    pub fn from_result<E: fmt::Display>(result: Result<f64, E>) -> Self {
        match result {
            Ok(score) if score.is_finite() => Evaluation::Scored(score),
            Ok(_) => Evaluation::Failed(FailureReason::NonFinite),
            Err(err) => Evaluation::Failed(FailureReason::Callback(err.to_string())),
        }
    }

    /// Score with failures mapped to `failure_score`
    pub fn score_or(&self, failure_score: f64) -> f64 {
        match self {
            Evaluation::Scored(score) => *score,
            Evaluation::Failed(_) => failure_score,
        }
    }

    /// Score with failures mapped to [`FAILURE_SCORE`]
    pub fn score(&self) -> f64 {
        self.score_or(FAILURE_SCORE)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Evaluation::Failed(_))
    }
}
