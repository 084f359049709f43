//! Telemetry hooks (optional).
//!
//! With the `telemetry` feature these forward to `tracing`; without it they
//! compile to nothing, so search code can call them unconditionally.

use crate::fitness::FailureReason;

#[cfg(feature = "telemetry")]
pub(crate) fn search_started(mode: &'static str, particles: usize, iterations: usize, dimension: usize) {
    tracing::debug!(mode, particles, iterations, dimension, "swarm search started");
}

#[cfg(not(feature = "telemetry"))]
pub(crate) fn search_started(_mode: &'static str, _particles: usize, _iterations: usize, _dimension: usize) {}

#[cfg(feature = "telemetry")]
pub(crate) fn iteration_completed(mode: &'static str, iteration: usize, best_score: f64) {
    tracing::debug!(mode, iteration, best_score, "swarm iteration completed");
}

#[cfg(not(feature = "telemetry"))]
pub(crate) fn iteration_completed(_mode: &'static str, _iteration: usize, _best_score: f64) {}

#[cfg(feature = "telemetry")]
pub(crate) fn evaluation_failed(mode: &'static str, reason: &FailureReason) {
    tracing::debug!(mode, %reason, "particle evaluation failed");
}

#[cfg(not(feature = "telemetry"))]
pub(crate) fn evaluation_failed(_mode: &'static str, _reason: &FailureReason) {}

#[cfg(feature = "telemetry")]
pub(crate) fn search_completed(mode: &'static str, best_score: f64, failed_evaluations: usize) {
    tracing::info!(mode, best_score, failed_evaluations, "swarm search completed");
}

#[cfg(not(feature = "telemetry"))]
pub(crate) fn search_completed(_mode: &'static str, _best_score: f64, _failed_evaluations: usize) {}
