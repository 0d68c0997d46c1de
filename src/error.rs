//! Error taxonomy.
//!
//! Every error here is fatal for a run: the controller returns it as soon
//! as it is detected, tagged with the round and worker that raised it.

use crate::anneal::WorkerId;
use thiserror::Error;

/// A sequence of city indices that is not a permutation of the city list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TourError {
    #[error("city list is empty")]
    NoCities,

    #[error("tour has {actual} entries, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("city index {index} out of range for {city_count} cities")]
    OutOfRange { index: usize, city_count: usize },

    #[error("city index {index} appears more than once")]
    Duplicate { index: usize },
}

/// Errors raised by the annealer, the coordinator, or config validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnealError {
    #[error("invalid tour: {0}")]
    InvalidTour(#[from] TourError),

    #[error("temperature must be strictly positive, got {temperature}")]
    InvalidTemperature { temperature: f64 },

    #[error("no worker results to reconcile")]
    EmptyRound,

    #[error("city {index} has a non-finite coordinate")]
    NonFiniteCity { index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// An [`AnnealError`] annotated with where in the run it happened.
///
/// `round` is 1-based; errors raised during setup report round 0.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("run aborted at round {round}{}: {kind}", worker_suffix(.worker))]
pub struct RunError {
    pub round: usize,
    pub worker: Option<WorkerId>,
    #[source]
    pub kind: AnnealError,
}

impl RunError {
    pub(crate) fn setup(kind: AnnealError) -> Self {
        Self {
            round: 0,
            worker: None,
            kind,
        }
    }

    pub(crate) fn in_round(round: usize, kind: AnnealError) -> Self {
        Self {
            round,
            worker: None,
            kind,
        }
    }

    pub(crate) fn in_worker(round: usize, worker: WorkerId, kind: AnnealError) -> Self {
        Self {
            round,
            worker: Some(worker),
            kind,
        }
    }
}

fn worker_suffix(worker: &Option<WorkerId>) -> String {
    match worker {
        Some(id) => format!(" (worker {id})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_error_names_round_and_worker() {
        let err = RunError::in_worker(
            7,
            WorkerId(3),
            AnnealError::InvalidTemperature { temperature: 0.0 },
        );
        let msg = err.to_string();
        assert!(msg.contains("round 7"), "{msg}");
        assert!(msg.contains("worker 3"), "{msg}");
        assert!(msg.contains("strictly positive"), "{msg}");
    }

    #[test]
    fn test_run_error_without_worker() {
        let err = RunError::in_round(2, AnnealError::EmptyRound);
        assert_eq!(
            err.to_string(),
            "run aborted at round 2: no worker results to reconcile"
        );
    }

    #[test]
    fn test_tour_error_converts() {
        let err: AnnealError = TourError::Duplicate { index: 4 }.into();
        assert_eq!(err.to_string(), "invalid tour: city index 4 appears more than once");
    }
}
