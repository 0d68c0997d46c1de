//! Local annealer.
//!
//! One [`WorkerState`] per worker. Each call to [`WorkerState::anneal`] is
//! one round of the Metropolis walk: a fixed number of random swap moves at a
//! fixed temperature, starting either from the worker's own tour or from a
//! tour broadcast by the coordinator.
//!
//! # References
//!
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod acceptance;
mod config;
mod worker;

pub use acceptance::{acceptance_probability, swap_neighbor};
pub use config::AnnealConfig;
pub use worker::{worker_seed, RoundOutcome, WorkerId, WorkerResult, WorkerState};
