//! Run controller.
//!
//! Owns the temperature and the global best, dispatches one annealing
//! round per temperature step to every worker, and reconciles the results
//! behind a barrier before cooling.

mod config;
mod runner;
mod schedule;

pub use config::RunConfig;
pub use runner::{RunResult, SyncRunner};
pub use schedule::{Phase, TemperatureSchedule};
