//! Distributed Simulated Annealing for the Euclidean TSP.
//!
//! A fixed pool of workers each run a Metropolis walk over swap moves,
//! then synchronize on the best tour any of them found:
//!
//! - **Geometry** ([`geometry`]): cities, tours as validated permutations,
//!   open-path tour cost.
//! - **Local annealer** ([`anneal`]): one worker's private tour and rng, and
//!   one round of the annealing walk at a fixed temperature.
//! - **Coordinator** ([`sync`]): deterministic reduction of a round's
//!   results into the global best, and the tour to broadcast.
//! - **Run controller** ([`run`]): geometric cooling, parallel dispatch with
//!   a per-round barrier, convergence and reporting.
//!
//! # Example
//!
//! ```
//! use u_dsa::geometry::City;
//! use u_dsa::run::{RunConfig, SyncRunner};
//!
//! let cities = vec![
//!     City::new(0.0, 0.0),
//!     City::new(0.0, 1.0),
//!     City::new(1.0, 1.0),
//!     City::new(1.0, 0.0),
//! ];
//! let config = RunConfig::default()
//!     .with_workers(2)
//!     .with_initial_temperature(10.0)
//!     .with_cooling_rate(0.5)
//!     .with_num_neighbors(5);
//!
//! let result = SyncRunner::run(&cities, &config).unwrap();
//! assert_eq!(result.rounds, 4);
//! ```
//!
//! # Determinism
//!
//! Every worker's rng is seeded from the run's master seed and the worker's
//! id, and reconciliation breaks ties by lowest worker id, so a run is fully
//! reproducible whether its workers execute in parallel or not.

pub mod anneal;
pub mod error;
pub mod geometry;
pub mod run;
pub mod sync;

pub use error::{AnnealError, RunError, TourError};
