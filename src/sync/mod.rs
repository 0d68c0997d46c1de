//! Synchronization coordinator.
//!
//! After every round the coordinator reduces all worker results to one
//! authoritative global best and names the tour every worker restarts
//! from. The reduction is pure and deterministic.

mod coordinator;

pub use coordinator::{reconcile, BestSolution, GlobalBest, Reconciliation};
