//! Worker identity, private state, and the annealing round.

use super::acceptance::{acceptance_probability, swap_neighbor};
use super::config::AnnealConfig;
use crate::error::AnnealError;
use crate::geometry::{path_length, City, Tour};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::fmt;

/// Stable identity of a worker for the whole run (its rank).
///
/// Ordering on `WorkerId` is the tie-break order used by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkerId(pub usize);

impl WorkerId {
    /// Rank of the worker at `(x, y)` in a row-major grid `width` cells wide.
    pub fn from_grid(x: usize, y: usize, width: usize) -> Self {
        Self(y * width + x)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives a worker's rng seed from the run's master seed.
///
/// Multiplying by an odd constant and xoring are both bijections on `u64`,
/// so distinct workers always get distinct seeds for a given master seed.
pub fn worker_seed(master_seed: u64, worker: WorkerId) -> u64 {
    master_seed ^ (worker.0 as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// One worker's output for one round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkerResult {
    pub worker: WorkerId,
    pub tour: Tour,
    pub cost: f64,
}

/// Both ends of one annealing round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundOutcome {
    /// Where the walk ended.
    pub end: WorkerResult,
    /// Cheapest tour evaluated during the round, the starting tour included.
    pub best: WorkerResult,
}

/// State owned by exactly one worker.
///
/// Nothing outside the worker reads or writes it; the coordinator only
/// sees the results returned by [`walk`](Self::walk) or
/// [`anneal`](Self::anneal).
#[derive(Debug, Clone)]
pub struct WorkerState {
    id: WorkerId,
    config: AnnealConfig,
    rng: Pcg64Mcg,
    current: Tour,
    last: Option<RoundOutcome>,
}

impl WorkerState {
    /// Creates a worker whose rng is seeded from `(master_seed, id)` and whose
    /// starting tour is a shuffle drawn from that rng.
    pub fn new(id: WorkerId, city_count: usize, master_seed: u64, config: AnnealConfig) -> Self {
        let mut rng = Pcg64Mcg::seed_from_u64(worker_seed(master_seed, id));
        let current = Tour::shuffled(city_count, &mut rng);
        Self {
            id,
            config,
            rng,
            current,
            last: None,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn current(&self) -> &Tour {
        &self.current
    }

    /// Where the most recent successful round ended, if any.
    pub fn last_result(&self) -> Option<&WorkerResult> {
        self.last.as_ref().map(|outcome| &outcome.end)
    }

    /// Cheapest tour evaluated in the most recent successful round, if any.
    pub fn round_best(&self) -> Option<&WorkerResult> {
        self.last.as_ref().map(|outcome| &outcome.best)
    }

    /// Runs one round of the Metropolis walk and returns where it ended.
    ///
    /// A `seed` tour replaces the worker's current tour before the walk
    /// starts; this is how the coordinator's broadcast reaches the worker.
    /// The returned tour is where the walk ends, which is not necessarily
    /// the cheapest tour visited during the round; use [`walk`](Self::walk)
    /// or [`round_best`](Self::round_best) for that.
    ///
    /// # Errors
    ///
    /// - [`AnnealError::InvalidTemperature`] if `temperature <= 0`.
    /// - [`AnnealError::InvalidTour`] if the seed (or the worker's own tour)
    ///   is not a permutation of `cities`.
    ///
    /// On error the worker's state is left untouched.
    pub fn anneal(
        &mut self,
        seed: Option<&Tour>,
        temperature: f64,
        cities: &[City],
    ) -> Result<WorkerResult, AnnealError> {
        self.walk(seed, temperature, cities).map(|outcome| outcome.end)
    }

    /// Same walk as [`anneal`](Self::anneal), also reporting the cheapest
    /// tour evaluated along the way (accepted or not).
    pub fn walk(
        &mut self,
        seed: Option<&Tour>,
        temperature: f64,
        cities: &[City],
    ) -> Result<RoundOutcome, AnnealError> {
        if !(temperature > 0.0) {
            return Err(AnnealError::InvalidTemperature { temperature });
        }
        match seed {
            Some(tour) => {
                tour.validate(cities.len())?;
                self.current = tour.clone();
            }
            None => self.current.validate(cities.len())?,
        }

        let mut current_cost = path_length(self.current.as_slice(), cities);
        let mut best = self.current.clone();
        let mut best_cost = current_cost;

        for _ in 0..self.config.num_neighbors {
            let candidate = swap_neighbor(&self.current, &mut self.rng);
            let candidate_cost = path_length(candidate.as_slice(), cities);
            if candidate_cost < best_cost {
                best = candidate.clone();
                best_cost = candidate_cost;
            }
            let probability = acceptance_probability(current_cost, candidate_cost, temperature)?;
            if probability > self.rng.random::<f64>() {
                self.current = candidate;
                current_cost = candidate_cost;
            }
        }

        let outcome = RoundOutcome {
            end: WorkerResult {
                worker: self.id,
                tour: self.current.clone(),
                cost: current_cost,
            },
            best: WorkerResult {
                worker: self.id,
                tour: best,
                cost: best_cost,
            },
        };
        self.last = Some(outcome.clone());
        Ok(outcome)
    }
}
