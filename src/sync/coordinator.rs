//! Reduce-then-broadcast over one round of worker results.

use crate::anneal::{WorkerId, WorkerResult};
use crate::error::AnnealError;
use crate::geometry::Tour;
use std::cmp::Ordering;

/// A tour, its cost, and the worker that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestSolution {
    pub tour: Tour,
    pub cost: f64,
    pub owner: WorkerId,
}

impl From<WorkerResult> for BestSolution {
    fn from(result: WorkerResult) -> Self {
        Self {
            tour: result.tour,
            cost: result.cost,
            owner: result.worker,
        }
    }
}

/// Best solution found by any worker so far.
///
/// Starts empty (cost `+inf`). Only [`reconcile`] replaces it, and only with
/// a strictly cheaper solution, so its cost never increases over a run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalBest(Option<BestSolution>);

impl GlobalBest {
    pub fn empty() -> Self {
        Self(None)
    }

    /// Cost of the best solution, `f64::INFINITY` if there is none yet.
    pub fn cost(&self) -> f64 {
        self.0.as_ref().map_or(f64::INFINITY, |best| best.cost)
    }

    pub fn tour(&self) -> Option<&Tour> {
        self.0.as_ref().map(|best| &best.tour)
    }

    pub fn owner(&self) -> Option<WorkerId> {
        self.0.as_ref().map(|best| best.owner)
    }

    pub fn solution(&self) -> Option<&BestSolution> {
        self.0.as_ref()
    }

    pub fn into_solution(self) -> Option<BestSolution> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Outcome of one reconcile step.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Global best after this round.
    pub global_best: BestSolution,
    /// Tour every worker starts the next round from. Always the global
    /// best's tour, whether or not this round improved it.
    pub broadcast: Tour,
    /// Whether this round strictly improved the global best.
    pub improved: bool,
}

impl Reconciliation {
    pub fn into_global_best(self) -> GlobalBest {
        GlobalBest(Some(self.global_best))
    }
}

/// Folds one round of worker results into the global best.
///
/// The round winner is the result with the lowest cost; equal costs go to
/// the lowest [`WorkerId`], whatever order the results arrive in. The winner
/// replaces `current` only if it is strictly cheaper.
///
/// # Errors
///
/// [`AnnealError::EmptyRound`] if `results` is empty.
///
/// # Examples
///
/// ```
/// use u_dsa::anneal::{WorkerId, WorkerResult};
/// use u_dsa::geometry::Tour;
/// use u_dsa::sync::{reconcile, GlobalBest};
///
/// let results = vec![
///     WorkerResult { worker: WorkerId(2), tour: Tour::identity(3), cost: 5.0 },
///     WorkerResult { worker: WorkerId(0), tour: Tour::new(vec![2, 1, 0], 3).unwrap(), cost: 5.0 },
/// ];
/// let outcome = reconcile(&results, &GlobalBest::empty()).unwrap();
/// assert_eq!(outcome.global_best.owner, WorkerId(0));
/// assert_eq!(outcome.broadcast.as_slice(), &[2, 1, 0]);
/// ```
pub fn reconcile(
    results: &[WorkerResult],
    current: &GlobalBest,
) -> Result<Reconciliation, AnnealError> {
    let winner = results
        .iter()
        .min_by(|a, b| rank(a, b))
        .ok_or(AnnealError::EmptyRound)?;

    let improved = winner.cost < current.cost();
    let global_best = match current.solution() {
        Some(best) if !improved => best.clone(),
        _ => BestSolution::from(winner.clone()),
    };

    Ok(Reconciliation {
        broadcast: global_best.tour.clone(),
        global_best,
        improved,
    })
}

/// Orders results by cost, then by worker id. NaN costs of either sign
/// sort after every real cost.
fn rank(a: &WorkerResult, b: &WorkerResult) -> Ordering {
    a.cost
        .is_nan()
        .cmp(&b.cost.is_nan())
        .then_with(|| a.cost.total_cmp(&b.cost))
        .then_with(|| a.worker.cmp(&b.worker))
}
