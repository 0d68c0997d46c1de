//! Synchronized annealing loop.

use super::config::RunConfig;
use super::schedule::{Phase, TemperatureSchedule};
use crate::anneal::{RoundOutcome, WorkerId, WorkerResult, WorkerState};
use crate::error::{AnnealError, RunError, TourError};
use crate::geometry::{City, Tour};
use crate::sync::{reconcile, GlobalBest};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Temperature progress is logged each time it falls below this fraction
/// of the last logged value.
const TEMPERATURE_LOG_RATIO: f64 = 0.8;

/// Result of a synchronized annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// The best tour found by any worker.
    pub tour: Tour,

    /// Open-path cost of `tour`.
    pub cost: f64,

    /// Worker that found `tour`. `None` when no round had to run.
    pub owner: Option<WorkerId>,

    /// Number of completed rounds.
    pub rounds: usize,

    /// Temperature when the run converged.
    pub final_temperature: f64,

    /// Number of rounds that strictly improved the global best.
    pub improvements: usize,

    /// Wall-clock time of the run.
    pub elapsed: Duration,

    /// Global best cost after each round. Non-increasing.
    pub cost_history: Vec<f64>,
}

/// Drives workers through synchronized annealing rounds.
///
/// Each round every worker anneals from the same broadcast tour at the
/// same temperature. The round ends only when all of them have returned;
/// their results are then reconciled into the global best, whose tour
/// becomes the next round's broadcast.
///
/// # Usage
///
/// ```
/// use u_dsa::geometry::City;
/// use u_dsa::run::{RunConfig, SyncRunner};
///
/// let cities: Vec<City> = (0..12)
///     .map(|k| City::new((k % 4) as f64, (k / 4) as f64))
///     .collect();
/// let config = RunConfig::default()
///     .with_workers(3)
///     .with_initial_temperature(50.0)
///     .with_cooling_rate(0.05)
///     .with_master_seed(42);
///
/// let result = SyncRunner::run(&cities, &config).unwrap();
/// assert_eq!(result.tour.len(), 12);
/// ```
pub struct SyncRunner;

impl SyncRunner {
    /// Runs until the temperature reaches `config.min_temperature`.
    ///
    /// # Errors
    ///
    /// Any error aborts the run and is returned with the round (and worker,
    /// when one is responsible) that raised it:
    ///
    /// - [`AnnealError::InvalidConfig`] if `config` does not validate.
    /// - [`AnnealError::InvalidTour`] if `cities` is empty or a tour is
    ///   corrupted in flight.
    /// - [`AnnealError::NonFiniteCity`] if a coordinate is NaN or infinite.
    /// - [`AnnealError::EmptyRound`] if a round produced no results.
    pub fn run(cities: &[City], config: &RunConfig) -> Result<RunResult, RunError> {
        let start = Instant::now();

        config
            .validate()
            .map_err(|msg| RunError::setup(AnnealError::InvalidConfig(msg)))?;
        if cities.is_empty() {
            return Err(RunError::setup(TourError::NoCities.into()));
        }
        if let Some(index) = cities.iter().position(|city| !city.is_finite()) {
            return Err(RunError::setup(AnnealError::NonFiniteCity { index }));
        }

        let mut schedule = TemperatureSchedule::new(
            config.initial_temperature,
            config.min_temperature,
            config.cooling_rate,
        );

        // A single city has exactly one tour and no move to try.
        if cities.len() == 1 {
            log::info!("single city, nothing to anneal");
            return Ok(RunResult {
                tour: Tour::identity(1),
                cost: 0.0,
                owner: None,
                rounds: 0,
                final_temperature: schedule.temperature(),
                improvements: 0,
                elapsed: start.elapsed(),
                cost_history: Vec::new(),
            });
        }

        let anneal_config = config.anneal_config();
        let mut workers: Vec<WorkerState> = (0..config.workers)
            .map(|i| WorkerState::new(WorkerId(i), cities.len(), config.master_seed, anneal_config))
            .collect();

        log::info!(
            "annealing {} cities on {} workers from T={}",
            cities.len(),
            workers.len(),
            config.initial_temperature
        );

        let mut global = GlobalBest::empty();
        let mut rounds = 0usize;
        let mut improvements = 0usize;
        let mut cost_history = Vec::new();
        let mut logged_temperature = schedule.temperature();

        while schedule.phase() == Phase::Running {
            rounds += 1;
            let temperature = schedule.temperature();

            let outcomes = anneal_round(
                &mut workers,
                global.tour(),
                temperature,
                cities,
                config.parallel,
            )
            .map_err(|(worker, kind)| RunError::in_worker(rounds, worker, kind))?;

            for outcome in &outcomes {
                log::debug!(
                    "round {rounds}: worker {} ended at cost {:.4}, best seen {:.4}",
                    outcome.end.worker,
                    outcome.end.cost,
                    outcome.best.cost
                );
            }

            // Each worker contributes the cheapest tour it evaluated this round.
            let results: Vec<WorkerResult> =
                outcomes.into_iter().map(|outcome| outcome.best).collect();

            let outcome =
                reconcile(&results, &global).map_err(|kind| RunError::in_round(rounds, kind))?;
            if outcome.improved {
                improvements += 1;
                log::info!(
                    "round {rounds}: new best cost {:.4} from worker {} (T={temperature:.4})",
                    outcome.global_best.cost,
                    outcome.global_best.owner
                );
            }
            global = outcome.into_global_best();
            cost_history.push(global.cost());

            schedule.cool();
            if schedule.temperature() < logged_temperature * TEMPERATURE_LOG_RATIO {
                logged_temperature = schedule.temperature();
                log::debug!("temperature {logged_temperature:.4} after round {rounds}");
            }
        }

        let best = global
            .into_solution()
            .ok_or_else(|| RunError::in_round(rounds, AnnealError::EmptyRound))?;
        let elapsed = start.elapsed();

        log::info!(
            "converged after {rounds} rounds: cost {:.4}, {} ms",
            best.cost,
            elapsed.as_millis()
        );

        Ok(RunResult {
            tour: best.tour,
            cost: best.cost,
            owner: Some(best.owner),
            rounds,
            final_temperature: schedule.temperature(),
            improvements,
            elapsed,
            cost_history,
        })
    }
}

/// Runs one annealing round on every worker and waits for all of them.
///
/// Outcomes come back in worker order regardless of `parallel`.
fn anneal_round(
    workers: &mut [WorkerState],
    seed: Option<&Tour>,
    temperature: f64,
    cities: &[City],
    parallel: bool,
) -> Result<Vec<RoundOutcome>, (WorkerId, AnnealError)> {
    let step = |worker: &mut WorkerState| {
        worker
            .walk(seed, temperature, cities)
            .map_err(|e| (worker.id(), e))
    };

    if parallel {
        workers.par_iter_mut().map(step).collect()
    } else {
        workers.iter_mut().map(step).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anneal::AnnealConfig;
    use crate::geometry::tour_cost;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn unit_square() -> Vec<City> {
        vec![
            City::new(0.0, 0.0),
            City::new(0.0, 1.0),
            City::new(1.0, 1.0),
            City::new(1.0, 0.0),
        ]
    }

    /// Points on a circle: the optimal open path walks around the rim.
    fn ring(n: usize) -> Vec<City> {
        (0..n)
            .map(|k| {
                let a = k as f64 / n as f64 * std::f64::consts::TAU;
                City::new(100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect()
    }

    fn quick_config() -> RunConfig {
        RunConfig::default()
            .with_workers(4)
            .with_initial_temperature(100.0)
            .with_cooling_rate(0.05)
            .with_num_neighbors(50)
            .with_master_seed(42)
    }

    #[test]
    fn test_square_terminates_at_or_below_identity_cost() {
        init_logger();
        let cities = unit_square();
        let identity_cost = tour_cost(&[0, 1, 2, 3], &cities).unwrap();

        for seed in 0..128 {
            let config = RunConfig::default()
                .with_workers(2)
                .with_initial_temperature(10.0)
                .with_cooling_rate(0.5)
                .with_num_neighbors(5)
                .with_master_seed(seed);

            let result = SyncRunner::run(&cities, &config).unwrap();

            assert_eq!(result.rounds, 4);
            assert!(result.final_temperature <= 1.0);
            assert!(result.tour.validate(4).is_ok());
            assert!(
                result.cost <= identity_cost + 1e-9,
                "seed {seed}: expected cost <= {identity_cost}, got {}",
                result.cost
            );
        }
    }

    #[test]
    fn test_global_best_covers_every_round_best() {
        let cities = ring(12);
        let config = quick_config().with_workers(3);
        let result = SyncRunner::run(&cities, &config).unwrap();

        // Replay the same rounds by hand: the reported best must be no worse
        // than any tour a worker evaluated.
        let mut workers: Vec<WorkerState> = (0..3)
            .map(|i| WorkerState::new(WorkerId(i), 12, 42, config.anneal_config()))
            .collect();
        let mut schedule = TemperatureSchedule::new(
            config.initial_temperature,
            config.min_temperature,
            config.cooling_rate,
        );
        let mut global = GlobalBest::empty();
        while schedule.phase() == Phase::Running {
            let outcomes =
                anneal_round(&mut workers, global.tour(), schedule.temperature(), &cities, false)
                    .unwrap();
            for outcome in &outcomes {
                assert!(result.cost <= outcome.best.cost);
                assert!(outcome.best.cost <= outcome.end.cost);
            }
            let bests: Vec<WorkerResult> = outcomes.into_iter().map(|o| o.best).collect();
            global = reconcile(&bests, &global).unwrap().into_global_best();
            schedule.cool();
        }
        assert_eq!(global.tour(), Some(&result.tour));
    }

    #[test]
    fn test_single_city_converges_without_rounds() {
        let cities = [City::new(3.0, 4.0)];
        let result = SyncRunner::run(&cities, &RunConfig::default()).unwrap();
        assert_eq!(result.rounds, 0);
        assert_eq!(result.cost, 0.0);
        assert_eq!(result.tour.as_slice(), &[0]);
        assert!(result.owner.is_none());
    }

    #[test]
    fn test_result_cost_matches_tour() {
        let cities = ring(20);
        let result = SyncRunner::run(&cities, &quick_config()).unwrap();
        let recomputed = tour_cost(result.tour.as_slice(), &cities).unwrap();
        assert!((result.cost - recomputed).abs() < 1e-9);
        assert_eq!(result.cost_history.len(), result.rounds);
        assert_eq!(result.cost_history.last().copied(), Some(result.cost));
    }

    #[test]
    fn test_global_best_never_regresses() {
        let cities = ring(25);
        let result = SyncRunner::run(&cities, &quick_config()).unwrap();
        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "global best regressed: {} > {}",
                window[1],
                window[0]
            );
        }
        assert!(result.improvements >= 1);
    }

    #[test]
    fn test_improves_on_random_start() {
        let cities = ring(20);
        let config = quick_config().with_num_neighbors(200);
        let random_start = WorkerState::new(WorkerId(0), 20, 42, AnnealConfig::default());
        let start_cost = tour_cost(random_start.current().as_slice(), &cities).unwrap();

        let result = SyncRunner::run(&cities, &config).unwrap();

        assert!(
            result.cost < start_cost,
            "expected improvement over {start_cost}, got {}",
            result.cost
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let cities = ring(30);
        let parallel = SyncRunner::run(&cities, &quick_config().with_parallel(true)).unwrap();
        let sequential = SyncRunner::run(&cities, &quick_config().with_parallel(false)).unwrap();
        assert_eq!(parallel.tour, sequential.tour);
        assert_eq!(parallel.cost, sequential.cost);
        assert_eq!(parallel.owner, sequential.owner);
        assert_eq!(parallel.cost_history, sequential.cost_history);
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let cities = ring(15);
        let a = SyncRunner::run(&cities, &quick_config()).unwrap();
        let b = SyncRunner::run(&cities, &quick_config()).unwrap();
        assert_eq!(a.tour, b.tour);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_zero_workers_aborts_first_round() {
        let err = SyncRunner::run(&ring(5), &quick_config().with_workers(0)).unwrap_err();
        assert_eq!(err.round, 1);
        assert_eq!(err.worker, None);
        assert_eq!(err.kind, AnnealError::EmptyRound);
    }

    #[test]
    fn test_empty_city_list_rejected() {
        let err = SyncRunner::run(&[], &quick_config()).unwrap_err();
        assert_eq!(err.round, 0);
        assert_eq!(err.kind, AnnealError::InvalidTour(TourError::NoCities));
    }

    #[test]
    fn test_non_finite_city_rejected() {
        let mut cities = ring(6);
        cities[2] = City::new(f64::INFINITY, 0.0);
        cities[4] = City::new(f64::NEG_INFINITY, 0.0);
        let err = SyncRunner::run(&cities, &quick_config()).unwrap_err();
        assert_eq!(err.round, 0);
        assert_eq!(err.kind, AnnealError::NonFiniteCity { index: 2 });

        cities[2] = City::new(0.0, f64::NAN);
        cities[4] = City::new(1.0, 1.0);
        let err = SyncRunner::run(&cities, &quick_config()).unwrap_err();
        assert_eq!(err.kind, AnnealError::NonFiniteCity { index: 2 });
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = quick_config().with_cooling_rate(1.0);
        let err = SyncRunner::run(&ring(5), &config).unwrap_err();
        assert!(matches!(err.kind, AnnealError::InvalidConfig(_)));
    }

    #[test]
    fn test_round_reports_failing_worker() {
        let cities = ring(6);
        let mut workers: Vec<WorkerState> = (0..3)
            .map(|i| WorkerState::new(WorkerId(i), 6, 0, AnnealConfig::default()))
            .collect();
        let err = anneal_round(&mut workers, None, -1.0, &cities, false).unwrap_err();
        assert_eq!(err.0, WorkerId(0));
        assert!(matches!(err.1, AnnealError::InvalidTemperature { .. }));
    }

    #[test]
    fn test_round_returns_results_in_worker_order() {
        let cities = ring(10);
        let mut workers: Vec<WorkerState> = (0..6)
            .map(|i| WorkerState::new(WorkerId(i), 10, 3, AnnealConfig::default()))
            .collect();
        let results = anneal_round(&mut workers, None, 5.0, &cities, true).unwrap();
        let ids: Vec<usize> = results.iter().map(|r| r.end.worker.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_broadcast_synchronizes_workers() {
        let cities = ring(10);
        let mut workers: Vec<WorkerState> = (0..3)
            .map(|i| {
                WorkerState::new(
                    WorkerId(i),
                    10,
                    0,
                    AnnealConfig::default().with_num_neighbors(0),
                )
            })
            .collect();
        let seed = Tour::identity(10);
        let results = anneal_round(&mut workers, Some(&seed), 1.0, &cities, true).unwrap();
        assert!(results.iter().all(|r| r.end.tour == seed && r.best.tour == seed));
    }
}
