//! Run configuration.

use crate::anneal::AnnealConfig;

/// Configuration for a synchronized annealing run.
///
/// Defaults follow the classic setup: 1000 degrees cooled by 0.3% per
/// round down to 1, with 100 neighbor trials per worker per round.
///
/// # Examples
///
/// ```
/// use u_dsa::run::RunConfig;
///
/// let config = RunConfig::default()
///     .with_workers(8)
///     .with_initial_temperature(500.0)
///     .with_cooling_rate(0.01)
///     .with_num_neighbors(200)
///     .with_master_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Number of workers. Fixed for the whole run.
    pub workers: usize,

    /// Temperature of the first round.
    pub initial_temperature: f64,

    /// The run converges once the temperature is at or below this bound.
    pub min_temperature: f64,

    /// Fraction of the temperature removed after each round, in (0, 1).
    pub cooling_rate: f64,

    /// Neighbor trials per worker per round.
    pub num_neighbors: usize,

    /// Mixed with each worker's id to seed that worker's rng.
    pub master_seed: u64,

    /// Whether to run the workers of a round on the rayon thread pool.
    ///
    /// Results are identical either way.
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            initial_temperature: 1000.0,
            min_temperature: 1.0,
            cooling_rate: 0.003,
            num_neighbors: AnnealConfig::DEFAULT_NUM_NEIGHBORS,
            master_seed: 0,
            parallel: true,
        }
    }
}

impl RunConfig {
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_num_neighbors(mut self, n: usize) -> Self {
        self.num_neighbors = n;
        self
    }

    pub fn with_master_seed(mut self, seed: u64) -> Self {
        self.master_seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Per-worker annealing parameters derived from this config.
    pub fn anneal_config(&self) -> AnnealConfig {
        AnnealConfig::default().with_num_neighbors(self.num_neighbors)
    }

    /// Validates the configuration.
    ///
    /// A worker count of zero is accepted here; such a run aborts in its
    /// first round with an empty result set.
    pub fn validate(&self) -> Result<(), String> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            ));
        }
        if !self.min_temperature.is_finite() || self.min_temperature <= 0.0 {
            return Err(format!(
                "min_temperature must be positive and finite, got {}",
                self.min_temperature
            ));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert!((config.initial_temperature - 1000.0).abs() < 1e-10);
        assert!((config.min_temperature - 1.0).abs() < 1e-10);
        assert!((config.cooling_rate - 0.003).abs() < 1e-12);
        assert_eq!(config.num_neighbors, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_anneal_config_follows_neighbors() {
        let config = RunConfig::default().with_num_neighbors(5);
        assert_eq!(config.anneal_config().num_neighbors, 5);
    }

    #[test]
    fn test_validate_bad_initial_temperature() {
        assert!(RunConfig::default()
            .with_initial_temperature(0.0)
            .validate()
            .is_err());
        assert!(RunConfig::default()
            .with_initial_temperature(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_min_ge_initial() {
        let config = RunConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(10.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_cooling_rate() {
        for rate in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let config = RunConfig::default().with_cooling_rate(rate);
            assert!(config.validate().is_err(), "rate {rate} accepted");
        }
    }

    #[test]
    fn test_zero_workers_is_not_a_config_error() {
        assert!(RunConfig::default().with_workers(0).validate().is_ok());
    }
}
