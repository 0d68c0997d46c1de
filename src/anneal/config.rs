//! Per-round annealing parameters.

/// Configuration for one worker's annealing round.
///
/// # Examples
///
/// ```
/// use u_dsa::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default().with_num_neighbors(250);
/// assert_eq!(config.num_neighbors, 250);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Neighbor candidates tried per round.
    pub num_neighbors: usize,
}

impl AnnealConfig {
    pub const DEFAULT_NUM_NEIGHBORS: usize = 100;

    pub fn with_num_neighbors(mut self, n: usize) -> Self {
        self.num_neighbors = n;
        self
    }
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            num_neighbors: Self::DEFAULT_NUM_NEIGHBORS,
        }
    }
}
