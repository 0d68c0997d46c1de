//! Move generation and the Metropolis criterion.

use crate::error::AnnealError;
use crate::geometry::Tour;
use rand::Rng;

/// Probability of moving from a tour of cost `current` to one of cost
/// `candidate` at `temperature`.
///
/// Strict improvements are always accepted. Anything else is accepted with
/// probability `exp((current - candidate) / temperature)`, so equal-cost
/// moves are accepted with probability 1 as well.
///
/// # Errors
///
/// [`AnnealError::InvalidTemperature`] if `temperature` is not strictly
/// positive (NaN included).
///
/// # Examples
///
/// ```
/// use u_dsa::anneal::acceptance_probability;
///
/// assert_eq!(acceptance_probability(10.0, 8.0, 5.0).unwrap(), 1.0);
/// let p = acceptance_probability(10.0, 12.0, 2.0).unwrap();
/// assert!((p - (-1.0f64).exp()).abs() < 1e-12);
/// assert!(acceptance_probability(10.0, 12.0, 0.0).is_err());
/// ```
pub fn acceptance_probability(
    current: f64,
    candidate: f64,
    temperature: f64,
) -> Result<f64, AnnealError> {
    // `!(t > 0)` also rejects NaN.
    if !(temperature > 0.0) {
        return Err(AnnealError::InvalidTemperature { temperature });
    }
    if candidate < current {
        Ok(1.0)
    } else {
        Ok(((current - candidate) / temperature).exp())
    }
}

/// Swaps two uniformly drawn positions of `tour`.
///
/// Both positions are drawn independently, so the same position may come
/// up twice; that move leaves the tour unchanged and still counts as a
/// trial. Tours shorter than two cities are returned as-is without
/// consuming randomness.
pub fn swap_neighbor<R: Rng>(tour: &Tour, rng: &mut R) -> Tour {
    let n = tour.len();
    if n < 2 {
        return tour.clone();
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    tour.swapped(i, j)
}
