//! Tours and tour cost.

use super::city::{distance, City};
use crate::error::TourError;
use rand::seq::SliceRandom;
use rand::Rng;

/// A visiting order over every city: a permutation of `0..n`.
///
/// The only mutation a tour supports is swapping two positions, which
/// preserves the permutation property. Tours coming from outside the
/// crate go through [`Tour::new`] or [`Tour::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour(Vec<usize>);

impl Tour {
    /// Builds a tour from an explicit order, checking it against `city_count`.
    pub fn new(order: Vec<usize>, city_count: usize) -> Result<Self, TourError> {
        validate_permutation(&order, city_count)?;
        Ok(Self(order))
    }

    /// The tour `0, 1, ..., n - 1`.
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// A uniformly shuffled tour drawn from `rng`.
    pub fn shuffled<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        Self(order)
    }

    /// Checks the permutation property against a city list of `city_count`.
    pub fn validate(&self, city_count: usize) -> Result<(), TourError> {
        validate_permutation(&self.0, city_count)
    }

    /// A copy of this tour with positions `i` and `j` exchanged.
    ///
    /// `i == j` is allowed and yields an identical tour.
    ///
    /// # Panics
    ///
    /// Panics if either position is out of bounds.
    pub fn swapped(&self, i: usize, j: usize) -> Self {
        let mut order = self.0.clone();
        order.swap(i, j);
        Self(order)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

/// Checks that `order` visits each of `city_count` cities exactly once.
pub fn validate_permutation(order: &[usize], city_count: usize) -> Result<(), TourError> {
    if city_count == 0 {
        return Err(TourError::NoCities);
    }
    if order.len() != city_count {
        return Err(TourError::LengthMismatch {
            expected: city_count,
            actual: order.len(),
        });
    }
    let mut seen = vec![false; city_count];
    for &index in order {
        let slot = seen.get_mut(index).ok_or(TourError::OutOfRange { index, city_count })?;
        if *slot {
            return Err(TourError::Duplicate { index });
        }
        *slot = true;
    }
    Ok(())
}

/// Length of the open path visiting `cities` in `tour` order.
///
/// The tour is validated first; a malformed tour is an error rather than a
/// meaningless number.
///
/// # Examples
///
/// ```
/// use u_dsa::geometry::{tour_cost, City};
///
/// let cities = [City::new(0.0, 0.0), City::new(0.0, 1.0), City::new(1.0, 1.0)];
/// let cost = tour_cost(&[0, 1, 2], &cities).unwrap();
/// assert!((cost - 2.0).abs() < 1e-12);
/// ```
pub fn tour_cost(tour: &[usize], cities: &[City]) -> Result<f64, TourError> {
    validate_permutation(tour, cities.len())?;
    Ok(path_length(tour, cities))
}

/// Unchecked open-path length; callers guarantee `tour` is valid.
#[inline]
pub(crate) fn path_length(tour: &[usize], cities: &[City]) -> f64 {
    tour.windows(2)
        .map(|w| distance(&cities[w[0]], &cities[w[1]]))
        .sum()
}
