//! Geometry and cost model.
//!
//! Cities are points in the plane, a [`Tour`] is a permutation of their
//! indices, and the cost of a tour is the length of the **open** path it
//! describes: the distance from the last city back to the first is not
//! counted.

mod city;
mod tour;

pub use city::{distance, City};
pub use tour::{tour_cost, validate_permutation, Tour};

pub(crate) use tour::path_length;
