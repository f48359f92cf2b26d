//! Output types shared by the fixed-step and adaptive drivers.

use serde::Serialize;

use crate::traits::{Scalar, StateVector};

/// One entry of the output sequence: the state reached at time `t`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample<T, S> {
    pub t: T,
    pub y: S,
}

/// Work counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Derivative function evaluations.
    pub nfev: usize,
    /// Accepted steps.
    pub steps: usize,
    /// Step-size doublings.
    pub doublings: usize,
    /// Step-size halvings.
    pub halvings: usize,
}

/// The ordered sequence of samples produced by one integration run, together
/// with its work counters. Owned exclusively by the caller after return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory<T, S> {
    pub samples: Vec<Sample<T, S>>,
    pub stats: Stats,
}

impl<T: Scalar, S: StateVector<T>> Trajectory<T, S> {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&Sample<T, S>> {
        self.samples.last()
    }
}
