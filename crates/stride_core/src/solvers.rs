//! Fixed-step RK4: the single-step increment and a plain driver.

use crate::error::SolverError;
use crate::solution::{Sample, Stats, Trajectory};
use crate::traits::{Scalar, StateVector, VectorField};

/// Computes one classical RK4 increment `ΔY` for a step of size `dt`.
///
/// `k1` must be the derivative already evaluated at `(t, y)`; it is reused so
/// that a driver trying several step sizes from the same point pays for it
/// only once. Three further derivative evaluations are performed here.
///
/// Pure: no inputs are mutated and the result is deterministic.
pub fn step4<T, S, F>(f: &F, t: T, y: &S, k1: &S, dt: T) -> S
where
    T: Scalar,
    S: StateVector<T>,
    F: VectorField<T, S>,
{
    let half = T::from_f64(0.5).unwrap();
    let two = T::from_f64(2.0).unwrap();
    let six = T::from_f64(6.0).unwrap();

    let k2 = f.eval(t + half * dt, &y.add(&k1.scale(half * dt)));
    let k3 = f.eval(t + half * dt, &y.add(&k2.scale(half * dt)));
    let k4 = f.eval(t + dt, &y.add(&k3.scale(dt)));

    k1.add(&k2.scale(two))
        .add(&k3.scale(two))
        .add(&k4)
        .scale(dt / six)
}

/// Plain fixed-step RK4 driver over `[t1, t2]`.
///
/// Steps with a constant `dt` until `t` passes `t2`, so the last sample lands
/// in `(t2, t2 + dt]`. The initial condition itself is not part of the output;
/// the first sample is at `t1 + dt`.
pub fn rk4<T, S, F>(f: F, t1: T, t2: T, dt: T, y0: &S) -> Result<Trajectory<T, S>, SolverError>
where
    T: Scalar,
    S: StateVector<T>,
    F: VectorField<T, S>,
{
    if !(dt > T::zero()) || !dt.is_finite() {
        return Err(SolverError::InvalidStepSize(as_f64(dt)));
    }
    if !(t1 < t2) || !t1.is_finite() || !t2.is_finite() {
        return Err(SolverError::InvalidInterval {
            t1: as_f64(t1),
            t2: as_f64(t2),
        });
    }

    let mut t = t1;
    let mut y = y0.clone();
    let mut samples = Vec::with_capacity(capacity_hint(t1, t2, dt));
    let mut stats = Stats::default();

    while t <= t2 {
        let k1 = f.eval(t, &y);
        if !k1.is_finite() {
            return Err(SolverError::NonFiniteState { t: as_f64(t) });
        }
        let dy = step4(&f, t, &y, &k1, dt);
        stats.nfev += 4;
        if !dy.is_finite() {
            return Err(SolverError::NonFiniteState { t: as_f64(t) });
        }

        y = y.add(&dy);
        t = t + dt;
        stats.steps += 1;
        samples.push(Sample { t, y: y.clone() });
    }

    Ok(Trajectory { samples, stats })
}

pub(crate) fn as_f64<T: Scalar>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

pub(crate) fn capacity_hint<T: Scalar>(t1: T, t2: T, dt: T) -> usize {
    let estimate = ((t2 - t1) / dt).to_f64().unwrap_or(0.0);
    if estimate.is_finite() && estimate >= 0.0 {
        (estimate as usize + 1).min(1 << 16)
    } else {
        0
    }
}
