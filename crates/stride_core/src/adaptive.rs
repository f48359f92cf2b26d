//! Adaptive step-doubling RK4 driver.
//!
//! The step controller compares RK4 increments computed at the current,
//! doubled, and halved step sizes. When the doubled-step increment agrees
//! with the previously accepted increment to within the tolerance, the step
//! grows; when the current increment disagrees with the half-step increment
//! beyond the tolerance, the step shrinks. The very first step is accepted
//! unchecked because no previous increment exists yet.

use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::solution::{Sample, Stats, Trajectory};
use crate::solvers::{as_f64, capacity_hint, step4};
use crate::traits::{Scalar, StateVector, VectorField};

/// Comparison target used by the shrink loop.
///
/// `Frozen` keeps the half-step increment computed once before the loop as
/// the fixed target while `dt` halves, which means the loop exits as soon as
/// the recomputed increment reaches the step size the target was computed at.
/// `Recomputed` refreshes the target at `dt/2` after every halving, which
/// keeps comparing estimates one octave apart and can therefore halve much
/// further on rough derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShrinkReference {
    Frozen,
    Recomputed,
}

/// Immutable configuration for one `solve4` run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Settings<T> {
    /// Error tolerance for the step-doubling comparisons. Must be positive.
    pub eps: T,
    /// Upper bound on the step size; doubling stops at this cap.
    pub max_step: Option<T>,
    /// Halving budget per iteration before `StepSizeUnderflow` is raised.
    pub max_halvings: usize,
    /// Accepted-step budget before `MaxStepsExceeded` is raised.
    pub max_steps: usize,
    /// Shrink-loop comparison strategy; `Frozen` matches the historical
    /// behavior of this controller.
    pub shrink_reference: ShrinkReference,
}

impl<T: Scalar> Default for Settings<T> {
    fn default() -> Self {
        Self {
            eps: T::from_f64(1e-5).unwrap(),
            max_step: None,
            max_halvings: 64,
            max_steps: 1_000_000,
            shrink_reference: ShrinkReference::Frozen,
        }
    }
}

/// Collaborator notified of every step-size change.
///
/// Purely an observability hook; the integration result does not depend on
/// the observer.
pub trait StepObserver<T: Scalar> {
    /// Called when the controller changes the step from `old_dt` to `new_dt`
    /// while positioned at time `t`.
    fn step_changed(&mut self, t: T, old_dt: T, new_dt: T);
}

/// Observer that discards all notifications.
pub struct SilentObserver;

impl<T: Scalar> StepObserver<T> for SilentObserver {
    fn step_changed(&mut self, _t: T, _old_dt: T, _new_dt: T) {}
}

/// Working variables of one run; exists only for the duration of a
/// `solve4` call.
#[derive(Debug, Clone)]
struct RunState<T, S> {
    t: T,
    y: S,
    dt: T,
    /// Increment accepted on the previous iteration. `None` until the first
    /// step has been accepted, which is what disables error control on the
    /// first iteration (a genuinely zero increment is `Some(zero)` and does
    /// not disable it).
    last_dy: Option<S>,
}

/// Result of one accepted step, produced by the pure transition function.
struct StepOutcome<T, S> {
    next: RunState<T, S>,
    nfev: usize,
    doublings: usize,
    halvings: usize,
    /// Step-size changes made this iteration, as `(t, old_dt, new_dt)`.
    changes: Vec<(T, T, T)>,
}

/// Integrates `y' = f(t, y)` over `[t1, t2]` with adaptive step-doubling RK4.
///
/// Produces samples from `t1 + dt0` up to the first time past `t2`; the
/// initial condition itself is not part of the output. The first step always
/// uses exactly `dt0`.
///
/// Preconditions (`dt0 > 0`, `eps > 0`, `t1 < t2`, all finite) are checked
/// up front and rejected with the matching [`SolverError`].
pub fn solve4<T, S, F>(
    f: F,
    t1: T,
    t2: T,
    dt0: T,
    x0: S,
    settings: &Settings<T>,
) -> Result<Trajectory<T, S>, SolverError>
where
    T: Scalar,
    S: StateVector<T>,
    F: VectorField<T, S>,
{
    solve4_observed(f, t1, t2, dt0, x0, settings, &mut SilentObserver)
}

/// Like [`solve4`], additionally reporting every step-size change to
/// `observer`.
pub fn solve4_observed<T, S, F, O>(
    f: F,
    t1: T,
    t2: T,
    dt0: T,
    x0: S,
    settings: &Settings<T>,
    observer: &mut O,
) -> Result<Trajectory<T, S>, SolverError>
where
    T: Scalar,
    S: StateVector<T>,
    F: VectorField<T, S>,
    O: StepObserver<T>,
{
    if !(dt0 > T::zero()) || !dt0.is_finite() {
        return Err(SolverError::InvalidStepSize(as_f64(dt0)));
    }
    if !(settings.eps > T::zero()) || !settings.eps.is_finite() {
        return Err(SolverError::InvalidTolerance(as_f64(settings.eps)));
    }
    if !(t1 < t2) || !t1.is_finite() || !t2.is_finite() {
        return Err(SolverError::InvalidInterval {
            t1: as_f64(t1),
            t2: as_f64(t2),
        });
    }
    if !x0.is_finite() {
        return Err(SolverError::NonFiniteState { t: as_f64(t1) });
    }

    let mut state = RunState {
        t: t1,
        y: x0,
        dt: dt0,
        last_dy: None,
    };
    let mut samples = Vec::with_capacity(capacity_hint(t1, t2, dt0));
    let mut stats = Stats::default();

    while state.t <= t2 {
        if stats.steps >= settings.max_steps {
            return Err(SolverError::MaxStepsExceeded(settings.max_steps));
        }

        let outcome = advance(&f, &state, settings)?;
        for &(t, old_dt, new_dt) in &outcome.changes {
            observer.step_changed(t, old_dt, new_dt);
        }
        stats.nfev += outcome.nfev;
        stats.doublings += outcome.doublings;
        stats.halvings += outcome.halvings;
        stats.steps += 1;

        state = outcome.next;
        samples.push(Sample {
            t: state.t,
            y: state.y.clone(),
        });
    }

    Ok(Trajectory { samples, stats })
}

/// One iteration of the controller: from the current run state, pick a step
/// size, compute the accepted increment, and return the advanced state.
///
/// Pure apart from calling `f`; the driver loop is the only place that
/// overwrites the run state.
fn advance<T, S, F>(
    f: &F,
    state: &RunState<T, S>,
    settings: &Settings<T>,
) -> Result<StepOutcome<T, S>, SolverError>
where
    T: Scalar,
    S: StateVector<T>,
    F: VectorField<T, S>,
{
    let half = T::from_f64(0.5).unwrap();
    let two = T::from_f64(2.0).unwrap();

    let t = state.t;
    let y = state.y.clone();
    let mut dt = state.dt;
    let mut nfev = 0;
    let mut doublings = 0;
    let mut halvings = 0;
    let mut changes = Vec::new();

    // One derivative evaluation per iteration, shared by every trial step.
    let k1 = f.eval(t, &y);
    nfev += 1;
    if !k1.is_finite() {
        return Err(SolverError::NonFiniteState { t: as_f64(t) });
    }

    let mut dy0 = step4(f, t, &y, &k1, dt);
    nfev += 3;

    if let Some(last_dy) = &state.last_dy {
        let dy1 = step4(f, t, &y, &k1, two * dt);
        nfev += 3;

        let step_is_small = dy1.sub(last_dy).within(settings.eps);
        let cap_allows_growth = settings
            .max_step
            .map_or(true, |max_step| two * dt <= max_step);

        if step_is_small && cap_allows_growth {
            changes.push((t, dt, two * dt));
            dt = two * dt;
            doublings += 1;
            dy0 = dy1;
            // Trailing estimate at the doubled pair; its value is never
            // consulted again, only its evaluation cost is observable.
            let _ = step4(f, t, &y, &k1, two * dt);
            nfev += 3;
        } else if !step_is_small {
            let mut dy1 = step4(f, t, &y, &k1, half * dt);
            nfev += 3;

            while dy0.sub(&dy1).exceeds(settings.eps) {
                if halvings >= settings.max_halvings {
                    return Err(SolverError::StepSizeUnderflow {
                        t: as_f64(t),
                        halvings,
                    });
                }
                changes.push((t, dt, half * dt));
                dt = half * dt;
                halvings += 1;
                dy0 = step4(f, t, &y, &k1, dt);
                nfev += 3;
                if settings.shrink_reference == ShrinkReference::Recomputed {
                    dy1 = step4(f, t, &y, &k1, half * dt);
                    nfev += 3;
                }
            }
        }
    }

    if !dy0.is_finite() {
        return Err(SolverError::NonFiniteState { t: as_f64(t) });
    }

    let next = RunState {
        t: t + dt,
        y: y.add(&dy0),
        dt,
        last_dy: Some(dy0),
    };
    Ok(StepOutcome {
        next,
        nfev,
        doublings,
        halvings,
        changes,
    })
}
