use thiserror::Error;

/// Failure outcomes of the integration drivers.
///
/// Precondition violations are detected before the main loop starts; the
/// remaining variants surface mid-run conditions that would otherwise show up
/// as non-termination or as silently corrupted samples.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("step size must be positive and finite (got {0})")]
    InvalidStepSize(f64),

    #[error("error tolerance must be positive and finite (got {0})")]
    InvalidTolerance(f64),

    #[error("integration interval must satisfy t1 < t2 with finite endpoints (got [{t1}, {t2}])")]
    InvalidInterval { t1: f64, t2: f64 },

    #[error("step size underflow at t = {t}: {halvings} halvings without meeting the tolerance")]
    StepSizeUnderflow { t: f64, halvings: usize },

    #[error("derivative produced a non-finite value at t = {t}")]
    NonFiniteState { t: f64 },

    #[error("exceeded {0} accepted steps before reaching the end of the interval")]
    MaxStepsExceeded(usize),
}
