pub mod adaptive;
pub mod error;
pub mod model;
pub mod solution;
pub mod solvers;
/// The `stride_core` crate provides a generic adaptive step-doubling RK4
/// integrator for ordinary differential equations whose state fits in a small
/// vector of real values.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `StateVector` (the
///   algebraic contract a state type must satisfy to be integrated), and
///   `VectorField` (the right-hand side of the system, blanket-implemented
///   for closures).
/// - **Solvers**: `step4` (a single fixed-step RK4 increment) and `rk4`
///   (a plain fixed-step driver).
/// - **Adaptive**: `solve4`, the step-doubling/halving driver that grows or
///   shrinks its step to hold successive increments under a tolerance.
/// - **Model**: a Gaussian-pulse forced oscillator used as the reference
///   problem for the integrator.
pub mod traits;
