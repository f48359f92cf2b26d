//! Reference problem: a mass driven by two opposing Gaussian acceleration
//! pulses, used to exercise the integrators on a forced second-order system.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::traits::VectorField;

/// Shape parameters of the forcing function.
///
/// The acceleration is a positive Gaussian pulse of width `tau1` centered at
/// `center1` followed by a negative pulse of width `tau2` centered at
/// `center2`. Both pulses have unit area, so the velocity returns to zero
/// once both have passed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseConfig {
    pub tau1: f64,
    pub tau2: f64,
    pub center1: f64,
    pub center2: f64,
    /// Coupling constant feeding the acceleration into the position
    /// derivative.
    pub coupling_dt: f64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            tau1: 1.0,
            tau2: 4.0,
            center1: 0.5,
            center2: 6.0,
            coupling_dt: 0.001,
        }
    }
}

/// Normalized Gaussian with standard deviation `sigma`.
pub fn gauss(x: f64, sigma: f64) -> f64 {
    let z = x / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * std::f64::consts::PI).sqrt())
}

/// The forcing acceleration at time `t`: pure function of time and config.
pub fn forcing(t: f64, config: &PulseConfig) -> f64 {
    gauss(t - config.center1, config.tau1 / 6.0) - gauss(t - config.center2, config.tau2 / 6.0)
}

/// The forced oscillator as a first-order system over `(position, velocity)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulseOscillator {
    pub config: PulseConfig,
}

impl PulseOscillator {
    pub fn new(config: PulseConfig) -> Self {
        Self { config }
    }

    /// The derivative of the state `(x, v)` at time `t`:
    /// `x' = v + a·coupling_dt`, `v' = a` with `a = forcing(t)`.
    pub fn derivative(&self, t: f64, y: &Vector2<f64>) -> Vector2<f64> {
        let a = forcing(t, &self.config);
        Vector2::new(y[1] + a * self.config.coupling_dt, a)
    }
}

impl VectorField<f64, Vector2<f64>> for PulseOscillator {
    fn eval(&self, t: f64, y: &Vector2<f64>) -> Vector2<f64> {
        self.derivative(t, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptive::{solve4, Settings};
    use approx::assert_relative_eq;

    #[test]
    fn forcing_peaks_at_the_pulse_centers() {
        let config = PulseConfig::default();
        let sigma1 = config.tau1 / 6.0;
        let peak = 1.0 / (sigma1 * (2.0 * std::f64::consts::PI).sqrt());

        // The second pulse is 33 standard deviations away at center1 and
        // contributes nothing measurable there.
        assert_relative_eq!(forcing(config.center1, &config), peak, epsilon = 1e-9);
        assert!(forcing(config.center2, &config) < 0.0);
    }

    #[test]
    fn gauss_has_unit_area() {
        // Trapezoid sum over ±8 sigma.
        let sigma = 0.25;
        let n = 4000;
        let width = 16.0 * sigma;
        let h = width / n as f64;
        let area: f64 = (0..=n)
            .map(|i| {
                let x = -8.0 * sigma + i as f64 * h;
                let w = if i == 0 || i == n { 0.5 } else { 1.0 };
                w * gauss(x, sigma) * h
            })
            .sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn derivative_matches_closed_form() {
        let model = PulseOscillator::default();
        let y = Vector2::new(2.0, 3.0);
        let t = 1.25;
        let a = forcing(t, &model.config);

        let dy = model.derivative(t, &y);

        assert_eq!(dy[0], 3.0 + a * model.config.coupling_dt);
        assert_eq!(dy[1], a);
    }

    #[test]
    fn pulses_cancel_over_the_full_run() {
        // Both pulses have unit area, so the velocity rises to ~1 after the
        // first pulse and returns to ~0 after the second; the position keeps
        // the displacement accumulated in between.
        let model = PulseOscillator::default();
        let settings = Settings {
            eps: 1e-5,
            ..Settings::default()
        };
        let sol = solve4(model, 0.0, 10.0, 0.001, Vector2::zeros(), &settings).unwrap();

        let last = sol.last().unwrap();
        assert!(last.t > 10.0);
        assert!(last.y[1].abs() < 0.05, "velocity did not return to rest");
        // v rises from 0 to 1 around center1 and falls back around center2,
        // so the displacement is close to center2 - center1 = 5.5.
        assert!(
            last.y[0] > 5.0 && last.y[0] < 6.0,
            "displacement outside the expected band"
        );
    }

    #[test]
    fn oscillator_is_a_vector_field() {
        // The model can be handed to the drivers directly, and integrating it
        // that way matches integrating the equivalent closure.
        let model = PulseOscillator::default();
        let settings = Settings::default();
        let direct = solve4(model, 0.0, 2.0, 0.01, Vector2::zeros(), &settings).unwrap();
        let closed_over = solve4(
            |t, y: &Vector2<f64>| model.derivative(t, y),
            0.0,
            2.0,
            0.01,
            Vector2::zeros(),
            &settings,
        )
        .unwrap();
        assert_eq!(direct, closed_over);
    }

    #[test]
    fn model_runs_are_deterministic() {
        let model = PulseOscillator::default();
        let settings = Settings::default();
        let run = || {
            solve4(
                |t, y: &Vector2<f64>| model.derivative(t, y),
                0.0,
                2.0,
                0.01,
                Vector2::zeros(),
                &settings,
            )
            .unwrap()
        };
        assert_eq!(run(), run());
    }
}
