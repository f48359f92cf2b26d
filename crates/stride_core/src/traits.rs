use nalgebra::Vector2;
use num_traits::{Float, FromPrimitive, ToPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars (time, step sizes,
/// tolerances) by the integrators. Must support basic arithmetic, debug
/// printing, and conversion to and from f64.
pub trait Scalar: Float + FromPrimitive + ToPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + ToPrimitive + Debug + 'static> Scalar for T {}

/// The algebraic contract a state type must satisfy to be integrated.
///
/// The integrators only ever combine states through these operations:
/// componentwise addition and subtraction, scalar multiplication, and two
/// componentwise magnitude comparisons against a scalar bound. `PartialEq`
/// provides equality; `zero` is the additive identity.
///
/// Note that `within` and `exceeds` are not complements: a state with one
/// small and one large component satisfies neither. The step controller
/// relies on this, so both must quantify over *every* component.
/// A time-dependent vector field: the right-hand side `f(t, y)` of the
/// system `y' = f(t, y)`.
///
/// Blanket-implemented for closures, so `|t, y| ...` can be passed to the
/// drivers directly; model types with their own parameters implement it by
/// hand.
pub trait VectorField<T: Scalar, S: StateVector<T>> {
    fn eval(&self, t: T, y: &S) -> S;
}

impl<T, S, F> VectorField<T, S> for F
where
    T: Scalar,
    S: StateVector<T>,
    F: Fn(T, &S) -> S,
{
    fn eval(&self, t: T, y: &S) -> S {
        self(t, y)
    }
}

pub trait StateVector<T: Scalar>: Clone + PartialEq + Debug {
    /// The additive identity.
    fn zero() -> Self;

    /// Componentwise `self + other`.
    fn add(&self, other: &Self) -> Self;

    /// Componentwise `self - other`.
    fn sub(&self, other: &Self) -> Self;

    /// Componentwise `self * factor`.
    fn scale(&self, factor: T) -> Self;

    /// True iff every component magnitude is strictly below `bound`.
    fn within(&self, bound: T) -> bool;

    /// True iff every component magnitude is strictly above `bound`.
    fn exceeds(&self, bound: T) -> bool;

    /// True iff every component is a finite value.
    fn is_finite(&self) -> bool;
}

impl StateVector<f64> for f64 {
    fn zero() -> Self {
        0.0
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn within(&self, bound: f64) -> bool {
        self.abs() < bound
    }

    fn exceeds(&self, bound: f64) -> bool {
        self.abs() > bound
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl<T: Scalar, const N: usize> StateVector<T> for [T; N] {
    fn zero() -> Self {
        [T::zero(); N]
    }

    fn add(&self, other: &Self) -> Self {
        let mut out = *self;
        for i in 0..N {
            out[i] = self[i] + other[i];
        }
        out
    }

    fn sub(&self, other: &Self) -> Self {
        let mut out = *self;
        for i in 0..N {
            out[i] = self[i] - other[i];
        }
        out
    }

    fn scale(&self, factor: T) -> Self {
        let mut out = *self;
        for value in &mut out {
            *value = *value * factor;
        }
        out
    }

    fn within(&self, bound: T) -> bool {
        self.iter().all(|c| c.abs() < bound)
    }

    fn exceeds(&self, bound: T) -> bool {
        self.iter().all(|c| c.abs() > bound)
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|c| Float::is_finite(*c))
    }
}

impl StateVector<f64> for Vector2<f64> {
    fn zero() -> Self {
        Vector2::zeros()
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn within(&self, bound: f64) -> bool {
        self.iter().all(|c| c.abs() < bound)
    }

    fn exceeds(&self, bound: f64) -> bool {
        self.iter().all(|c| c.abs() > bound)
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_vector_fields() {
        let f = |t: f64, y: &f64| t + y;
        assert_eq!(f.eval(1.0, &2.0), 3.0);

        let g = |_t: f64, y: &[f64; 2]| [y[1], -y[0]];
        assert_eq!(g.eval(0.0, &[1.0, 2.0]), [2.0, -1.0]);
    }

    #[test]
    fn zero_is_additive_identity() {
        let x = [1.5, -2.0];
        let z = <[f64; 2] as StateVector<f64>>::zero();
        assert_eq!(x.add(&z), x);
        assert_eq!(x.sub(&z), x);

        let v = Vector2::new(0.25, -4.0);
        let zv = <Vector2<f64> as StateVector<f64>>::zero();
        assert_eq!(StateVector::add(&v, &zv), v);
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.5, -1.0, 2.0];
        assert_eq!(a.add(&b), [1.5, 1.0, 5.0]);
        assert_eq!(a.sub(&b), [0.5, 3.0, 1.0]);
        assert_eq!(a.scale(2.0), [2.0, 4.0, 6.0]);
    }

    #[test]
    fn within_and_exceeds_quantify_over_all_components() {
        let mixed = [0.5, 2.0];
        // One small and one large component satisfies neither comparison.
        assert!(!mixed.within(1.0));
        assert!(!mixed.exceeds(1.0));

        assert!([0.5, 0.9].within(1.0));
        assert!([1.5, 2.0].exceeds(1.0));

        // Bounds are strict.
        assert!(![1.0, 0.5].within(1.0));
        assert!(![1.0, 2.0].exceeds(1.0));
    }

    #[test]
    fn scalar_state_comparisons_use_magnitude() {
        assert!(StateVector::within(&-0.5, 1.0));
        assert!(StateVector::exceeds(&-2.0, 1.0));
        assert!(!StateVector::within(&-2.0, 1.0));
    }

    #[test]
    fn finiteness_check_covers_every_component() {
        assert!([1.0, -2.0].is_finite());
        assert!(!StateVector::<f64>::is_finite(&[1.0, f64::NAN]));
        assert!(!StateVector::<f64>::is_finite(&[f64::INFINITY, 0.0]));
        assert!(StateVector::is_finite(&Vector2::new(1.0, 2.0)));
        assert!(!StateVector::is_finite(&Vector2::new(1.0, f64::NAN)));
    }
}
