//! Model evaluation for Fisher / Landau / Gompertz.
//!
//! Every model maps a normalized time coordinate `τ` and a coefficient pair
//! `(c1, c2)` to a predicted growth fraction:
//!
//! - Fisher:   `0.5 + 0.5·tanh(c1·τ − c2)`
//! - Landau:   `sqrt(0.5 + 0.5·tanh(c1·τ − c2))`
//! - Gompertz: `exp(−c1·exp(−c2·τ))`
//!
//! The functions are total: no input panics or errors, and non-finite inputs
//! propagate through IEEE-754 arithmetic (e.g. Fisher saturates to 0/1 as
//! `τ → ∓∞`).
//!
//! Each public model function is generic over [`TauInput`], so the same call
//! works for a scalar, a slice, a `Vec` or a fixed-size array, and the output
//! mirrors the input shape.

use crate::domain::{Coefficients, ModelKind};

/// Something the growth models can be evaluated on: a single `τ` or an
/// ordered sequence of them.
pub trait TauInput {
    type Output;

    /// Apply a scalar model element-wise, preserving shape and order.
    fn map_tau<F: Fn(f64) -> f64>(self, f: F) -> Self::Output;
}

impl TauInput for f64 {
    type Output = f64;

    fn map_tau<F: Fn(f64) -> f64>(self, f: F) -> f64 {
        f(self)
    }
}

impl TauInput for &[f64] {
    type Output = Vec<f64>;

    fn map_tau<F: Fn(f64) -> f64>(self, f: F) -> Vec<f64> {
        self.iter().map(|&x| f(x)).collect()
    }
}

impl TauInput for &Vec<f64> {
    type Output = Vec<f64>;

    fn map_tau<F: Fn(f64) -> f64>(self, f: F) -> Vec<f64> {
        self.as_slice().map_tau(f)
    }
}

impl TauInput for Vec<f64> {
    type Output = Vec<f64>;

    fn map_tau<F: Fn(f64) -> f64>(mut self, f: F) -> Vec<f64> {
        for x in self.iter_mut() {
            *x = f(*x);
        }
        self
    }
}

impl<const N: usize> TauInput for [f64; N] {
    type Output = [f64; N];

    fn map_tau<F: Fn(f64) -> f64>(self, f: F) -> [f64; N] {
        self.map(f)
    }
}

/// Fisher (logistic) growth curve, symmetric around `τ = c2/c1`.
pub fn fisher<X: TauInput>(x: X, c1: f64, c2: f64) -> X::Output {
    x.map_tau(|t| fisher_at(t, c1, c2))
}

/// Landau growth curve: the square root of the Fisher form.
pub fn landau<X: TauInput>(x: X, c1: f64, c2: f64) -> X::Output {
    x.map_tau(|t| landau_at(t, c1, c2))
}

/// Gompertz growth curve, inflection at `τ = ln(c1)/c2`.
pub fn gompertz<X: TauInput>(x: X, c1: f64, c2: f64) -> X::Output {
    x.map_tau(|t| gompertz_at(t, c1, c2))
}

fn fisher_at(t: f64, c1: f64, c2: f64) -> f64 {
    // 0.5 + 0.5·tanh(z) == 1 / (1 + exp(-2z)); the logistic form keeps the
    // lower tail positive where the tanh form cancels to 0.
    1.0 / (1.0 + (-2.0 * (c1 * t - c2)).exp())
}

fn landau_at(t: f64, c1: f64, c2: f64) -> f64 {
    // tanh ≥ -1, so the radicand stays in [0, 1].
    fisher_at(t, c1, c2).sqrt()
}

fn gompertz_at(t: f64, c1: f64, c2: f64) -> f64 {
    (-c1 * (-c2 * t).exp()).exp()
}

/// Evaluate the given model kind.
pub fn evaluate<X: TauInput>(kind: ModelKind, x: X, coefficients: Coefficients) -> X::Output {
    let Coefficients { c1, c2 } = coefficients;
    match kind {
        ModelKind::Fisher => fisher(x, c1, c2),
        ModelKind::Landau => landau(x, c1, c2),
        ModelKind::Gompertz => gompertz(x, c1, c2),
    }
}

/// Evaluate a model over a slice of time coordinates.
pub fn evaluate_many(kind: ModelKind, xs: &[f64], coefficients: Coefficients) -> Vec<f64> {
    evaluate(kind, xs, coefficients)
}

/// The `τ` at which the model reaches a growth fraction of 0.5.
///
/// Returns `None` for degenerate coefficients (flat curves, `c1 ≤ 0` for
/// Gompertz) where no finite crossing exists.
pub fn half_growth_tau(kind: ModelKind, coefficients: Coefficients) -> Option<f64> {
    let Coefficients { c1, c2 } = coefficients;
    let tau = match kind {
        ModelKind::Fisher => c2 / c1,
        // landau = 0.5  <=>  fisher = 0.25  <=>  tanh(c1·τ − c2) = −0.5
        ModelKind::Landau => (c2 + (-0.5_f64).atanh()) / c1,
        ModelKind::Gompertz => (c1 / std::f64::consts::LN_2).ln() / c2,
    };
    tau.is_finite().then_some(tau)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const FISHER: (f64, f64) = (2.35594909, 0.86735709);
    const LANDAU: (f64, f64) = (3.05408611, 1.71316648);
    const GOMPERTZ: (f64, f64) = (2.24074685, 3.38374238);

    fn grid(min: f64, max: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| min + (max - min) * i as f64 / (n as f64 - 1.0))
            .collect()
    }

    #[test]
    fn fisher_reference_value_at_origin() {
        let y = fisher(0.0, FISHER.0, FISHER.1);
        assert_abs_diff_eq!(y, 0.5 + 0.5 * (-0.86735709_f64).tanh(), epsilon = 1e-12);
        assert_abs_diff_eq!(y, 0.149986, epsilon = 1e-6);
    }

    #[test]
    fn gompertz_reference_value_at_one() {
        let y = gompertz(1.0, GOMPERTZ.0, GOMPERTZ.1);
        assert_abs_diff_eq!(y, 0.926810, epsilon = 1e-6);
    }

    #[test]
    fn fisher_stays_inside_unit_interval() {
        for &(c1, c2) in &[FISHER, LANDAU, (-1.5, 0.3), (0.2, -4.0)] {
            for x in grid(-5.0, 5.0, 101) {
                let y = fisher(x, c1, c2);
                assert!(y > 0.0 && y < 1.0, "fisher({x}, {c1}, {c2}) = {y}");
            }
        }
    }

    #[test]
    fn landau_is_sqrt_of_fisher() {
        let (c1, c2) = LANDAU;
        for x in grid(-3.0, 3.0, 61) {
            assert_abs_diff_eq!(landau(x, c1, c2), fisher(x, c1, c2).sqrt(), epsilon = 1e-12);
        }
    }

    #[test]
    fn gompertz_bounded_and_strictly_increasing() {
        let (c1, c2) = GOMPERTZ;
        let ys = gompertz(grid(-0.2, 2.0, 45).as_slice(), c1, c2);
        for w in ys.windows(2) {
            assert!(w[0] > 0.0 && w[1] < 1.0);
            assert!(w[1] > w[0], "gompertz not increasing: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn fisher_half_point_is_symmetric() {
        let (c1, c2) = FISHER;
        assert_abs_diff_eq!(fisher(c2 / c1, c1, c2), 0.5, epsilon = 1e-15);

        let d = 0.3;
        let lo = fisher(c2 / c1 - d, c1, c2);
        let hi = fisher(c2 / c1 + d, c1, c2);
        assert_abs_diff_eq!(lo + hi, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn lower_tail_stays_positive() {
        let (c1, c2) = FISHER;
        for x in grid(-100.0, 100.0, 401) {
            let y = fisher(x, c1, c2);
            assert!(y > 0.0 && y <= 1.0, "fisher({x}) = {y}");
            assert!(landau(x, c1, c2) > 0.0, "landau({x})");
        }
        // tanh(z) rounds to -1 here, the logistic form does not.
        assert_abs_diff_eq!(fisher(-8.0, c1, c2), 7.51e-18, epsilon = 1e-19);
    }

    #[test]
    fn fisher_and_landau_non_decreasing() {
        let xs = grid(-4.0, 4.0, 200);
        let (c1, c2) = FISHER;
        let f = fisher(xs.as_slice(), c1, c2);
        let l = landau(xs.as_slice(), c1, c2);
        assert!(f.windows(2).all(|w| w[1] >= w[0]));
        assert!(l.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn limits_at_infinity() {
        let (c1, c2) = FISHER;
        assert_eq!(fisher(f64::INFINITY, c1, c2), 1.0);
        assert_eq!(fisher(f64::NEG_INFINITY, c1, c2), 0.0);
        assert_eq!(landau(f64::NEG_INFINITY, c1, c2), 0.0);
        assert_abs_diff_eq!(fisher(50.0, c1, c2), 1.0, epsilon = 1e-12);

        let (g1, g2) = GOMPERTZ;
        assert_eq!(gompertz(f64::INFINITY, g1, g2), 1.0);
        assert_eq!(gompertz(f64::NEG_INFINITY, g1, g2), 0.0);
    }

    #[test]
    fn nan_propagates() {
        assert!(fisher(f64::NAN, 1.0, 1.0).is_nan());
        assert!(landau(1.0, f64::NAN, 1.0).is_nan());
        assert!(gompertz(1.0, 1.0, f64::NAN).is_nan());
    }

    #[test]
    fn sequence_matches_scalar_calls() {
        let xs = vec![0.0, 0.1, 0.25, 0.5, 0.9, 1.2];
        let (c1, c2) = GOMPERTZ;

        let from_slice = gompertz(xs.as_slice(), c1, c2);
        let from_vec = gompertz(xs.clone(), c1, c2);
        let from_ref = gompertz(&xs, c1, c2);
        assert_eq!(from_slice.len(), xs.len());
        assert_eq!(from_slice, from_vec);
        assert_eq!(from_slice, from_ref);
        for (x, y) in xs.iter().zip(&from_slice) {
            assert_eq!(*y, gompertz(*x, c1, c2));
        }

        let arr = fisher([0.0, 0.5, 1.0], c1, c2);
        assert_eq!(arr, [fisher(0.0, c1, c2), fisher(0.5, c1, c2), fisher(1.0, c1, c2)]);
    }

    #[test]
    fn evaluate_dispatches_by_kind() {
        let c = Coefficients::new(LANDAU.0, LANDAU.1);
        assert_eq!(evaluate(ModelKind::Landau, 0.7, c), landau(0.7, c.c1, c.c2));
        assert_eq!(evaluate(ModelKind::Fisher, 0.7, c), fisher(0.7, c.c1, c.c2));
        assert_eq!(
            evaluate_many(ModelKind::Gompertz, &[0.1, 0.2], c),
            vec![gompertz(0.1, c.c1, c.c2), gompertz(0.2, c.c1, c.c2)]
        );
        assert!(evaluate_many(ModelKind::Fisher, &[], c).is_empty());
    }

    #[test]
    fn half_growth_tau_hits_one_half() {
        let cases = [
            (ModelKind::Fisher, FISHER),
            (ModelKind::Landau, LANDAU),
            (ModelKind::Gompertz, GOMPERTZ),
        ];
        for (kind, (c1, c2)) in cases {
            let c = Coefficients::new(c1, c2);
            let tau = half_growth_tau(kind, c).unwrap();
            assert_abs_diff_eq!(evaluate(kind, tau, c), 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn half_growth_tau_none_for_flat_curves() {
        assert_eq!(half_growth_tau(ModelKind::Fisher, Coefficients::new(0.0, 1.0)), None);
        assert_eq!(half_growth_tau(ModelKind::Gompertz, Coefficients::new(-1.0, 2.0)), None);
    }
}
