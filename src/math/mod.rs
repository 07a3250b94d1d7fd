//! Small numeric helpers shared by the report, the plot and the TUI.

/// `n` evenly spaced points on `[min, max]`, endpoints included.
///
/// `n < 2` is treated as 2 so the range is always represented.
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            min + u * (max - min)
        })
        .collect()
}

/// Finite `(min, max)` of the values, skipping non-finite entries.
pub fn finite_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
}

/// Widen `[min, max]` by `frac` of its span on both sides.
pub fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}
