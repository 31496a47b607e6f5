//! Numeric helpers shared by processes.

/// Default floor used by [`zero_fun`].
pub const ZERO_FUN_DELTA: f64 = 1e-11;

/// Smooth positive floor for denominators.
///
/// Returns `x` unchanged when `x >= delta`. Below `delta` the result
/// decays smoothly towards `delta / 2` instead of reaching zero, so
/// `y / zero_fun(x, delta)` is always finite and remains differentiable
/// in `x` for gradient-based estimators.
pub fn zero_fun(x: f64, delta: f64) -> f64 {
    if x >= delta {
        x
    } else {
        delta / (2.0 - x / delta)
    }
}
