//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle into the half-open range (-pi, pi].
pub fn wrap_pi<T>(value: T) -> T
where
    T: Float
{
    let pi_t = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t = pi_t + pi_t;

    let mut wrapped = rem_euclid(value + pi_t, tau_t) - pi_t;

    // -pi is excluded, the equivalent angle is +pi. The round-off case of
    // rem_euclid can also land just above pi.
    if wrapped <= -pi_t {
        wrapped = wrapped + tau_t;
    }
    if wrapped > pi_t {
        wrapped = wrapped - tau_t;
    }

    wrapped
}
