//! # Utility Module
//!
//! Floating point helpers shared by the geometry and BSP code. Map geometry
//! lives in `f64` space, so almost every comparison in the partitioner goes
//! through one of these instead of `==`.

/// The default tolerance used by the geometric predicates.
pub const DEFAULT_EPSILON: f64 = 0.000001;

/// Checks whether a value is within `epsilon` of zero.
///
/// # Examples
///
/// ```
/// use rusted_bsp::utils::util::approx_zero;
///
/// assert!(approx_zero(0.0000001, 0.000001));
/// assert!(!approx_zero(0.5, 0.000001));
/// ```
pub fn approx_zero(value: f64, epsilon: f64) -> bool {
    -epsilon < value && value < epsilon
}

/// Checks whether two values are within `epsilon` of each other.
pub fn approx_equals(value: f64, target: f64, epsilon: f64) -> bool {
    value >= target - epsilon && value <= target + epsilon
}

/// True when one value is strictly positive and the other strictly negative.
/// Zero never has a different sign from anything.
pub fn different_sign(first: f64, second: f64) -> bool {
    first * second < 0.0
}

/// Checks if a time value lies in the closed `[0, 1]` range of a segment.
pub fn in_normal_range(t: f64) -> bool {
    (0.0..=1.0).contains(&t)
}
