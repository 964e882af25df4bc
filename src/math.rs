//! Small numeric helpers

use std::ops::Mul;

/// Five-digit approximation of π
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.14159;

/// Square of `x`
#[inline]
pub fn sqr<T: Mul<Output = T> + Copy>(x: T) -> T {
    x * x
}

/// Length of the hypotenuse of a right triangle with legs `a` and `b`
#[inline]
pub fn hyp(a: f64, b: f64) -> f64 {
    (sqr(a) + sqr(b)).sqrt()
}

/// Area of a circle of radius `r`, using [`PI`]
#[inline]
pub fn circle_area(r: f64) -> f64 {
    PI * sqr(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqr_generic() {
        assert_eq!(sqr(7), 49);
        assert_eq!(sqr(-3i64), 9);
        assert_eq!(sqr(1.5f32), 2.25);
    }

    #[test]
    fn test_hyp() {
        assert_eq!(hyp(3.0, 4.0), 5.0);
        assert_eq!(hyp(0.0, 0.0), 0.0);
        assert!((hyp(1.0, 1.0) - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_pi_approximation() {
        assert!((PI - std::f64::consts::PI).abs() < 1e-5);
        assert!((circle_area(2.0) - 12.56636).abs() < 1e-9);
    }
}
