#[cfg(test)]
mod tests {
    use crate::math::*;
    use num_complex::Complex;

    #[test]
    fn test_sqrt_single_precision_snaps() {
        // f32 has a much coarser epsilon, the correction scales with it
        let r = complex_sqrt(Complex::new(-4.0f32, 0.0));
        assert_eq!(r.re, 0.0);
        assert_eq!(r.im, 2.0);
    }

    #[test]
    fn test_sqrt_negative_zero_imaginary_is_principal() {
        // a negated real carries -0.0, the root is still the upper one
        let r = complex_sqrt(Complex::new(-9.0f64, -0.0));
        assert_eq!(r.re, 0.0);
        assert_eq!(r.im, 3.0);
        let p = complex_power(Complex::new(-4.0f64, -0.0), Complex::new(0.5, 0.0));
        assert_eq!(p, Complex::new(0.0, 2.0));
        let q = complex_power(Complex::new(-8.0f64, -0.0), Complex::new(1.0 / 3.0, 0.0));
        assert!(q.im > 0.0);
    }

    #[test]
    fn test_negation_drops_signed_zero() {
        let n = negate_complex(Complex::new(4.0f64, 0.0));
        assert_eq!(n, Complex::new(-4.0, 0.0));
        assert!(n.im.is_sign_positive());
    }

    #[test]
    fn test_nan_survives_corrections() {
        let nan = complex_nan::<f64>();
        assert!(is_complex_nan(complex_sqrt(nan)));
        assert!(is_complex_nan(
            truncate_real_or_imaginary_part_according_to_argument(nan, 1.0)
        ));
        assert!(is_complex_nan(complex_power(nan, Complex::new(2.0, 0.0))));
        assert!(is_complex_nan(complex_power(Complex::new(2.0, 0.0), nan)));
    }

    #[test]
    fn test_fractional_power_of_negative_real() {
        // (-8)^(1/3) principal value is 1 + i*sqrt(3)
        let r = complex_power(Complex::new(-8.0f64, 0.0), Complex::new(1.0 / 3.0, 0.0));
        assert!((r.re - 1.0).abs() < 1e-12);
        assert!((r.im - 3.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_large_magnitude_argument_widens_tolerance() {
        // argument residue of 1e-14 is noise next to an input argument of 100
        let c = Complex::from_polar(2.0f64, 1e-14);
        let fixed = truncate_real_or_imaginary_part_according_to_argument(c, 100.0);
        assert_eq!(fixed.im, 0.0);
        let kept = truncate_real_or_imaginary_part_according_to_argument(c, 0.1);
        assert!(kept.im != 0.0);
    }
}
