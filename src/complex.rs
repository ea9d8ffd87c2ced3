// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The handful of complex operations the escape-time formulas need.
//! `num::Complex` already provides the arithmetic; these wrap it with
//! the exact evaluation order the renderers depend on.

use num::Complex;
use std::f64::consts::FRAC_PI_2;

/// Standard complex addition.
#[inline]
pub fn add(a: Complex<f64>, b: Complex<f64>) -> Complex<f64> {
    a + b
}

/// Standard complex multiplication.
#[inline]
pub fn multiply(a: Complex<f64>, b: Complex<f64>) -> Complex<f64> {
    a * b
}

/// The square of the modulus.  Avoids the square root on the hot path.
#[inline]
pub fn abs_squared(z: Complex<f64>) -> f64 {
    z.re * z.re + z.im * z.im
}

/// Raise `z` to a real, possibly non-integral, exponent by way of the
/// polar form.  The magnitude is computed as `exp(exponent * ln|z|)`,
/// so a zero modulus is handled before it can reach the logarithm.
pub fn power(z: Complex<f64>, exponent: f64) -> Complex<f64> {
    let modulus = abs_squared(z).sqrt();
    if modulus == 0.0 {
        return if exponent > 0.0 {
            Complex::new(0.0, 0.0)
        } else if exponent == 0.0 {
            Complex::new(1.0, 0.0)
        } else {
            Complex::new(std::f64::INFINITY, 0.0)
        };
    }
    let angle = z.im.atan2(z.re);
    let magnitude = (exponent * modulus.ln()).exp();
    let turn = exponent * angle;
    Complex::new(magnitude * turn.cos(), magnitude * turn.sin())
}

/// `(π/2)·(e^re·cos(im) − re, e^re·sin(im) − im)`.  Not the complex
/// exponential; the swirl fractal is defined on this exact transform.
pub fn exponential_transform(z: Complex<f64>) -> Complex<f64> {
    let exp_re = z.re.exp();
    Complex::new(
        FRAC_PI_2 * (exp_re * z.im.cos() - z.re),
        FRAC_PI_2 * (exp_re * z.im.sin() - z.im),
    )
}
