// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! Every renderer in this crate takes a point `c` on the complex plane
//! and repeatedly applies some update `z -> f(z) + c`, measuring how
//! quickly `z` runs off towards infinity.  The number of updates it
//! survives, and where it was when it left, are all the colour mapper
//! gets to see.
//!
//! Three updates are supported: the classic quadratic, a generalised
//! real power, and the exponential transform behind the swirl images.
//! Two divergence tests are supported as well, because the renderers
//! genuinely disagree about what "escaped" means: the plain Mandelbrot
//! images test the modulus against a radius, while the animated and
//! swirl images only look at the real component.

use crate::complex::{abs_squared, add, exponential_transform, power};
use crate::errors::Error;
use num::Complex;

/// The update applied to `z` on every iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Formula {
    /// `z*z + c`.
    Quadratic,
    /// `z^exponent + c`, through the polar form.
    Power(f64),
    /// `exponential_transform(z) + c`.
    Exponential,
}

/// When a point counts as having left.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Divergence {
    /// `|z|² > radius²`.
    Modulus(f64),
    /// `|re(z)| >= threshold`.
    RealPart(f64),
}

impl Divergence {
    #[inline]
    fn escaped(&self, z: Complex<f64>) -> bool {
        match *self {
            Divergence::Modulus(radius) => abs_squared(z) > radius * radius,
            Divergence::RealPart(threshold) => z.re.abs() >= threshold,
        }
    }
}

/// Where `z` starts.  Both conventions occur in the wild and produce
/// visibly different images.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Seed {
    /// `z = 0`.
    Origin,
    /// `z = c`, one iteration ahead of `Origin` for the quadratic.
    Pixel,
}

/// Everything the evaluator needs besides the point itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationConfig {
    max_iterations: usize,
    /// The escape test.
    pub divergence: Divergence,
    /// The update rule.
    pub formula: Formula,
    /// The starting value of `z`.
    pub seed: Seed,
}

impl IterationConfig {
    /// Constructor.  Starts at the origin; see `seeded_at`.
    pub fn new(
        formula: Formula,
        divergence: Divergence,
        max_iterations: usize,
    ) -> Result<IterationConfig, Error> {
        if max_iterations == 0 {
            return Err(Error::InvalidIterations);
        }
        Ok(IterationConfig {
            max_iterations,
            divergence,
            formula,
            seed: Seed::Origin,
        })
    }

    /// Change the seed convention.
    pub fn seeded_at(mut self, seed: Seed) -> IterationConfig {
        self.seed = seed;
        self
    }

    /// Same config, another iteration cap.
    pub fn with_max_iterations(self, max_iterations: usize) -> Result<IterationConfig, Error> {
        IterationConfig::new(self.formula, self.divergence, max_iterations)
            .map(|config| config.seeded_at(self.seed))
    }

    /// The iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

/// What happened to one point.  Produced per pixel and consumed
/// immediately by the colour mapper.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EvaluationResult {
    /// The index of the update that escaped, or the cap if none did.
    pub iterations: usize,
    /// `z` after the escaping update, or after the last update.
    pub value: Complex<f64>,
    /// Whether the divergence test ever fired.
    pub escaped: bool,
}

#[inline]
fn step(formula: Formula, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
    match formula {
        // Spelled out rather than `z * z + c` so the rounding matches
        // the two-product form exactly.
        Formula::Quadratic => Complex::new(
            z.re * z.re - z.im * z.im + c.re,
            2.0 * z.re * z.im + c.im,
        ),
        Formula::Power(exponent) => add(power(z, exponent), c),
        Formula::Exponential => add(exponential_transform(z), c),
    }
}

/// Iterate `point` under `config`.  A point that escapes on its very
/// first update reports zero iterations.
pub fn evaluate(point: Complex<f64>, config: &IterationConfig) -> EvaluationResult {
    let mut z = match config.seed {
        Seed::Origin => Complex::new(0.0, 0.0),
        Seed::Pixel => point,
    };
    for i in 0..config.max_iterations {
        z = step(config.formula, z, point);
        if config.divergence.escaped(z) {
            return EvaluationResult {
                iterations: i,
                value: z,
                escaped: true,
            };
        }
    }
    EvaluationResult {
        iterations: config.max_iterations,
        value: z,
        escaped: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(seed: Seed) -> IterationConfig {
        IterationConfig::new(Formula::Quadratic, Divergence::Modulus(4.0), 255)
            .unwrap()
            .seeded_at(seed)
    }

    #[test]
    fn zero_iterations_are_refused() {
        assert!(IterationConfig::new(Formula::Quadratic, Divergence::Modulus(2.0), 0).is_err());
    }

    #[test]
    fn period_two_bulb_never_escapes() {
        let point = Complex::new(-0.8, 0.0);
        for seed in &[Seed::Origin, Seed::Pixel] {
            let result = evaluate(point, &quadratic(*seed));
            assert!(!result.escaped);
            assert_eq!(result.iterations, 255);
        }
    }

    #[test]
    fn far_point_escapes_on_the_first_update() {
        let result = evaluate(Complex::new(2.0, 2.0), &quadratic(Seed::Pixel));
        assert!(result.escaped);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.value, Complex::new(2.0, 10.0));
    }

    #[test]
    fn origin_seed_runs_one_update_behind() {
        // 2+2i has |z|² = 8 after one update, under the radius of 4.
        let result = evaluate(Complex::new(2.0, 2.0), &quadratic(Seed::Origin));
        assert!(result.escaped);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn real_part_test_ignores_the_imaginary_axis() {
        let config =
            IterationConfig::new(Formula::Quadratic, Divergence::RealPart(4.0), 10).unwrap();
        // 0+3i goes to 0+3i, then -9+3i.
        let result = evaluate(Complex::new(0.0, 3.0), &config);
        assert!(result.escaped);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.value, Complex::new(-9.0, 3.0));
    }

    #[test]
    fn power_two_agrees_with_quadratic() {
        let square =
            IterationConfig::new(Formula::Power(2.0), Divergence::Modulus(4.0), 255).unwrap();
        for point in &[
            Complex::new(1.0, 1.0),
            Complex::new(-1.5, 1.0),
            Complex::new(0.26, 0.0),
            Complex::new(-0.1, 0.1),
        ] {
            let expected = evaluate(*point, &quadratic(Seed::Origin));
            let actual = evaluate(*point, &square);
            assert_eq!(expected.escaped, actual.escaped);
            assert_eq!(expected.iterations, actual.iterations);
        }
    }

    #[test]
    fn power_from_the_origin_stays_finite() {
        let config =
            IterationConfig::new(Formula::Power(1.5), Divergence::RealPart(4.0), 50).unwrap();
        let result = evaluate(Complex::new(0.0, 0.0), &config);
        assert!(!result.value.re.is_nan());
        assert!(!result.escaped);
    }

    #[test]
    fn exponential_leaves_quickly_on_the_positive_axis() {
        let config =
            IterationConfig::new(Formula::Exponential, Divergence::RealPart(150.0), 100).unwrap();
        let right = evaluate(Complex::new(3.0, 0.0), &config);
        assert!(right.escaped);
        assert!(right.iterations < 5);
        assert!(right.value.re.abs() >= 150.0);
    }

    #[test]
    fn non_escaping_result_reports_the_cap() {
        let config = IterationConfig::new(Formula::Quadratic, Divergence::Modulus(4.0), 7).unwrap();
        let result = evaluate(Complex::new(0.0, 0.0), &config);
        assert_eq!(result.iterations, 7);
        assert_eq!(result.value, Complex::new(0.0, 0.0));
    }
}
