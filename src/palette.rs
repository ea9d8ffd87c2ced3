// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colour mappers: pure functions from an evaluation result to a pixel.

use crate::errors::Error;
use crate::escape::EvaluationResult;
use image::Rgb;

/// Set membership.
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Points that took longer than the banded threshold to escape.
pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);

/// Pixels the projection gives no point to.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

// Logarithm renormalisation constants of the smooth gradient.
const LOG_SCALE: f64 = 0.333_333_333_33;
const BACKGROUND_SCALE: f64 = 0.307_692_307_692_307_7;

/// How an escape result turns into a colour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorPolicy {
    /// A blue-to-yellow ramp over the first `threshold` iterations,
    /// solid yellow after that, black inside the set.
    Banded {
        /// Iteration count at which the ramp gives way to yellow.
        threshold: usize,
        /// Brightness added per iteration.
        scale: usize,
    },
    /// A continuous gradient from a logarithmically renormalised escape
    /// count, with a cool and a warm half.
    SmoothGradient,
}

impl ColorPolicy {
    /// A banded policy whose ramp is guaranteed to stay in a byte.
    pub fn banded(threshold: usize, scale: usize) -> Result<ColorPolicy, Error> {
        if threshold == 0 || scale == 0 || (threshold - 1) * scale > 255 {
            return Err(Error::InvalidPalette { threshold, scale });
        }
        Ok(ColorPolicy::Banded { threshold, scale })
    }

    /// Colour one result.
    pub fn map_color(&self, result: &EvaluationResult) -> Rgb<u8> {
        match *self {
            ColorPolicy::Banded { threshold, scale } => banded(result, threshold, scale),
            ColorPolicy::SmoothGradient => smooth(result),
        }
    }
}

fn banded(result: &EvaluationResult, threshold: usize, scale: usize) -> Rgb<u8> {
    if !result.escaped {
        BLACK
    } else if result.iterations < threshold {
        let brightness = (result.iterations * scale) as u8;
        Rgb([brightness, brightness, 255 - brightness])
    } else {
        YELLOW
    }
}

/// The renormalised escape count.  Zero for points that never escaped.
pub fn background(result: &EvaluationResult) -> f64 {
    if !result.escaped {
        return 0.0;
    }
    let t1 = ((result.value.re.abs() + 1.0).ln() * LOG_SCALE).ln();
    ((result.iterations as f64) - t1).abs().ln() * BACKGROUND_SCALE
}

fn smooth(result: &EvaluationResult) -> Rgb<u8> {
    let background = background(result);
    // `val` is never above one.  A NaN falls through to zero with the
    // negatives, so `powf` only ever sees [0, 1].
    let mut val = 1.0 - (1.0 - background).abs();
    if val.is_nan() || val < 0.0 {
        val = 0.0;
    }
    if background <= 1.0 {
        Rgb([
            (255.0 * val.powf(4.0)) as u8,
            (255.0 * val.powf(2.5)) as u8,
            (255.0 * val) as u8,
        ])
    } else {
        Rgb([
            (255.0 * val) as u8,
            (255.0 * val.powf(1.5)) as u8,
            (255.0 * val.powf(3.0)) as u8,
        ])
    }
}
