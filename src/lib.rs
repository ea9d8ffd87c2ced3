#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time renderer for the Mandelbrot family
//!
//! The Mandelbrot set takes a point on the complex plane and repeatedly
//! squares it, adding the original point back in each time, measuring
//! how quickly that number goes to infinity.  This "velocity" is the
//! number used to render the image, and points that never leave make
//! up the black heart of the set.
//!
//! This crate renders that set and a few relatives: the same iteration
//! with a real, non-integral power in place of the square, and a swirl
//! fractal built on an exponential transform.  Every render is the same
//! pipeline: a window on the complex plane is laid over a pixel grid,
//! each pixel's point is iterated by the escape-time evaluator, the
//! result is coloured by a banded or smooth palette, and the colour is
//! written into an image sink (a PPM file, or one frame of an animated
//! GIF).  Animations repeat the scan while zooming the window or
//! stepping the exponent.

pub mod complex;
pub mod errors;
pub mod escape;
pub mod palette;
pub mod planes;
pub mod presets;
pub mod render;
pub mod sink;

pub use errors::Error;
pub use escape::{evaluate, Divergence, EvaluationResult, Formula, IterationConfig, Seed};
pub use palette::ColorPolicy;
pub use planes::{Pixel, PlaneWindow, Projection, ScanParameters};
pub use presets::{Job, Preset};
pub use render::{FrameSweep, Renderer, SweepRule};
pub use sink::{create_sink, GifSink, ImageSink, OutputFormat, PpmSink};
