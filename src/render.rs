// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The scan driver.
//!
//! A render visits every pixel of the grid, top row first and left to
//! right, maps it onto the complex plane, runs the evaluator, colours
//! the result and hands the colour to the sink before moving on.  The
//! order of the pixels is part of the output format, so even the
//! threaded variant only computes in parallel; it still emits the frame
//! sequentially once every band is finished.
//!
//! An animation is a sequence of such scans, with the window or the
//! formula's exponent nudged between frames.

use itertools::iproduct;
use log::{debug, info};

use crate::errors::Error;
use crate::escape::{evaluate, Formula, IterationConfig};
use crate::palette::{ColorPolicy, BLACK, WHITE};
use crate::planes::{Pixel, PlaneWindow, ScanParameters};
use crate::sink::ImageSink;
use image::Rgb;
use num::Complex;

/// What changes between the frames of an animation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SweepRule {
    /// Nothing; every frame is the same.
    Still,
    /// Dive into a fixed point.  Every frame's window is rebuilt from
    /// `center` and the half extents, which shrink by `factor` after
    /// each frame.
    Zoom {
        /// The point the animation dives into.
        center: Complex<f64>,
        /// Half the width of the next frame's window.
        half_width: f64,
        /// Half the height of the next frame's window.
        half_height: f64,
        /// Applied to both half extents after every frame.
        factor: f64,
    },
    /// Add this to the complex-power exponent.
    Exponent(f64),
}

impl SweepRule {
    /// A zoom that starts from `window` and dives into its midpoint.
    pub fn zoom(window: &PlaneWindow, factor: f64) -> SweepRule {
        SweepRule::Zoom {
            center: window.center(),
            half_width: (window.x_max - window.x_min) / 2.0,
            half_height: (window.y_max - window.y_min) / 2.0,
            factor,
        }
    }
}

/// The frame count of an animation and how it evolves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameSweep {
    /// Number of frames to render.
    pub frames: usize,
    /// Applied after every frame.
    pub rule: SweepRule,
}

impl FrameSweep {
    /// A single still frame.
    pub fn single() -> FrameSweep {
        FrameSweep {
            frames: 1,
            rule: SweepRule::Still,
        }
    }
}

/// Holds everything a frame needs.  Only an animation changes it, and
/// only between frames.
#[derive(Debug)]
pub struct Renderer {
    scan: ScanParameters,
    config: IterationConfig,
    policy: ColorPolicy,
}

impl Renderer {
    /// Constructor.
    pub fn new(scan: ScanParameters, config: IterationConfig, policy: ColorPolicy) -> Self {
        Renderer {
            scan,
            config,
            policy,
        }
    }

    /// The grid and window of the next frame.
    pub fn scan(&self) -> &ScanParameters {
        &self.scan
    }

    /// The iteration settings of the next frame.
    pub fn config(&self) -> &IterationConfig {
        &self.config
    }

    /// Evaluate and colour a single pixel.
    pub fn shade(&self, pixel: &Pixel) -> Rgb<u8> {
        match self.scan.pixel_to_point(pixel) {
            Some(point) => self.policy.map_color(&evaluate(point, &self.config)),
            None => WHITE,
        }
    }

    /// Render one frame into `sink`, writing each pixel as soon as it
    /// is computed.
    pub fn render_frame<S: ImageSink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        let (width, height) = self.scan.dimensions();
        sink.begin_frame(width, height)?;
        for (row, column) in iproduct!(0..self.scan.height(), 0..self.scan.width()) {
            sink.write_pixel(self.shade(&Pixel(column, row)))?;
        }
        sink.end_frame()
    }

    /// Render one frame with `threads` workers, each taking a band of
    /// whole rows, then write the frame to `sink` in scan order.  The
    /// bytes that reach the sink are the same as `render_frame`'s.
    pub fn render_frame_threaded<S: ImageSink + ?Sized>(
        &self,
        sink: &mut S,
        threads: usize,
    ) -> Result<(), Error> {
        let threads = threads.max(1);
        if threads == 1 {
            return self.render_frame(sink);
        }

        let width = self.scan.width();
        let band_rows = (self.scan.height() + threads - 1) / threads;
        let mut pixels = vec![BLACK; self.scan.len()];

        crossbeam::scope(|spawner| {
            for (band, region) in pixels.chunks_mut(band_rows * width).enumerate() {
                let top = band * band_rows;
                spawner.spawn(move |_| {
                    for (offset, slot) in region.iter_mut().enumerate() {
                        *slot = self.shade(&Pixel(offset % width, top + offset / width));
                    }
                });
            }
        })
        .map_err(|_| Error::WorkerPanic)?;

        let (width, height) = self.scan.dimensions();
        sink.begin_frame(width, height)?;
        for pixel in pixels {
            sink.write_pixel(pixel)?;
        }
        sink.end_frame()
    }

    fn focus(
        &mut self,
        center: Complex<f64>,
        half_width: f64,
        half_height: f64,
    ) -> Result<(), Error> {
        let window = PlaneWindow::focused(center, half_width, half_height)?;
        self.scan = self.scan.with_window(window)?;
        Ok(())
    }

    fn advance(&mut self, rule: &mut SweepRule) -> Result<(), Error> {
        match rule {
            SweepRule::Still => {}
            SweepRule::Zoom {
                center,
                half_width,
                half_height,
                factor,
            } => {
                *half_width *= *factor;
                *half_height *= *factor;
                self.focus(*center, *half_width, *half_height)?;
            }
            SweepRule::Exponent(delta) => match self.config.formula {
                Formula::Power(exponent) => {
                    self.config.formula = Formula::Power(exponent + *delta);
                }
                _ => return Err(Error::SweepMismatch),
            },
        }
        Ok(())
    }

    /// Render every frame of `sweep` into `sink`, evolving the window
    /// or exponent after each one.  A zoom replaces the current window
    /// with its own from the first frame on.  The sink is not finished.
    pub fn render_sweep<S: ImageSink + ?Sized>(
        &mut self,
        sweep: &FrameSweep,
        sink: &mut S,
        threads: usize,
    ) -> Result<(), Error> {
        let has_exponent = match self.config.formula {
            Formula::Power(_) => true,
            _ => false,
        };
        if let SweepRule::Exponent(_) = sweep.rule {
            if !has_exponent {
                return Err(Error::SweepMismatch);
            }
        }
        let mut rule = sweep.rule;
        if let SweepRule::Zoom {
            center,
            half_width,
            half_height,
            ..
        } = rule
        {
            self.focus(center, half_width, half_height)?;
        }
        for frame in 0..sweep.frames {
            info!("Writing frame {}...", frame);
            debug!(
                "window {:?}, formula {:?}",
                self.scan.window(),
                self.config.formula
            );
            self.render_frame_threaded(sink, threads)?;
            self.advance(&mut rule)?;
        }
        Ok(())
    }
}
