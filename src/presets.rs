// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Named configurations.  Each preset reproduces one of the classic
//! renders: its image size, window, formula, iteration cap, palette,
//! animation and container.  A `Job` is a preset made concrete, and
//! the command line edits a job before running it.

use crate::errors::Error;
use crate::escape::{Divergence, Formula, IterationConfig, Seed};
use crate::palette::ColorPolicy;
use crate::planes::{PlaneWindow, Projection, ScanParameters};
use crate::render::{FrameSweep, Renderer, SweepRule};
use crate::sink::{create_sink, OutputFormat};
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

/// Hundredths of a second each animation frame is shown.
pub const FRAME_DELAY: u32 = 2;

/// The catalogue of renders.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Preset {
    /// Banded Mandelbrot set around -0.8, seeded at the pixel.
    Classic,
    /// Banded Mandelbrot set over [-3, 1] x [-2, 2], seeded at zero.
    Plain,
    /// A thousand-frame smooth-gradient dive into the seahorse valley.
    Zoom,
    /// Smooth-gradient animation of `z^r + c` for r from 1 to 11.
    Power,
    /// The exponential swirl fractal.
    Swipecat,
    /// The swirl fractal over the whole plane, squeezed into the unit
    /// disk.
    SwipecatDisk,
}

impl Preset {
    /// Every preset, in catalogue order.
    pub const ALL: [Preset; 6] = [
        Preset::Classic,
        Preset::Plain,
        Preset::Zoom,
        Preset::Power,
        Preset::Swipecat,
        Preset::SwipecatDisk,
    ];

    /// The name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Plain => "plain",
            Preset::Zoom => "zoom",
            Preset::Power => "power",
            Preset::Swipecat => "swipecat",
            Preset::SwipecatDisk => "swipecat-disk",
        }
    }

    /// Build the job this preset describes.
    pub fn job(&self) -> Result<Job, Error> {
        match self {
            Preset::Classic => {
                let size = 1024;
                let scale = 2.0 / (0.65 * (size as f64));
                let window = PlaneWindow::from_scale(Complex::new(-0.8, 0.0), scale, size, size)?;
                Ok(Job {
                    scan: ScanParameters::new(size, size, window)?,
                    config: IterationConfig::new(Formula::Quadratic, Divergence::Modulus(4.0), 255)?
                        .seeded_at(Seed::Pixel),
                    policy: ColorPolicy::banded(64, 4)?,
                    sweep: FrameSweep::single(),
                    format: OutputFormat::Ppm,
                    output: PathBuf::from("mandelbrot_set_001.ppm"),
                    delay: FRAME_DELAY,
                })
            }
            Preset::Plain => Ok(Job {
                scan: ScanParameters::new(1024, 1024, PlaneWindow::new(-3.0, 1.0, -2.0, 2.0)?)?,
                config: IterationConfig::new(Formula::Quadratic, Divergence::Modulus(4.0), 255)?,
                policy: ColorPolicy::banded(64, 4)?,
                sweep: FrameSweep::single(),
                format: OutputFormat::Ppm,
                output: PathBuf::from("mandelbrot_set_002.ppm"),
                delay: FRAME_DELAY,
            }),
            Preset::Zoom => {
                let center = Complex::new(0.001_643_721_971_153, -0.822_467_633_298_876);
                let half = 3.0;
                Ok(Job {
                    scan: ScanParameters::new(256, 256, PlaneWindow::around(center, half, half)?)?,
                    config: IterationConfig::new(
                        Formula::Quadratic,
                        Divergence::RealPart(4.0),
                        255,
                    )?,
                    policy: ColorPolicy::SmoothGradient,
                    sweep: FrameSweep {
                        frames: 1000,
                        rule: SweepRule::Zoom {
                            center,
                            half_width: half,
                            half_height: half,
                            factor: 0.95,
                        },
                    },
                    format: OutputFormat::Gif,
                    output: PathBuf::from("mandelbrot_set_gif_001.gif"),
                    delay: FRAME_DELAY,
                })
            }
            Preset::Power => {
                let frames = 500;
                let window = PlaneWindow::around(Complex::new(0.0, 0.0), 2.0, 2.0)?;
                Ok(Job {
                    scan: ScanParameters::new(512, 512, window)?,
                    config: IterationConfig::new(
                        Formula::Power(1.0),
                        Divergence::RealPart(4.0),
                        255,
                    )?,
                    policy: ColorPolicy::SmoothGradient,
                    sweep: FrameSweep {
                        frames,
                        rule: SweepRule::Exponent(10.0 / (frames as f64)),
                    },
                    format: OutputFormat::Gif,
                    output: PathBuf::from("mandelbrot_set_gif_002.gif"),
                    delay: FRAME_DELAY,
                })
            }
            Preset::Swipecat => Ok(Job {
                scan: ScanParameters::new(1200, 960, PlaneWindow::new(-6.6, -0.4, -3.1, 3.1)?)?,
                config: IterationConfig::new(
                    Formula::Exponential,
                    Divergence::RealPart(150.0),
                    100,
                )?,
                policy: ColorPolicy::SmoothGradient,
                sweep: FrameSweep::single(),
                format: OutputFormat::Ppm,
                output: PathBuf::from("swipecat_fractal_001.ppm"),
                delay: FRAME_DELAY,
            }),
            Preset::SwipecatDisk => Ok(Job {
                scan: ScanParameters::new(2048, 2048, PlaneWindow::new(-1.0, 1.0, -1.0, 1.0)?)?
                    .with_projection(Projection::UnitDisk),
                config: IterationConfig::new(
                    Formula::Exponential,
                    Divergence::RealPart(150.0),
                    100,
                )?,
                policy: ColorPolicy::SmoothGradient,
                sweep: FrameSweep::single(),
                format: OutputFormat::PlainPpm,
                output: PathBuf::from("swipecat_fractal.ppm"),
                delay: FRAME_DELAY,
            }),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .iter()
            .find(|preset| preset.name() == s)
            .cloned()
            .ok_or_else(|| format!("unknown preset '{}'", s))
    }
}

/// A complete, runnable description of a render.
#[derive(Clone, Debug)]
pub struct Job {
    /// Grid, window and projection of the first frame.
    pub scan: ScanParameters,
    /// Formula, seed, divergence test and iteration cap.
    pub config: IterationConfig,
    /// Colour mapper.
    pub policy: ColorPolicy,
    /// Frame count and per-frame update.
    pub sweep: FrameSweep,
    /// Container.
    pub format: OutputFormat,
    /// Destination file.
    pub output: PathBuf,
    /// GIF frame delay, in hundredths of a second.
    pub delay: u32,
}

impl Job {
    /// Open the destination, then render every frame into it.  Nothing
    /// is computed if the destination cannot be created.
    pub fn run(&self, threads: usize) -> Result<(), Error> {
        let mut sink = create_sink(self.format, &self.output, self.delay)?;
        let mut renderer = Renderer::new(self.scan, self.config, self.policy);
        renderer.render_sweep(&self.sweep, sink.as_mut(), threads)?;
        sink.finish()
    }
}
