// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The one error type of the renderer.  Only `SinkOpen` can happen in
//! a correctly configured run; everything else is a configuration
//! mistake caught before the first pixel, or an I/O failure while
//! writing.

use failure::Fail;
use std::io;

/// Everything that can go wrong while configuring or running a render.
#[derive(Debug, Fail)]
pub enum Error {
    /// The output destination could not be created.
    #[fail(display = "could not open {}: {}", path, cause)]
    SinkOpen {
        /// Where we tried to write.
        path: String,
        /// What the operating system said.
        #[fail(cause)]
        cause: io::Error,
    },

    /// Writing to an already opened sink failed.
    #[fail(display = "write failed: {}", _0)]
    Io(#[fail(cause)] io::Error),

    /// The image encoder rejected a frame.
    #[fail(display = "could not encode frame: {}", _0)]
    Encode(#[fail(cause)] image::ImageError),

    /// The window on the complex plane is empty, inverted, or not finite.
    #[fail(display = "invalid plane window: {}", _0)]
    InvalidWindow(&'static str),

    /// The pixel grid is too small to derive a step from.
    #[fail(
        display = "image must be at least 2x2 pixels, got {}x{}",
        width, height
    )]
    InvalidSize {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// The pixel grid has a side the image encoders cannot address.
    #[fail(display = "image of {}x{} pixels is too large to encode", width, height)]
    OversizeImage {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A zero iteration cap.
    #[fail(display = "the iteration cap must be at least 1")]
    InvalidIterations,

    /// A banded palette whose brightness would leave 0..=255.
    #[fail(
        display = "banded palette threshold {} with scale {} does not fit in a byte",
        threshold, scale
    )]
    InvalidPalette {
        /// Iteration count at which the palette turns solid.
        threshold: usize,
        /// Brightness per iteration.
        scale: usize,
    },

    /// An exponent sweep was asked of a formula that has no exponent.
    #[fail(display = "an exponent sweep requires the complex-power formula")]
    SweepMismatch,

    /// A sink received a different number of pixels than the frame holds.
    #[fail(display = "frame expected {} pixels, got {}", expected, got)]
    FrameSize {
        /// Pixels announced by `begin_frame`.
        expected: usize,
        /// Pixels actually written.
        got: usize,
    },

    /// A scan worker thread panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanic,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Encode(err)
    }
}
