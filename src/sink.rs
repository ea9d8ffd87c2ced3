// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image sinks.  The scan driver hands pixels over one at a time, in
//! row-major order, and never learns what container they end up in.

use crate::errors::Error;
use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, Delay, Frame, ImageEncoder, Rgb, RgbaImage};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

// NeuQuant sampling factor for GIF palettes; 1 is best and slowest, 30
// is fastest.
const GIF_SPEED: i32 = 10;

/// Anything that accepts a stream of frames, pixel by pixel.
pub trait ImageSink {
    /// Announce a frame of `width` by `height` pixels.
    fn begin_frame(&mut self, width: u32, height: u32) -> Result<(), Error>;
    /// Append the next pixel of the current frame.
    fn write_pixel(&mut self, pixel: Rgb<u8>) -> Result<(), Error>;
    /// Close the current frame.  Fails if it is short or long.
    fn end_frame(&mut self) -> Result<(), Error>;
    /// Flush and finalise the container.  The sink is spent afterwards.
    fn finish(&mut self) -> Result<(), Error>;
}

/// The containers the renderer knows how to write.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// Binary pixmap, `P6`.
    Ppm,
    /// Plain text pixmap, `P3`.
    PlainPpm,
    /// Animated GIF.
    Gif,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ppm" => Ok(OutputFormat::Ppm),
            "plain" => Ok(OutputFormat::PlainPpm),
            "gif" => Ok(OutputFormat::Gif),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

fn frame_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}

/// Writes every frame as a complete pixmap.  Several frames make a
/// stream of concatenated images, which netpbm readers accept.  Binary
/// frames start with the `P6\n{width} {height}\n255\n` header; plain
/// frames are left to the PNM encoder.
pub struct PpmSink<W: Write> {
    writer: W,
    encoding: SampleEncoding,
    size: (u32, u32),
    pixels: Vec<u8>,
}

impl<W: Write> PpmSink<W> {
    /// Binary (`P6`) pixmaps on `writer`.
    pub fn new(writer: W) -> Self {
        PpmSink::with_encoding(writer, SampleEncoding::Binary)
    }

    /// Pixmaps with the given sample encoding on `writer`.
    pub fn with_encoding(writer: W, encoding: SampleEncoding) -> Self {
        PpmSink {
            writer,
            encoding,
            size: (0, 0),
            pixels: Vec::new(),
        }
    }

    /// Give the writer back.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ImageSink for PpmSink<W> {
    fn begin_frame(&mut self, width: u32, height: u32) -> Result<(), Error> {
        self.size = (width, height);
        self.pixels.clear();
        self.pixels.reserve(frame_len(width, height) * 3);
        Ok(())
    }

    fn write_pixel(&mut self, pixel: Rgb<u8>) -> Result<(), Error> {
        self.pixels.extend_from_slice(&pixel.0);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), Error> {
        let expected = frame_len(self.size.0, self.size.1);
        if self.pixels.len() != expected * 3 {
            return Err(Error::FrameSize {
                expected,
                got: self.pixels.len() / 3,
            });
        }
        let (width, height) = self.size;
        match self.encoding {
            SampleEncoding::Binary => {
                write!(self.writer, "P6\n{} {}\n255\n", width, height)?;
                self.writer.write_all(&self.pixels)?;
            }
            SampleEncoding::Ascii => {
                PnmEncoder::new(&mut self.writer)
                    .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Ascii))
                    .write_image(&self.pixels, width, height, ColorType::Rgb8)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.writer.flush()?;
        Ok(())
    }
}

/// The writer the GIF encoder owns.  The sink keeps its own handle on
/// the inner writer so it can flush it, and the first write failure is
/// kept because the encoder ignores errors while writing its trailer on
/// drop.
struct SharedWriter<W> {
    inner: Rc<RefCell<W>>,
    failure: Rc<RefCell<Option<io::Error>>>,
}

impl<W> SharedWriter<W> {
    fn remember<T>(&self, result: io::Result<T>) -> io::Result<T> {
        if let Err(ref err) = result {
            let mut failure = self.failure.borrow_mut();
            if failure.is_none() && err.kind() != io::ErrorKind::Interrupted {
                *failure = Some(io::Error::new(err.kind(), err.to_string()));
            }
        }
        result
    }
}

impl<W: Write> Write for SharedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.borrow_mut().write(buf);
        self.remember(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.inner.borrow_mut().flush();
        self.remember(result)
    }
}

/// Encodes every frame into one looping GIF animation.
pub struct GifSink<W: Write> {
    encoder: Option<GifEncoder<SharedWriter<W>>>,
    writer: Rc<RefCell<W>>,
    failure: Rc<RefCell<Option<io::Error>>>,
    delay: Delay,
    size: (u32, u32),
    pixels: Vec<u8>,
}

impl<W: Write> GifSink<W> {
    /// An animation on `writer` showing each frame for `delay`
    /// hundredths of a second.
    pub fn new(writer: W, delay: u32) -> Result<Self, Error> {
        let writer = Rc::new(RefCell::new(writer));
        let failure = Rc::new(RefCell::new(None));
        let shared = SharedWriter {
            inner: Rc::clone(&writer),
            failure: Rc::clone(&failure),
        };
        let mut encoder = GifEncoder::new_with_speed(shared, GIF_SPEED);
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(GifSink {
            encoder: Some(encoder),
            writer,
            failure,
            delay: Delay::from_numer_denom_ms(delay * 10, 1),
            size: (0, 0),
            pixels: Vec::new(),
        })
    }
}

impl<W: Write> ImageSink for GifSink<W> {
    fn begin_frame(&mut self, width: u32, height: u32) -> Result<(), Error> {
        self.size = (width, height);
        self.pixels.clear();
        self.pixels.reserve(frame_len(width, height) * 4);
        Ok(())
    }

    fn write_pixel(&mut self, pixel: Rgb<u8>) -> Result<(), Error> {
        self.pixels.extend_from_slice(&pixel.0);
        self.pixels.push(255);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), Error> {
        let expected = frame_len(self.size.0, self.size.1);
        let pixels = std::mem::take(&mut self.pixels);
        let got = pixels.len() / 4;
        let buffer = match RgbaImage::from_raw(self.size.0, self.size.1, pixels) {
            Some(buffer) if got == expected => buffer,
            _ => return Err(Error::FrameSize { expected, got }),
        };
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.encode_frame(Frame::from_parts(buffer, 0, 0, self.delay))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        // Dropping the encoder writes the trailer.
        self.encoder.take();
        if let Some(cause) = self.failure.borrow_mut().take() {
            return Err(Error::Io(cause));
        }
        self.writer.borrow_mut().flush()?;
        Ok(())
    }
}

/// Create `path` and wrap it in the sink for `format`.  This is the
/// only place a render can fail for reasons outside its configuration,
/// and it happens before any pixel is computed.
pub fn create_sink(
    format: OutputFormat,
    path: &Path,
    delay: u32,
) -> Result<Box<dyn ImageSink>, Error> {
    let file = File::create(path).map_err(|cause| Error::SinkOpen {
        path: path.display().to_string(),
        cause,
    })?;
    let writer = BufWriter::new(file);
    Ok(match format {
        OutputFormat::Ppm => Box::new(PpmSink::new(writer)),
        OutputFormat::PlainPpm => Box::new(PpmSink::with_encoding(writer, SampleEncoding::Ascii)),
        OutputFormat::Gif => Box::new(GifSink::new(writer, delay)?),
    })
}
