// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Describes the relationship between a rectangle on the integral
//! plane, with an origin at 0,0 in the upper-left corner, and a
//! rectangle on the complex plane.  Row 0 of the integral plane is the
//! top of the image, which is the largest imaginary value of the
//! window.
use crate::complex::abs_squared;
use crate::errors::Error;
use num::Complex;
use std::convert::TryFrom;

/// Describes the x, y of a pixel in the image.  Column first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane visible in one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneWindow {
    /// Real part of the left edge.
    pub x_min: f64,
    /// Real part of the right edge.
    pub x_max: f64,
    /// Imaginary part of the bottom edge.
    pub y_min: f64,
    /// Imaginary part of the top edge.
    pub y_max: f64,
}

impl PlaneWindow {
    /// Constructor.  Refuses windows that are empty, inverted, or not
    /// finite.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<PlaneWindow, Error> {
        if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
            return Err(Error::InvalidWindow("the bounds must be finite"));
        }
        if x_max <= x_min {
            return Err(Error::InvalidWindow(
                "the left edge is not to the left of the right edge",
            ));
        }
        if y_max <= y_min {
            return Err(Error::InvalidWindow("the bottom edge is not below the top edge"));
        }
        Ok(PlaneWindow {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// The window spanned by a left-lower and a right-upper corner.
    pub fn from_corners(
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<PlaneWindow, Error> {
        PlaneWindow::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
    }

    /// The window extending `half_width` and `half_height` either side
    /// of `center`.
    pub fn around(
        center: Complex<f64>,
        half_width: f64,
        half_height: f64,
    ) -> Result<PlaneWindow, Error> {
        PlaneWindow::new(
            center.re - half_width,
            center.re + half_width,
            center.im - half_height,
            center.im + half_height,
        )
    }

    /// The window in which every pixel is `scale` wide and pixel
    /// `(width / 2, height / 2)` lands on `center`.
    pub fn from_scale(
        center: Complex<f64>,
        scale: f64,
        width: usize,
        height: usize,
    ) -> Result<PlaneWindow, Error> {
        let x_min = center.re - scale * ((width / 2) as f64);
        let y_max = center.im + scale * ((height / 2) as f64);
        PlaneWindow::new(
            x_min,
            x_min + scale * ((width.max(1) - 1) as f64),
            y_max - scale * ((height.max(1) - 1) as f64),
            y_max,
        )
    }

    /// The midpoint of the window.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Like `around`, but a window narrower than the resolution of an
    /// `f64` near `center` collapses onto `center` instead of being
    /// refused.  Every pixel of a collapsed window is `center`.
    pub fn focused(
        center: Complex<f64>,
        half_width: f64,
        half_height: f64,
    ) -> Result<PlaneWindow, Error> {
        if !(half_width >= 0.0 && half_height >= 0.0) {
            return Err(Error::InvalidWindow("the half extents must not be negative"));
        }
        let window = PlaneWindow {
            x_min: center.re - half_width,
            x_max: center.re + half_width,
            y_min: center.im - half_height,
            y_max: center.im + half_height,
        };
        if !(window.x_min.is_finite()
            && window.x_max.is_finite()
            && window.y_min.is_finite()
            && window.y_max.is_finite())
        {
            return Err(Error::InvalidWindow("the bounds must be finite"));
        }
        Ok(window)
    }
}

/// How a point of the window becomes the point handed to the
/// evaluator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Projection {
    /// The window point is used as is.
    Linear,
    /// The open unit disk is stretched over the entire plane with
    /// `w / (1 - |w|²)`.  Points on or outside the unit circle have no
    /// image.
    UnitDisk,
}

/// The pixel grid, the window it looks at, and the mapping between them.
#[derive(Copy, Clone, Debug)]
pub struct ScanParameters {
    width: usize,
    height: usize,
    window: PlaneWindow,
    projection: Projection,
    // Width and height of a single pixel on the complex plane.
    steps: (f64, f64),
}

impl ScanParameters {
    /// Constructor.  Both dimensions must be at least two, since the
    /// outermost pixels sit exactly on the window's edges, and must fit
    /// the `u32` the encoders take.
    pub fn new(width: usize, height: usize, window: PlaneWindow) -> Result<ScanParameters, Error> {
        if width < 2 || height < 2 {
            return Err(Error::InvalidSize { width, height });
        }
        if u32::try_from(width).is_err() || u32::try_from(height).is_err() {
            return Err(Error::OversizeImage { width, height });
        }
        Ok(ScanParameters {
            width,
            height,
            window,
            projection: Projection::Linear,
            steps: (
                (window.x_max - window.x_min) / ((width - 1) as f64),
                (window.y_max - window.y_min) / ((height - 1) as f64),
            ),
        })
    }

    /// Switch the projection.
    pub fn with_projection(mut self, projection: Projection) -> ScanParameters {
        self.projection = projection;
        self
    }

    /// Same grid, another window.
    pub fn with_window(&self, window: PlaneWindow) -> Result<ScanParameters, Error> {
        ScanParameters::new(self.width, self.height, window)
            .map(|scan| scan.with_projection(self.projection))
    }

    /// Columns in the image.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows in the image.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width and height as the encoders want them.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    /// The total number of pixels in the grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Never true for a constructed grid; here for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The visible window.
    pub fn window(&self) -> PlaneWindow {
        self.window
    }

    /// The active projection.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Map a pixel onto the window, ignoring the projection.
    pub fn pixel_to_window(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.window.x_min + (pixel.0 as f64) * self.steps.0,
            self.window.y_max - (pixel.1 as f64) * self.steps.1,
        )
    }

    /// Map a pixel to the point the evaluator should iterate, or `None`
    /// when the projection leaves the pixel without one.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Option<Complex<f64>> {
        let w = self.pixel_to_window(pixel);
        match self.projection {
            Projection::Linear => Some(w),
            Projection::UnitDisk => {
                let norm = abs_squared(w);
                if norm >= 1.0 {
                    None
                } else {
                    Some(w / (1.0 - norm))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn window_fails_on_bad_shape() {
        assert!(PlaneWindow::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(PlaneWindow::new(-1.0, 1.0, 1.0, -1.0).is_err());
        assert!(PlaneWindow::new(-1.0, -1.0, -1.0, 1.0).is_err());
        assert!(PlaneWindow::new(-1.0, std::f64::NAN, -1.0, 1.0).is_err());
    }

    #[test]
    fn window_passes_on_good_shape() {
        let window = PlaneWindow::from_corners(Complex::new(-2.0, -1.0), Complex::new(1.0, 1.0));
        assert!(window.is_ok());
    }

    #[test]
    fn scan_refuses_degenerate_grids() {
        let window = PlaneWindow::new(-1.0, 1.0, -1.0, 1.0).unwrap();
        assert!(ScanParameters::new(1, 10, window).is_err());
        assert!(ScanParameters::new(10, 0, window).is_err());
        assert!(ScanParameters::new(2, 2, window).is_ok());
    }

    #[test]
    fn corners_map_to_window_edges() {
        let window = PlaneWindow::new(-3.0, 1.0, -2.0, 2.0).unwrap();
        let scan = ScanParameters::new(1024, 768, window).unwrap();
        let top_left = scan.pixel_to_point(&Pixel(0, 0)).unwrap();
        assert!(near(top_left.re, -3.0) && near(top_left.im, 2.0));
        let bottom_right = scan.pixel_to_point(&Pixel(1023, 767)).unwrap();
        assert!(near(bottom_right.re, 1.0) && near(bottom_right.im, -2.0));
    }

    #[test]
    fn rows_descend_the_imaginary_axis() {
        let window = PlaneWindow::new(0.0, 4.0, 0.0, 4.0).unwrap();
        let scan = ScanParameters::new(5, 5, window).unwrap();
        assert_eq!(scan.pixel_to_point(&Pixel(2, 1)), Some(Complex::new(2.0, 3.0)));
        assert_eq!(scan.pixel_to_point(&Pixel(4, 4)), Some(Complex::new(4.0, 0.0)));
    }

    #[test]
    fn scaled_window_centers_the_middle_pixel() {
        let scale = 2.0 / (0.65 * 1024.0);
        let window = PlaneWindow::from_scale(Complex::new(-0.8, 0.0), scale, 1024, 1024).unwrap();
        let scan = ScanParameters::new(1024, 1024, window).unwrap();
        let middle = scan.pixel_to_point(&Pixel(512, 512)).unwrap();
        assert!(near(middle.re, -0.8));
        assert!(near(middle.im, 0.0));
    }

    #[test]
    fn focused_matches_around_while_wide() {
        let center = Complex::new(0.5, -0.25);
        assert_eq!(
            PlaneWindow::focused(center, 3.0, 2.0).unwrap(),
            PlaneWindow::around(center, 3.0, 2.0).unwrap()
        );
        assert!(PlaneWindow::focused(center, -1.0, 2.0).is_err());
        assert!(PlaneWindow::focused(center, std::f64::NAN, 2.0).is_err());
        assert!(PlaneWindow::focused(center, std::f64::INFINITY, 2.0).is_err());
    }

    #[test]
    fn focused_collapses_below_float_resolution() {
        let center = Complex::new(0.001_643_721_971_153, -0.822_467_633_298_876);
        assert!(PlaneWindow::around(center, 1e-30, 1e-30).is_err());
        let window = PlaneWindow::focused(center, 1e-30, 1e-30).unwrap();
        assert_eq!(window.x_min, center.re);
        assert_eq!(window.x_max, center.re);
        assert_eq!(window.y_min, center.im);
        assert_eq!(window.y_max, center.im);
        let scan = ScanParameters::new(4, 4, window).unwrap();
        assert_eq!(scan.pixel_to_point(&Pixel(0, 0)), Some(center));
        assert_eq!(scan.pixel_to_point(&Pixel(3, 3)), Some(center));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn scan_refuses_grids_the_encoders_cannot_address() {
        let window = PlaneWindow::new(-1.0, 1.0, -1.0, 1.0).unwrap();
        let wide = std::u32::MAX as usize + 1;
        match ScanParameters::new(wide, 2, window) {
            Err(Error::OversizeImage { width, height: 2 }) => assert_eq!(width, wide),
            other => panic!("unexpected {:?}", other),
        }
        let scan = ScanParameters::new(std::u32::MAX as usize, 2, window).unwrap();
        assert_eq!(scan.dimensions(), (std::u32::MAX, 2));
    }

    #[test]
    fn unit_disk_hides_the_corners() {
        let window = PlaneWindow::new(-1.0, 1.0, -1.0, 1.0).unwrap();
        let scan = ScanParameters::new(3, 3, window)
            .unwrap()
            .with_projection(Projection::UnitDisk);
        assert_eq!(scan.pixel_to_point(&Pixel(0, 0)), None);
        assert_eq!(scan.pixel_to_point(&Pixel(1, 1)), Some(Complex::new(0.0, 0.0)));
    }

    #[test]
    fn unit_disk_stretches_toward_the_rim() {
        let window = PlaneWindow::new(-1.0, 1.0, -1.0, 1.0).unwrap();
        let scan = ScanParameters::new(5, 5, window)
            .unwrap()
            .with_projection(Projection::UnitDisk);
        // (0.5, 0) becomes 0.5 / (1 - 0.25).
        let point = scan.pixel_to_point(&Pixel(3, 2)).unwrap();
        assert!(near(point.re, 0.5 / 0.75));
        assert!(near(point.im, 0.0));
    }
}
