// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PixelBuffer - the image as the carver sees it
//!
//! A flat, row-major run of RGBA pixels.  Channels are `f32` so that
//! blending during seam insertion doesn't lose precision between
//! steps; images that come in through `image` are scaled to the byte
//! range, 0.0 to 255.0.

use crate::error::{CarveError, Result};
use crate::orientation::Axis;
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, ImageBuffer, Pixel, Primitive, Rgba as ImageRgba, RgbaImage};
use num_traits::{Bounded, NumCast};

/// One pixel: red, green, blue, alpha.
pub type Rgba = [f32; 4];

/// The image being carved.
pub type PixelBuffer = TwoDimensionalMap<Rgba>;

/// The 50/50 mix of two pixels.
#[inline]
pub fn blend(p1: &Rgba, p2: &Rgba) -> Rgba {
    [
        (p1[0] + p2[0]) * 0.5,
        (p1[1] + p2[1]) * 0.5,
        (p1[2] + p2[2]) * 0.5,
        (p1[3] + p2[3]) * 0.5,
    ]
}

fn empty(width: u32, height: u32) -> CarveError {
    CarveError::InvalidDimension {
        axis: if width == 0 {
            Axis::Vertical
        } else {
            Axis::Horizontal
        },
        width,
        height,
        reason: "an image needs at least one row and one column",
    }
}

impl TwoDimensionalMap<Rgba> {
    /// Take ownership of a row-major vector of pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(empty(width, height));
        }
        TwoDimensionalMap::from_vec(width, height, pixels).ok_or(CarveError::InvalidDimension {
            axis: Axis::Vertical,
            width,
            height,
            reason: "pixel count does not match the dimensions",
        })
    }

    /// An image of a single color.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self> {
        PixelBuffer::from_pixels(width, height, vec![color; width as usize * height as usize])
    }

    /// Read packed 8-bit RGBA bytes, four per pixel.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return Err(CarveError::InvalidDimension {
                axis: Axis::Vertical,
                width,
                height,
                reason: "byte count does not match the dimensions",
            });
        }
        let pixels = bytes
            .chunks(4)
            .map(|c| [c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32])
            .collect();
        PixelBuffer::from_pixels(width, height, pixels)
    }

    /// Copy any integer-subpixel image into a buffer, scaling each
    /// channel into the byte range.
    pub fn from_image<I, P, S>(image: &I) -> Result<Self>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(empty(width, height));
        }
        let max: f32 = NumCast::from(<S as Bounded>::max_value()).unwrap_or(255.0);
        let scale = 255.0 / max;
        let channel = |c: S| -> f32 {
            let c: f32 = NumCast::from(c).unwrap_or(0.0);
            c * scale
        };
        Ok(TwoDimensionalMap::from_fn(width, height, |x, y| {
            let p = image.get_pixel(x, y).to_rgba();
            let c = p.channels();
            [channel(c[0]), channel(c[1]), channel(c[2]), channel(c[3])]
        }))
    }

    /// Round every channel back into a byte and hand the result over
    /// as an `image` buffer.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let (width, height) = self.dimensions();
        let byte = |c: f32| -> u8 { c.round().max(0.0).min(255.0) as u8 };
        ImageBuffer::from_fn(width, height, |x, y| {
            let p = self.get_pt(x, y);
            ImageRgba([byte(p[0]), byte(p[1]), byte(p[2]), byte(p[3])])
        })
    }
}
