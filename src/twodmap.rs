// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The flat two-dimensional store behind every map in the crate.
//!
//! Pixels, energies, and cumulative costs all live in one of these.
//! Storage is a single `Vec`, row-major: the value at `(x, y)` lives
//! at `y * width + x`.  Nothing outside this file does index math.

use itertools::iproduct;
use std::ops::{Index, IndexMut};

/// Defines the basic map: An addressable two-dimensional field
/// containing an object that represents one of several possible
/// objects during processing: an RGBA pixel for an image, an `f32`
/// for the energy map, or a cost for the seam search.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    width: u32,
    height: u32,
    values: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Define a new map filled with the content type's default.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            values: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Wrap an existing row-major vector.  Returns `None` if the vector
    /// is the wrong length for the dimensions given.
    pub fn from_vec(width: u32, height: u32, values: Vec<P>) -> Option<Self> {
        if values.len() != width as usize * height as usize {
            return None;
        }
        Some(TwoDimensionalMap {
            width,
            height,
            values,
        })
    }

    /// Build a map by asking `f` for the value at every address, in
    /// storage order.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> P,
    {
        TwoDimensionalMap {
            width,
            height,
            values: iproduct!(0..height, 0..width)
                .map(|(y, x)| f(x, y))
                .collect(),
        }
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.  This
    // particular variant is the same one used in image.rs.
    #[inline]
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The whole map, row after row.
    pub fn values(&self) -> &[P] {
        &self.values
    }

    pub fn into_values(self) -> Vec<P> {
        self.values
    }

    /// Get the value at a single address
    #[inline]
    pub fn get_pt(&self, x: u32, y: u32) -> P {
        self.values[self.get_index(x, y)]
    }

    /// One full row.
    pub fn row(&self, y: u32) -> &[P] {
        let start = self.get_index(0, y);
        &self.values[start..start + self.width as usize]
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [P] {
        let start = self.get_index(0, y);
        let width = self.width as usize;
        &mut self.values[start..start + width]
    }

    pub(crate) fn values_mut(&mut self) -> &mut [P] {
        &mut self.values
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.values[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.values[index]
    }
}
