// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! The energy of a pixel is the magnitude of the color gradient
//! across it, taken as a central difference over every channel:
//!
//! ```text
//!        |Δx|² = (Δrx)²+(Δgx)²+(Δbx)²+(Δax)²
//!        |Δy|² = (Δry)²+(Δgy)²+(Δby)²+(Δay)²
//!       e(x,y) = √(|Δx|²+|Δy|²)
//! ```
//!
//! Pixels on the border of the image don't have all four neighbors.
//! Rather than invent the missing ones, they get a flat
//! `BORDER_ENERGY`, which is higher than any interior gradient an
//! 8-bit image can produce; seams stay off the edges unless there's
//! nowhere else to go.

use crate::pixelbuffer::{PixelBuffer, Rgba};
use crate::twodmap::TwoDimensionalMap;
use itertools::zip;

/// Energy assigned to every pixel on the edge of the image.
pub const BORDER_ENERGY: f32 = 1000.0;

/// One non-negative energy per pixel, same shape as the image.
pub type EnergyMap = TwoDimensionalMap<f32>;

// Takes the channels from two pixels and maps the difference between
// each channel, squares it, and then sums them all up.
#[inline]
fn energy_of_pair(p1: &Rgba, p2: &Rgba) -> f32 {
    zip(p1, p2).map(|(c1, c2)| (c1 - c2) * (c1 - c2)).sum()
}

/// Fill `out` with the energies of row `y`.  Both compute backends are
/// built on this, one row per unit of work.
pub(crate) fn energy_row(image: &PixelBuffer, y: u32, out: &mut [f32]) {
    let (width, height) = image.dimensions();
    debug_assert_eq!(out.len(), width as usize);

    if y == 0 || y + 1 >= height {
        out.iter_mut().for_each(|e| *e = BORDER_ENERGY);
        return;
    }

    let (above, row, below) = (image.row(y - 1), image.row(y), image.row(y + 1));
    let last = out.len().saturating_sub(1);
    for (x, e) in out.iter_mut().enumerate() {
        *e = if x == 0 || x == last {
            BORDER_ENERGY
        } else {
            let dx2 = energy_of_pair(&row[x + 1], &row[x - 1]);
            let dy2 = energy_of_pair(&below[x], &above[x]);
            (dx2 + dy2).sqrt()
        };
    }
}

/// Compute the energy of every pixel in an image, one row after
/// another.
pub fn compute_energy(image: &PixelBuffer) -> EnergyMap {
    let (width, height) = image.dimensions();
    let mut emap = EnergyMap::new(width, height);
    for y in 0..height {
        energy_row(image, y, emap.row_mut(y));
    }
    emap
}
