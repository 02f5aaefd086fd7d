// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image dimensional flipper
//!
//! Every seam algorithm in this crate is written once, for vertical
//! seams.  A horizontal seam through an image is a vertical seam
//! through the same image turned on its side, so horizontal requests
//! transpose the image, run the vertical pipeline, and transpose the
//! result back.
//!
//! Transposition makes each column of the original a contiguous row
//! in memory, the way the row kernels want it.

use crate::twodmap::TwoDimensionalMap;

/// Which way a seam runs.
///
/// A `Vertical` seam runs top to bottom, one pixel per row; removing
/// or inserting it changes the image's width.  A `Horizontal` seam
/// runs left to right, one pixel per column, and changes the height.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    /// The other axis.
    pub fn turn(self) -> Self {
        match self {
            Axis::Vertical => Axis::Horizontal,
            Axis::Horizontal => Axis::Vertical,
        }
    }

    /// The dimension of a `width x height` image that this axis' seams
    /// remove from or add to.
    pub fn carved_extent(self, width: u32, height: u32) -> u32 {
        match self {
            Axis::Vertical => width,
            Axis::Horizontal => height,
        }
    }

    /// The dimension a seam on this axis runs along; also its length.
    pub fn seam_extent(self, width: u32, height: u32) -> u32 {
        self.turn().carved_extent(width, height)
    }
}

/// Swap width for height, and every `(x, y)` for `(y, x)`.  Exact,
/// and its own inverse.
pub fn transpose<P: Default + Copy>(map: &TwoDimensionalMap<P>) -> TwoDimensionalMap<P> {
    let (width, height) = map.dimensions();
    TwoDimensionalMap::from_fn(height, width, |x, y| map.get_pt(y, x))
}

/// Run a vertical-seam operation along `axis`: directly for vertical
/// seams, between a pair of transpositions for horizontal ones.
pub fn oriented<P, R, F>(
    map: &TwoDimensionalMap<P>,
    axis: Axis,
    op: F,
) -> crate::Result<(TwoDimensionalMap<P>, R)>
where
    P: Default + Copy,
    F: FnOnce(&TwoDimensionalMap<P>) -> crate::Result<(TwoDimensionalMap<P>, R)>,
{
    match axis {
        Axis::Vertical => op(map),
        Axis::Horizontal => {
            let (flipped, extra) = op(&transpose(map))?;
            Ok((transpose(&flipped), extra))
        }
    }
}
