// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam application
//!
//! Taking seams out of an image, or putting new ones in.  Everything
//! here writes a fresh buffer; the source image is never touched.
//!
//! A whole batch of seams is applied in one pass: each output row is
//! built from its source row and that row's sorted seam coordinates,
//! so a batch of K seams costs one allocation and one sweep, not K.

use crate::error::{CarveError, Result};
use crate::orientation::{oriented, Axis};
use crate::pixelbuffer::{blend, PixelBuffer, Rgba};
use crate::seam::{Seam, SeamBatch, SeamIndex};

/// What to do with a seam.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mutation {
    /// Drop the seam's pixels; the image shrinks by one per seam.
    Remove,
    /// Add a blended pixel beside each of the seam's pixels; the image
    /// grows by one per seam.
    Insert,
}

impl Mutation {
    // `None` when an insertion would run past `u32::MAX`.
    pub(crate) fn apply(self, extent: u32, seams: u32) -> Option<u32> {
        match self {
            Mutation::Remove => Some(extent.saturating_sub(seams)),
            Mutation::Insert => extent.checked_add(seams),
        }
    }
}

pub(crate) fn overflow(axis: Axis, width: u32, height: u32) -> CarveError {
    CarveError::InvalidDimension {
        axis,
        width,
        height,
        reason: "carving would overflow the image dimensions",
    }
}

/// The size of the image after `seams` seams along `axis` are
/// removed or inserted.  A result with a zero dimension is refused.
pub fn carved_dimensions(
    (width, height): (u32, u32),
    axis: Axis,
    seams: u32,
    mutation: Mutation,
) -> Result<(u32, u32)> {
    let extent = axis.carved_extent(width, height);
    let carved = mutation
        .apply(extent, seams)
        .ok_or_else(|| overflow(axis, width, height))?;
    if carved == 0 {
        return Err(CarveError::InvalidDimension {
            axis,
            width,
            height,
            reason: "carving would leave the image with nothing in it",
        });
    }
    Ok(match axis {
        Axis::Vertical => (carved, height),
        Axis::Horizontal => (width, carved),
    })
}

/// Build one output row from its source row and the row's ascending
/// seam coordinates.  Both compute backends are built on this.
pub(crate) fn recompose_row(source: &[Rgba], seams: &[u32], mutation: Mutation, out: &mut [Rgba]) {
    let mut seams = seams.iter().peekable();
    let mut cursor = 0;
    for (x, pixel) in source.iter().enumerate() {
        let on_seam = seams.peek().map_or(false, |s| **s as usize == x);
        if on_seam {
            seams.next();
        }
        match (mutation, on_seam) {
            (Mutation::Remove, true) => {}
            (Mutation::Insert, true) => {
                // Blend with the neighbor on the far side of the seam;
                // on the outer edge there is none, so duplicate.
                let neighbor = source.get(x + 1).unwrap_or(pixel);
                out[cursor] = *pixel;
                out[cursor + 1] = blend(pixel, neighbor);
                cursor += 2;
            }
            (_, false) => {
                out[cursor] = *pixel;
                cursor += 1;
            }
        }
    }
    debug_assert_eq!(cursor, out.len());
}

/// Apply a flattened batch of vertical seams, row by row.
pub(crate) fn recompose(image: &PixelBuffer, index: &SeamIndex, mutation: Mutation) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    let new_width = mutation
        .apply(width, index.per_line() as u32)
        .ok_or_else(|| overflow(Axis::Vertical, width, height))?;
    let mut carved = PixelBuffer::new(new_width, height);
    for y in 0..height {
        recompose_row(image.row(y), index.line(y), mutation, carved.row_mut(y));
    }
    Ok(carved)
}

/// Check a batch against the image it is about to be applied to, and
/// flatten it.  Fails on malformed or overlapping seams, and on a
/// batch that would carve a dimension down to nothing.
pub(crate) fn prepare(image: &PixelBuffer, batch: &SeamBatch, mutation: Mutation) -> Result<SeamIndex> {
    let (width, height) = image.dimensions();
    carved_dimensions((width, height), batch.axis(), batch.len() as u32, mutation)?;
    for seam in batch.seams() {
        seam.validate(width, height)?;
    }
    batch.index(width, height)
}

/// Apply a whole batch of seams to an image in one pass.  Every
/// coordinate in the batch refers to `image` as it is now.
pub fn apply_seams(image: &PixelBuffer, batch: &SeamBatch, mutation: Mutation) -> Result<PixelBuffer> {
    let index = prepare(image, batch, mutation)?;
    oriented(image, batch.axis(), |upright| {
        Ok((recompose(upright, &index, mutation)?, ()))
    })
    .map(|(carved, _)| carved)
}

fn single(seam: &Seam) -> SeamBatch {
    let mut batch = SeamBatch::new(seam.axis());
    batch.push(seam.clone());
    batch
}

/// Remove one seam: one column fewer for a vertical seam, one row
/// fewer for a horizontal one.
pub fn remove_seam(image: &PixelBuffer, seam: &Seam) -> Result<PixelBuffer> {
    apply_seams(image, &single(seam), Mutation::Remove)
}

/// Insert one seam: beside every seam pixel, a new pixel halfway
/// between it and its neighbor.
pub fn insert_seam(image: &PixelBuffer, seam: &Seam) -> Result<PixelBuffer> {
    apply_seams(image, &single(seam), Mutation::Insert)
}
