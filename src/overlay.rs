// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam overlay
//!
//! A diagnostic copy of a carved image with the seams that produced it
//! painted in.  The seams were found on the image before the carve,
//! so their coordinates are shifted onto the result: an inserted seam
//! is painted on the new pixels, a removed one on the pixel that slid
//! into its place.

use crate::mutate::Mutation;
use crate::orientation::{transpose, Axis};
use crate::pixelbuffer::{PixelBuffer, Rgba};
use crate::seam::SeamBatch;

/// Paint `batch`, the seams most recently applied with `mutation`,
/// onto `carved` in `color`.
pub fn highlight_seams(carved: &PixelBuffer, batch: &SeamBatch, mutation: Mutation, color: Rgba) -> PixelBuffer {
    match batch.axis() {
        Axis::Vertical => paint(carved, batch, mutation, color),
        Axis::Horizontal => transpose(&paint(&transpose(carved), batch, mutation, color)),
    }
}

fn paint(upright: &PixelBuffer, batch: &SeamBatch, mutation: Mutation, color: Rgba) -> PixelBuffer {
    let mut painted = upright.clone();
    let (width, height) = upright.dimensions();
    if width == 0 {
        return painted;
    }
    for y in 0..height {
        let mut line: Vec<u32> = batch
            .seams()
            .iter()
            .filter_map(|s| s.coordinates().get(y as usize).cloned())
            .collect();
        line.sort_unstable();
        for (i, c) in line.iter().enumerate() {
            let i = i as u32;
            let x = match mutation {
                Mutation::Insert => c + i + 1,
                Mutation::Remove => c.saturating_sub(i),
            };
            painted[(x.min(width - 1), y)] = color;
        }
    }
    painted
}
