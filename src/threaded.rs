// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The multi-threaded backend
//!
//! The output map is broken up with `chunks_mut` into bands of whole
//! rows, one band per worker, and each band is filled in its own
//! scoped thread.  The source image is shared read-only; no worker
//! ever sees another's band, so nothing here needs a lock.

use crate::backend::ComputeBackend;
use crate::energy::{energy_row, EnergyMap};
use crate::error::{CarveError, Result};
use crate::mutate::{overflow, recompose_row, Mutation};
use crate::orientation::Axis;
use crate::pixelbuffer::PixelBuffer;
use crate::seam::SeamIndex;
use log::trace;

/// Spreads the energy and recomposition stages over a pool of
/// threads, one band of rows each.
#[derive(Debug, Copy, Clone)]
pub struct Threaded {
    workers: usize,
}

impl Threaded {
    /// One worker per logical CPU.
    pub fn new() -> Self {
        Threaded::with_workers(num_cpus::get())
    }

    pub fn with_workers(workers: usize) -> Self {
        Threaded {
            workers: workers.max(1),
        }
    }

    fn rows_per_band(&self, height: u32) -> usize {
        let height = height as usize;
        ((height + self.workers - 1) / self.workers).max(1)
    }
}

impl Default for Threaded {
    fn default() -> Self {
        Threaded::new()
    }
}

fn worker_panicked() -> CarveError {
    CarveError::BackendUnavailable {
        backend: "threaded",
        reason: "a worker thread panicked".to_string(),
    }
}

impl ComputeBackend for Threaded {
    fn name(&self) -> &'static str {
        "threaded"
    }

    fn compute_energy(&self, image: &PixelBuffer) -> Result<EnergyMap> {
        let (width, height) = image.dimensions();
        let mut emap = EnergyMap::new(width, height);
        if width == 0 || height == 0 {
            return Ok(emap);
        }
        let band = self.rows_per_band(height);
        let stride = width as usize;
        trace!("energy: {} rows in bands of {}", height, band);

        crossbeam::scope(|scope| {
            for (b, chunk) in emap.values_mut().chunks_mut(band * stride).enumerate() {
                scope.spawn(move |_| {
                    for (i, row) in chunk.chunks_mut(stride).enumerate() {
                        energy_row(image, (b * band + i) as u32, row);
                    }
                });
            }
        })
        .map_err(|_| worker_panicked())?;
        Ok(emap)
    }

    fn apply_seams(&self, image: &PixelBuffer, index: &SeamIndex, mutation: Mutation) -> Result<PixelBuffer> {
        let (width, height) = image.dimensions();
        let seams = index.per_line() as u32;
        let new_width = mutation
            .apply(width, seams)
            .ok_or_else(|| overflow(Axis::Vertical, width, height))?;
        let mut carved = PixelBuffer::new(new_width, height);
        let band = self.rows_per_band(height);
        let stride = new_width as usize;
        trace!("recompose: {} rows in bands of {}", height, band);

        crossbeam::scope(|scope| {
            for (b, chunk) in carved.values_mut().chunks_mut(band * stride).enumerate() {
                scope.spawn(move |_| {
                    for (i, row) in chunk.chunks_mut(stride).enumerate() {
                        let y = (b * band + i) as u32;
                        recompose_row(image.row(y), index.line(y), mutation, row);
                    }
                });
            }
        })
        .map_err(|_| worker_panicked())?;
        Ok(carved)
    }
}
