// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Compute backends
//!
//! The two embarrassingly parallel stages of a carve, computing the
//! energy map and recomposing the image once the seams are known, sit
//! behind one trait.  The seam search between them is sequential
//! along the scan axis and always runs on the calling thread, whatever
//! backend is chosen.
//!
//! Every backend is built from the same row kernels, so switching
//! backends can change how fast a carve runs but never what it
//! produces.

use crate::energy::{compute_energy, EnergyMap};
use crate::error::Result;
use crate::mutate::{recompose, Mutation};
use crate::pixelbuffer::PixelBuffer;
use crate::seam::SeamIndex;

/// The interface every compute engine implements.  Both calls block
/// until the work is finished.
pub trait ComputeBackend: Send + Sync {
    /// A short name for logs.
    fn name(&self) -> &'static str;

    /// The energy of every pixel in `image`.
    fn compute_energy(&self, image: &PixelBuffer) -> Result<EnergyMap>;

    /// Apply a flattened batch of vertical seams to `image`.  The index
    /// has already been checked against the image.
    fn apply_seams(&self, image: &PixelBuffer, index: &SeamIndex, mutation: Mutation) -> Result<PixelBuffer>;
}

/// Which compute engine to use.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum BackendKind {
    /// One row after another on the calling thread.  Always available.
    Sequential,
    /// Bands of rows across a pool of scoped threads.  Requires the
    /// `threaded` feature.
    Threaded,
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Sequential
    }
}

/// The single-threaded backend.
#[derive(Debug, Default, Copy, Clone)]
pub struct Sequential;

impl ComputeBackend for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn compute_energy(&self, image: &PixelBuffer) -> Result<EnergyMap> {
        Ok(compute_energy(image))
    }

    fn apply_seams(&self, image: &PixelBuffer, index: &SeamIndex, mutation: Mutation) -> Result<PixelBuffer> {
        recompose(image, index, mutation)
    }
}

/// Instantiate the requested backend, or explain why it can't be.
pub fn select_backend(kind: BackendKind) -> Result<Box<dyn ComputeBackend>> {
    match kind {
        BackendKind::Sequential => Ok(Box::new(Sequential)),
        BackendKind::Threaded => threaded_backend(),
    }
}

#[cfg(feature = "threaded")]
fn threaded_backend() -> Result<Box<dyn ComputeBackend>> {
    Ok(Box::new(crate::threaded::Threaded::new()))
}

#[cfg(not(feature = "threaded"))]
fn threaded_backend() -> Result<Box<dyn ComputeBackend>> {
    Err(crate::error::CarveError::BackendUnavailable {
        backend: "threaded",
        reason: "built without the `threaded` feature".to_string(),
    })
}
