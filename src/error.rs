// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Carving errors
//!
//! Every failure the engine can report.  Each variant carries the
//! dimensions that caused it, so the caller can tell the user exactly
//! which request was refused.

use crate::orientation::Axis;
use failure::Fail;

/// Everything that can go wrong while carving.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum CarveError {
    /// The operation would shrink a dimension to zero, or it was handed
    /// a map with no rows or columns at all.
    #[fail(
        display = "invalid dimension: {}x{} image along the {:?} axis: {}",
        width, height, axis, reason
    )]
    InvalidDimension {
        axis: Axis,
        width: u32,
        height: u32,
        reason: &'static str,
    },

    /// A request arrived before any source image was loaded.
    #[fail(display = "no source image has been loaded")]
    MissingInput,

    /// The requested compute backend is not part of this build.  The
    /// carver recovers from this by falling back to the sequential
    /// backend.
    #[fail(display = "compute backend '{}' is unavailable: {}", backend, reason)]
    BackendUnavailable {
        backend: &'static str,
        reason: String,
    },

    /// A seam failed its consistency check against the image it was
    /// about to be applied to.
    #[fail(
        display = "malformed seam at position {} for a {}x{} image: {}",
        position, width, height, reason
    )]
    MalformedSeam {
        width: u32,
        height: u32,
        position: usize,
        reason: &'static str,
    },
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, CarveError>;
