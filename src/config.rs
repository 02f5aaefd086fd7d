// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Carver configuration.

use crate::backend::BackendKind;
use crate::pixelbuffer::Rgba;

/// Most seams pulled from one cost table before the energy is
/// recomputed.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Opaque red, in the byte range.
pub const DEFAULT_HIGHLIGHT: Rgba = [255.0, 0.0, 0.0, 255.0];

/// How a `SeamCarver` goes about its work.
#[derive(Debug, Clone, PartialEq)]
pub struct CarveConfig {
    /// The compute engine for the energy and recomposition stages.
    pub backend: BackendKind,
    /// Most seams per sub-batch.
    pub batch_size: usize,
    /// The color seams are painted in the diagnostic overlay.
    pub highlight: Rgba,
}

impl Default for CarveConfig {
    fn default() -> Self {
        CarveConfig {
            backend: BackendKind::Sequential,
            batch_size: DEFAULT_BATCH_SIZE,
            highlight: DEFAULT_HIGHLIGHT,
        }
    }
}

impl CarveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn set_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn set_highlight(mut self, highlight: Rgba) -> Self {
        self.highlight = highlight;
        self
    }
}
