// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// #![deny(missing_docs)]

extern crate image;

pub mod error;
pub use error::{CarveError, Result};

pub mod twodmap;
pub use twodmap::TwoDimensionalMap;

pub mod orientation;
pub use orientation::{transpose, Axis};

pub mod pixelbuffer;
pub use pixelbuffer::{PixelBuffer, Rgba};

pub mod energy;
pub use energy::{compute_energy, EnergyMap, BORDER_ENERGY};

pub mod costmap;
pub use costmap::CumulativeCostTable;

pub mod seam;
pub use seam::{extract_seam, Seam, SeamBatch, SeamIndex};

pub mod mutate;
pub use mutate::{apply_seams, carved_dimensions, insert_seam, remove_seam, Mutation};

pub mod backend;
pub use backend::{select_backend, BackendKind, ComputeBackend, Sequential};

#[cfg(feature = "threaded")]
mod threaded;
#[cfg(feature = "threaded")]
pub use threaded::Threaded;

pub mod batch;
pub use batch::{BatchScheduler, Carved};

pub mod config;
pub use config::CarveConfig;

pub mod overlay;
pub use overlay::highlight_seams;

pub mod seamcarver;
pub use seamcarver::{seamcarve, Progress, SeamCarver};
