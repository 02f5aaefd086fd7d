// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The request API
//!
//! The carver holds the current image and answers two kinds of
//! request: "make the image this size", and "take out (or put in) this
//! many seams along this axis".  Large jobs are carried out one batch
//! at a time, and every committed batch leaves a complete, valid image
//! behind, so a caller may stop between batches and keep what it has.

use crate::backend::{select_backend, ComputeBackend, Sequential};
use crate::batch::BatchScheduler;
use crate::config::CarveConfig;
use crate::error::{CarveError, Result};
use crate::mutate::Mutation;
use crate::orientation::Axis;
use crate::overlay::highlight_seams;
use crate::pixelbuffer::PixelBuffer;
use crate::seam::SeamBatch;
use log::{debug, warn};

/// Whether a call to `step_towards` did anything.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Progress {
    /// One batch was committed; the image is not at its target yet, or
    /// only just got there.
    Stepped,
    /// The image was already at the requested size.
    Done,
}

/// A struct for holding the image to be carved.
pub struct SeamCarver {
    config: CarveConfig,
    backend: Box<dyn ComputeBackend>,
    image: Option<PixelBuffer>,
    last: Option<(SeamBatch, Mutation)>,
    // The axis the next two-dimensional step starts with.
    direction: Axis,
}

impl SeamCarver {
    /// A carver with no image loaded yet.  If the configured backend
    /// isn't available in this build, the carver falls back to the
    /// sequential one.
    pub fn new(config: CarveConfig) -> Self {
        let backend = match select_backend(config.backend) {
            Ok(backend) => backend,
            Err(e) => {
                warn!("{}; falling back to the sequential backend", e);
                Box::new(Sequential) as Box<dyn ComputeBackend>
            }
        };
        debug!("seam carver using the {} backend", backend.name());
        SeamCarver {
            config,
            backend,
            image: None,
            last: None,
            direction: Axis::Vertical,
        }
    }

    /// Replace the image being carved.
    pub fn load(&mut self, image: PixelBuffer) {
        self.image = Some(image);
        self.last = None;
        self.direction = Axis::Vertical;
    }

    pub fn config(&self) -> &CarveConfig {
        &self.config
    }

    /// Name of the backend actually in use.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// The image as of the last committed batch.
    pub fn current(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    pub fn into_buffer(self) -> Option<PixelBuffer> {
        self.image
    }

    fn loaded(&self) -> Result<&PixelBuffer> {
        self.image.as_ref().ok_or(CarveError::MissingInput)
    }

    // Run one scheduler call against the current image, and commit the
    // result only if it succeeded.
    fn commit(&mut self, seams: u32, axis: Axis, mutation: Mutation) -> Result<()> {
        let carved = {
            let image = self.loaded()?;
            BatchScheduler::new(self.backend.as_ref(), self.config.batch_size)
                .apply_batch(image, seams, axis, mutation)?
        };
        if !carved.seams.is_empty() {
            self.last = Some((carved.seams, mutation));
        }
        self.image = Some(carved.image);
        Ok(())
    }

    /// Remove or insert `count` seams along `axis`.  Counts larger than
    /// the configured batch size are carried out in several batches,
    /// each against freshly computed energy.
    pub fn resize_by_seams(&mut self, count: u32, axis: Axis, mutation: Mutation) -> Result<&PixelBuffer> {
        self.commit(count, axis, mutation)?;
        self.loaded()
    }

    /// Commit a single batch towards a `width x height` target.  While
    /// both dimensions are off target, steps alternate between the two
    /// axes.
    pub fn step_towards(&mut self, width: u32, height: u32) -> Result<Progress> {
        let (current_width, current_height) = self.loaded()?.dimensions();
        if width == 0 || height == 0 {
            return Err(CarveError::InvalidDimension {
                axis: if width == 0 {
                    Axis::Vertical
                } else {
                    Axis::Horizontal
                },
                width: current_width,
                height: current_height,
                reason: "cannot carve an image down to nothing",
            });
        }

        let wanted = |axis: Axis| match axis {
            Axis::Vertical => (current_width, width),
            Axis::Horizontal => (current_height, height),
        };
        let axis = if wanted(self.direction).0 != wanted(self.direction).1 {
            self.direction
        } else if wanted(self.direction.turn()).0 != wanted(self.direction.turn()).1 {
            self.direction.turn()
        } else {
            return Ok(Progress::Done);
        };

        let (have, want) = wanted(axis);
        let (mutation, distance) = if want < have {
            (Mutation::Remove, have - want)
        } else {
            (Mutation::Insert, want - have)
        };
        let seams = distance.min(self.config.batch_size.max(1) as u32);
        debug!(
            "step: {}x{} -> {}x{}, {:?} {} {:?} seams",
            current_width, current_height, width, height, mutation, seams, axis
        );
        self.commit(seams, axis, mutation)?;
        self.direction = axis.turn();
        Ok(Progress::Stepped)
    }

    /// Carve or grow the image until it is `width x height`.
    pub fn resize_to(&mut self, width: u32, height: u32) -> Result<&PixelBuffer> {
        while self.step_towards(width, height)? == Progress::Stepped {}
        self.loaded()
    }

    /// A copy of the current image with the most recently committed
    /// seams painted in the configured highlight color.  `None` before
    /// any image is loaded; a plain copy before anything was carved.
    pub fn overlay(&self) -> Option<PixelBuffer> {
        let image = self.image.as_ref()?;
        Some(match &self.last {
            Some((batch, mutation)) => highlight_seams(image, batch, *mutation, self.config.highlight),
            None => image.clone(),
        })
    }
}

impl Default for SeamCarver {
    fn default() -> Self {
        SeamCarver::new(CarveConfig::default())
    }
}

/// Given an image and a desired new width and height, carve (or grow)
/// the image to that size with the default configuration.
pub fn seamcarve(image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    let mut carver = SeamCarver::default();
    carver.load(image.clone());
    carver.resize_to(width, height)?;
    carver.into_buffer().ok_or(CarveError::MissingInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;

    fn gray(v: f32) -> [f32; 4] {
        [v, v, v, 255.0]
    }

    fn checker(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| gray(((x * 13 + y * 29) % 200) as f32))
    }

    #[test]
    fn nothing_loaded_is_missing_input() {
        let mut carver = SeamCarver::default();
        assert_eq!(carver.resize_to(3, 3).unwrap_err(), CarveError::MissingInput);
        assert_eq!(
            carver.resize_by_seams(1, Axis::Vertical, Mutation::Remove).unwrap_err(),
            CarveError::MissingInput
        );
        assert!(carver.overlay().is_none());
    }

    #[test]
    fn resize_to_reaches_the_target_both_ways() {
        let mut carver = SeamCarver::new(CarveConfig::new().set_batch_size(3));
        carver.load(checker(10, 8));
        assert_eq!(carver.resize_to(6, 11).unwrap().dimensions(), (6, 11));
        assert_eq!(carver.resize_to(9, 5).unwrap().dimensions(), (9, 5));
        assert_eq!(carver.resize_to(9, 5).unwrap().dimensions(), (9, 5));
    }

    #[test]
    fn steps_alternate_between_axes() {
        let mut carver = SeamCarver::new(CarveConfig::new().set_batch_size(1));
        carver.load(checker(6, 6));
        assert_eq!(carver.step_towards(4, 4).unwrap(), Progress::Stepped);
        assert_eq!(carver.current().unwrap().dimensions(), (5, 6));
        assert_eq!(carver.step_towards(4, 4).unwrap(), Progress::Stepped);
        assert_eq!(carver.current().unwrap().dimensions(), (5, 5));
        assert_eq!(carver.step_towards(4, 4).unwrap(), Progress::Stepped);
        assert_eq!(carver.current().unwrap().dimensions(), (4, 5));
        assert_eq!(carver.step_towards(4, 4).unwrap(), Progress::Stepped);
        assert_eq!(carver.step_towards(4, 4).unwrap(), Progress::Done);
        assert_eq!(carver.current().unwrap().dimensions(), (4, 4));
    }

    #[test]
    fn zero_targets_are_refused_and_the_image_kept() {
        let mut carver = SeamCarver::default();
        carver.load(checker(5, 5));
        match carver.resize_to(0, 5) {
            Err(CarveError::InvalidDimension { axis, .. }) => assert_eq!(axis, Axis::Vertical),
            other => panic!("expected an invalid dimension, got {:?}", other),
        }
        assert_eq!(carver.current().unwrap(), &checker(5, 5));
    }

    #[test]
    fn failed_requests_leave_the_last_good_image() {
        let mut carver = SeamCarver::default();
        carver.load(checker(1, 4));
        assert!(carver
            .resize_by_seams(1, Axis::Vertical, Mutation::Remove)
            .is_err());
        assert_eq!(carver.current().unwrap(), &checker(1, 4));
    }

    #[test]
    fn oversized_insertions_leave_the_image_alone() {
        let mut carver = SeamCarver::default();
        carver.load(checker(4, 4));
        match carver.resize_by_seams(u32::max_value() - 2, Axis::Horizontal, Mutation::Insert) {
            Err(CarveError::InvalidDimension { axis, .. }) => assert_eq!(axis, Axis::Horizontal),
            other => panic!("expected an invalid dimension, got {:?}", other),
        }
        assert_eq!(carver.current().unwrap(), &checker(4, 4));
    }

    #[test]
    fn overlay_paints_the_last_batch() {
        let red = [255.0, 0.0, 0.0, 255.0];
        let mut carver = SeamCarver::new(CarveConfig::new().set_highlight(red));
        carver.load(checker(8, 6));
        assert_eq!(carver.overlay().unwrap(), checker(8, 6));
        carver.resize_by_seams(2, Axis::Vertical, Mutation::Insert).unwrap();
        let overlay = carver.overlay().unwrap();
        assert_eq!(overlay.dimensions(), (10, 6));
        for y in 0..6 {
            let painted = overlay.row(y).iter().filter(|p| **p == red).count();
            assert_eq!(painted, 2);
        }
    }

    #[test]
    fn unavailable_backends_fall_back() {
        let carver = SeamCarver::new(CarveConfig::new().set_backend(BackendKind::Threaded));
        if cfg!(feature = "threaded") {
            assert_eq!(carver.backend_name(), "threaded");
        } else {
            assert_eq!(carver.backend_name(), "sequential");
        }
    }

    #[test]
    fn one_shot_carving() {
        let carved = seamcarve(&checker(7, 7), 5, 9).unwrap();
        assert_eq!(carved.dimensions(), (5, 9));
    }
}
