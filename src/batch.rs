// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Batch scheduling
//!
//! Carving one seam at a time means recomputing the energy map and the
//! whole cost table for every seam.  A batch amortizes that: energy and
//! costs are computed once, then seam after seam is pulled out of the
//! same table, each one walled off before the next is extracted, and
//! the lot is committed to a new image in a single pass.
//!
//! Seams after the first in a batch are chosen against an energy
//! landscape that doesn't yet reflect the earlier removals.  Large
//! requests are split into sub-batches of at most `batch_size` seams,
//! each starting from freshly computed energy, to keep that drift
//! bounded.

use crate::backend::ComputeBackend;
use crate::costmap::CumulativeCostTable;
use crate::error::{CarveError, Result};
use crate::mutate::{carved_dimensions, prepare, Mutation};
use crate::orientation::{transpose, Axis};
use crate::pixelbuffer::PixelBuffer;
use crate::seam::{extract_seam, Seam, SeamBatch};
use log::{debug, warn};

/// The result of a batch request: the new image, and the seams of the
/// last sub-batch committed to produce it.
#[derive(Debug, Clone)]
pub struct Carved {
    pub image: PixelBuffer,
    pub seams: SeamBatch,
}

/// Extracts and commits seams in batches, on whatever backend it is
/// given.
pub struct BatchScheduler<'a> {
    backend: &'a dyn ComputeBackend,
    batch_size: usize,
}

impl<'a> BatchScheduler<'a> {
    /// `batch_size` is the most seams taken from one cost table; zero is
    /// treated as one.
    pub fn new(backend: &'a dyn ComputeBackend, batch_size: usize) -> Self {
        BatchScheduler {
            backend,
            batch_size: batch_size.max(1),
        }
    }

    /// Remove or insert `seam_count` seams along `axis`.
    ///
    /// Removing as many seams as the image has columns (or rows) is
    /// refused outright; the request is never quietly trimmed.  A count
    /// of zero hands back a copy of the image.  If a sub-batch fails,
    /// nothing is returned and `image` is as it was.
    pub fn apply_batch(
        &self,
        image: &PixelBuffer,
        seam_count: u32,
        axis: Axis,
        mutation: Mutation,
    ) -> Result<Carved> {
        carved_dimensions(image.dimensions(), axis, seam_count, mutation)?;
        if seam_count == 0 {
            return Ok(Carved {
                image: image.clone(),
                seams: SeamBatch::new(axis),
            });
        }

        // Everything below works on vertical seams.
        let upright = match axis {
            Axis::Vertical => None,
            Axis::Horizontal => Some(transpose(image)),
        };
        let mut current: Option<PixelBuffer> = None;
        let mut last = SeamBatch::new(Axis::Vertical);
        let mut remaining = seam_count;

        while remaining > 0 {
            let source = current
                .as_ref()
                .or_else(|| upright.as_ref())
                .unwrap_or(image);
            let (carved, seams) = self.sub_batch(source, remaining, axis, mutation)?;
            remaining -= seams.len() as u32;
            current = Some(carved);
            last = seams;
        }

        let carved = match current {
            Some(carved) => carved,
            None => image.clone(),
        };
        Ok(match axis {
            Axis::Vertical => Carved {
                image: carved,
                seams: last,
            },
            Axis::Horizontal => Carved {
                image: transpose(&carved),
                seams: reorient(last),
            },
        })
    }

    // One energy map, one cost table, up to batch_size vertical seams,
    // one recomposition.
    // `image` is upright; `axis` is the caller's, for error reports.
    fn sub_batch(
        &self,
        image: &PixelBuffer,
        wanted: u32,
        axis: Axis,
        mutation: Mutation,
    ) -> Result<(PixelBuffer, SeamBatch)> {
        let (width, height) = image.dimensions();
        let capacity = match mutation {
            Mutation::Remove => width.saturating_sub(1),
            Mutation::Insert => width,
        };
        let goal = (wanted as usize).min(self.batch_size).min(capacity as usize);
        if goal == 0 {
            let (width, height) = match axis {
                Axis::Vertical => (width, height),
                Axis::Horizontal => (height, width),
            };
            return Err(CarveError::InvalidDimension {
                axis,
                width,
                height,
                reason: "no room left for another seam",
            });
        }

        let energy = self.backend.compute_energy(image)?;
        let mut table = CumulativeCostTable::build(&energy, Axis::Vertical)?;
        let mut batch = SeamBatch::new(Axis::Vertical);
        while batch.len() < goal {
            if table.best_terminal().is_none() {
                warn!(
                    "seam batch on {}x{} ran dry after {} of {} seams",
                    width,
                    height,
                    batch.len(),
                    goal
                );
                break;
            }
            let seam = extract_seam(&table)?;
            table.consume(seam.coordinates());
            batch.push(seam);
        }
        // The first extraction always has a finite seam to find.
        debug_assert!(!batch.is_empty());

        let index = prepare(image, &batch, mutation)?;
        let carved = self.backend.apply_seams(image, &index, mutation)?;
        debug!(
            "{:?} {} seams on {}x{} -> {}x{} ({})",
            mutation,
            batch.len(),
            width,
            height,
            carved.width(),
            carved.height(),
            self.backend.name()
        );
        Ok((carved, batch))
    }
}

// A vertical batch found on a transposed image is a horizontal batch
// on the original; the coordinates carry over unchanged.
fn reorient(batch: SeamBatch) -> SeamBatch {
    let mut flipped = SeamBatch::new(Axis::Horizontal);
    for seam in batch.seams() {
        flipped.push(Seam::new(Axis::Horizontal, seam.coordinates().to_vec()));
    }
    flipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Sequential;
    use crate::mutate::apply_seams;

    fn gray(v: f32) -> [f32; 4] {
        [v, v, v, 255.0]
    }

    fn stripes(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| gray(((x * 40 + y * 7) % 255) as f32))
    }

    #[test]
    fn batches_shrink_by_the_seam_count() {
        let scheduler = BatchScheduler::new(&Sequential, 8);
        let carved = scheduler
            .apply_batch(&stripes(12, 9), 5, Axis::Vertical, Mutation::Remove)
            .unwrap();
        assert_eq!(carved.image.dimensions(), (7, 9));
        assert_eq!(carved.seams.len(), 5);

        let carved = scheduler
            .apply_batch(&stripes(12, 9), 4, Axis::Horizontal, Mutation::Insert)
            .unwrap();
        assert_eq!(carved.image.dimensions(), (12, 13));
        assert_eq!(carved.seams.axis(), Axis::Horizontal);
    }

    #[test]
    fn seams_in_a_batch_never_overlap() {
        let scheduler = BatchScheduler::new(&Sequential, 16);
        let image = stripes(10, 6);
        let carved = scheduler
            .apply_batch(&image, 6, Axis::Vertical, Mutation::Remove)
            .unwrap();
        assert_eq!(carved.image.dimensions(), (4, 6));
        assert_eq!(carved.seams.len(), 6);
        carved.seams.validate(10, 6).unwrap();
    }

    #[test]
    fn small_batch_sizes_split_the_work() {
        let scheduler = BatchScheduler::new(&Sequential, 2);
        let carved = scheduler
            .apply_batch(&stripes(12, 9), 5, Axis::Vertical, Mutation::Remove)
            .unwrap();
        assert_eq!(carved.image.dimensions(), (7, 9));
        // Sub-batches of 2, 2 and then 1.
        assert_eq!(carved.seams.len(), 1);
    }

    #[test]
    fn a_batch_commits_exactly_the_seams_it_reports() {
        let scheduler = BatchScheduler::new(&Sequential, 16);
        let image = stripes(9, 7);
        let carved = scheduler
            .apply_batch(&image, 3, Axis::Vertical, Mutation::Remove)
            .unwrap();
        assert_eq!(
            apply_seams(&image, &carved.seams, Mutation::Remove).unwrap(),
            carved.image
        );

        let carved = scheduler
            .apply_batch(&image, 3, Axis::Horizontal, Mutation::Insert)
            .unwrap();
        assert_eq!(
            apply_seams(&image, &carved.seams, Mutation::Insert).unwrap(),
            carved.image
        );
    }

    #[test]
    fn removing_everything_is_refused() {
        let scheduler = BatchScheduler::new(&Sequential, 16);
        let image = stripes(4, 4);
        match scheduler.apply_batch(&image, 4, Axis::Vertical, Mutation::Remove) {
            Err(CarveError::InvalidDimension { width, .. }) => assert_eq!(width, 4),
            other => panic!("expected an invalid dimension, got {:?}", other.map(|c| c.image)),
        }
        let line = stripes(1, 4);
        assert!(scheduler
            .apply_batch(&line, 1, Axis::Vertical, Mutation::Remove)
            .is_err());
    }

    #[test]
    fn oversized_insertions_are_refused() {
        let scheduler = BatchScheduler::new(&Sequential, 8);
        let image = PixelBuffer::filled(4, 4, gray(50.0)).unwrap();
        for axis in &[Axis::Vertical, Axis::Horizontal] {
            match scheduler.apply_batch(&image, u32::max_value(), *axis, Mutation::Insert) {
                Err(CarveError::InvalidDimension { axis: refused, .. }) => assert_eq!(refused, *axis),
                other => panic!("expected an invalid dimension, got {:?}", other.map(|c| c.image)),
            }
        }
    }

    #[test]
    fn an_empty_upright_image_reports_the_callers_axis() {
        let scheduler = BatchScheduler::new(&Sequential, 8);
        let upright = PixelBuffer::new(1, 3);
        match scheduler.sub_batch(&upright, 1, Axis::Horizontal, Mutation::Remove) {
            Err(CarveError::InvalidDimension { axis, width, height, .. }) => {
                assert_eq!((axis, width, height), (Axis::Horizontal, 3, 1))
            }
            other => panic!("expected an invalid dimension, got {:?}", other.map(|c| c.0)),
        }
    }

    #[test]
    fn zero_seams_is_a_no_op() {
        let scheduler = BatchScheduler::new(&Sequential, 16);
        let image = stripes(4, 4);
        let carved = scheduler
            .apply_batch(&image, 0, Axis::Horizontal, Mutation::Insert)
            .unwrap();
        assert_eq!(carved.image, image);
        assert!(carved.seams.is_empty());
    }
}
