// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seams, and how to find them
//!
//! A seam is a connected path through the image: one x coordinate per
//! row for a vertical seam, one y coordinate per column for a
//! horizontal one.  Neighboring coordinates never differ by more than
//! one.

use crate::costmap::CumulativeCostTable;
use crate::error::{CarveError, Result};
use crate::orientation::Axis;
use itertools::Itertools;

/// A single seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam {
    axis: Axis,
    coordinates: Vec<u32>,
}

impl Seam {
    pub fn new(axis: Axis, coordinates: Vec<u32>) -> Self {
        Seam { axis, coordinates }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The carved-dimension coordinate on each scan line, in order.
    pub fn coordinates(&self) -> &[u32] {
        &self.coordinates
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Every `(x, y)` pixel address on the seam.
    pub fn pixels<'a>(&'a self) -> impl Iterator<Item = (u32, u32)> + 'a {
        let axis = self.axis;
        self.coordinates
            .iter()
            .enumerate()
            .map(move |(line, c)| match axis {
                Axis::Vertical => (*c, line as u32),
                Axis::Horizontal => (line as u32, *c),
            })
    }

    /// Check the seam against a `width x height` image: one coordinate
    /// per scan line, all in range, no step larger than one.
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        let malformed = |position: usize, reason: &'static str| CarveError::MalformedSeam {
            width,
            height,
            position,
            reason,
        };
        let expected = self.axis.seam_extent(width, height) as usize;
        if self.coordinates.len() != expected {
            return Err(malformed(
                self.coordinates.len(),
                "seam length does not match the image",
            ));
        }
        let limit = self.axis.carved_extent(width, height);
        if let Some(position) = self.coordinates.iter().position(|c| *c >= limit) {
            return Err(malformed(position, "seam coordinate outside the image"));
        }
        if let Some(position) = self
            .coordinates
            .iter()
            .tuple_windows()
            .position(|(a, b)| (*a as i64 - *b as i64).abs() > 1)
        {
            return Err(malformed(position + 1, "seam is not connected"));
        }
        Ok(())
    }
}

/// Seams extracted from one cost table, to be committed together.
/// Coordinates all refer to the image the table was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeamBatch {
    axis: Axis,
    seams: Vec<Seam>,
}

impl SeamBatch {
    pub fn new(axis: Axis) -> Self {
        SeamBatch {
            axis,
            seams: Vec::new(),
        }
    }

    /// Wrap a set of seams.  They must all run along `axis`.
    pub fn from_seams(axis: Axis, seams: Vec<Seam>) -> Result<Self> {
        if let Some(position) = seams.iter().position(|s| s.axis() != axis) {
            return Err(CarveError::MalformedSeam {
                width: 0,
                height: 0,
                position,
                reason: "seam runs along the wrong axis for its batch",
            });
        }
        Ok(SeamBatch { axis, seams })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn seams(&self) -> &[Seam] {
        &self.seams
    }

    pub fn len(&self) -> usize {
        self.seams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seams.is_empty()
    }

    pub(crate) fn push(&mut self, seam: Seam) {
        debug_assert_eq!(seam.axis(), self.axis);
        self.seams.push(seam);
    }

    /// Validate every seam, and make sure no two of them share a pixel.
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        for seam in &self.seams {
            seam.validate(width, height)?;
        }
        self.index(width, height).map(|_| ())
    }

    /// Flatten the batch into a `SeamIndex` for an image of the given
    /// size, checking that no two seams share a pixel.  Connectivity
    /// and range are `validate`'s business.
    pub fn index(&self, width: u32, height: u32) -> Result<SeamIndex> {
        let lines = self.axis.seam_extent(width, height) as usize;
        let per_line = self.seams.len();
        if let Some(position) = self.seams.iter().position(|s| s.len() != lines) {
            return Err(CarveError::MalformedSeam {
                width,
                height,
                position,
                reason: "seam length does not match the image",
            });
        }
        let mut coordinates = vec![0u32; lines * per_line];
        if per_line == 0 {
            return Ok(SeamIndex {
                per_line,
                coordinates,
            });
        }
        for (line, slot) in coordinates.chunks_mut(per_line).enumerate() {
            for (s, seam) in self.seams.iter().enumerate() {
                slot[s] = seam.coordinates()[line];
            }
            slot.sort_unstable();
            if slot.iter().tuple_windows().any(|(a, b)| a == b) {
                return Err(CarveError::MalformedSeam {
                    width,
                    height,
                    position: line,
                    reason: "two seams in one batch share a pixel",
                });
            }
        }
        Ok(SeamIndex {
            per_line,
            coordinates,
        })
    }
}

/// A batch flattened into a fixed-size array: for every scan line,
/// the carved coordinates of all `per_line` seams, ascending.  Each
/// output line of a recomposition can be built from its slice alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeamIndex {
    per_line: usize,
    coordinates: Vec<u32>,
}

impl SeamIndex {
    /// How many seams cross every line.
    pub fn per_line(&self) -> usize {
        self.per_line
    }

    /// The sorted seam coordinates on one line.
    pub fn line(&self, line: u32) -> &[u32] {
        let start = line as usize * self.per_line;
        &self.coordinates[start..start + self.per_line]
    }
}

/// Find the single cheapest seam in a cost table: the lowest-cost
/// cell on the last scan line, lowest index first, traced back to the
/// first line along the stored directions.  Fails once consumed
/// seams have walled off every cell on the last line.
pub fn extract_seam(table: &CumulativeCostTable) -> Result<Seam> {
    let (lines, breadth) = (table.lines(), table.breadth());
    if lines == 0 || breadth == 0 {
        let (width, height) = table.dimensions();
        return Err(CarveError::InvalidDimension {
            axis: table.axis(),
            width,
            height,
            reason: "cannot extract a seam from an empty table",
        });
    }

    let mut seam_col = match table.best_terminal() {
        Some((position, _)) => position,
        None => {
            let (width, height) = table.dimensions();
            return Err(CarveError::InvalidDimension {
                axis: table.axis(),
                width,
                height,
                reason: "every seam through the table has been consumed",
            });
        }
    };

    // Working backwards, generate a vec of coordinates that map to
    // the seam, reverse and return.
    let coordinates = (0..lines)
        .rev()
        .fold(Vec::<u32>::with_capacity(lines as usize), |mut acc, y| {
            acc.push(seam_col);
            seam_col = (seam_col as i64 + table.scan_parent(seam_col, y) as i64) as u32;
            acc
        })
        .into_iter()
        .rev()
        .collect();
    Ok(Seam::new(table.axis(), coordinates))
}
