// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The cumulative cost table
//!
//! The dynamic-programming half of the seam search.  For a vertical
//! seam, every cell holds the cheapest total energy of any connected
//! path from the top row down to it, and a pointer back up to the
//! cell that path came through:
//!
//! ```text
//!                  ⎧ M(x−1,y−1)
//! M(x,y)=e(x,y)+min⎨ M(x,y−1)
//!                  ⎩ M(x+1,y−1)
//! ```
//!
//! Horizontal tables are the same table built over the transposed
//! energy map; the accessors translate coordinates back.
//!
//! Once a seam has been taken, `consume` walls its cells off with an
//! infinite cost so the next seam out of the same table can't touch
//! them.

use crate::energy::EnergyMap;
use crate::error::{CarveError, Result};
use crate::orientation::{transpose, Axis};
use crate::twodmap::TwoDimensionalMap;

#[derive(Default, Debug, Copy, Clone, PartialEq)]
struct CostAndBackPointer {
    cost: f32,
    // -1, 0 or +1: where the cheapest path into this cell came from,
    // relative to this cell, on the previous scan line.
    parent: i8,
}

/// Cumulative costs and backtrack directions for one axis.
///
/// Internally the table is always laid out in scan order: row `y` is
/// scan line `y`, whether that is an image row (vertical seams) or an
/// image column (horizontal seams).
#[derive(Debug, Clone)]
pub struct CumulativeCostTable {
    axis: Axis,
    energy: EnergyMap,
    cells: TwoDimensionalMap<CostAndBackPointer>,
    consumed: TwoDimensionalMap<bool>,
}

impl CumulativeCostTable {
    /// Accumulate an energy map along `axis`.  Fails if the map has no
    /// rows or columns.
    pub fn build(energy: &EnergyMap, axis: Axis) -> Result<Self> {
        let (width, height) = energy.dimensions();
        if width == 0 || height == 0 {
            return Err(CarveError::InvalidDimension {
                axis,
                width,
                height,
                reason: "cannot accumulate costs over an empty map",
            });
        }

        let energy = match axis {
            Axis::Vertical => energy.clone(),
            Axis::Horizontal => transpose(energy),
        };
        let (breadth, lines) = energy.dimensions();
        let mut table = CumulativeCostTable {
            axis,
            cells: TwoDimensionalMap::new(breadth, lines),
            consumed: TwoDimensionalMap::new(breadth, lines),
            energy,
        };

        // Populate the first line with their native energies.
        for x in 0..breadth {
            table.cells[(x, 0)].cost = table.energy[(x, 0)];
        }
        for y in 1..lines {
            for x in 0..breadth {
                table.cells[(x, y)] = table.relax(x, y);
            }
        }
        Ok(table)
    }

    // The cheapest way into (x, y) from the line above.  Center first,
    // then left, then right; a later candidate only wins if it is
    // strictly cheaper, so ties go center, then left.
    fn relax(&self, x: u32, y: u32) -> CostAndBackPointer {
        if self.consumed[(x, y)] {
            return CostAndBackPointer {
                cost: std::f32::INFINITY,
                parent: 0,
            };
        }
        let above = y - 1;
        let mut best = CostAndBackPointer {
            cost: self.cells[(x, above)].cost,
            parent: 0,
        };
        if x > 0 && self.cells[(x - 1, above)].cost < best.cost {
            best = CostAndBackPointer {
                cost: self.cells[(x - 1, above)].cost,
                parent: -1,
            };
        }
        if x + 1 < self.cells.width() && self.cells[(x + 1, above)].cost < best.cost {
            best = CostAndBackPointer {
                cost: self.cells[(x + 1, above)].cost,
                parent: 1,
            };
        }
        best.cost += self.energy[(x, y)];
        best
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Width and height of the image this table was built for.
    pub fn dimensions(&self) -> (u32, u32) {
        let (breadth, lines) = self.cells.dimensions();
        match self.axis {
            Axis::Vertical => (breadth, lines),
            Axis::Horizontal => (lines, breadth),
        }
    }

    // Number of scan lines, which is also the length of every seam.
    pub(crate) fn lines(&self) -> u32 {
        self.cells.height()
    }

    // Number of cells on each scan line.
    pub(crate) fn breadth(&self) -> u32 {
        self.cells.width()
    }

    fn scan_address(&self, x: u32, y: u32) -> (u32, u32) {
        match self.axis {
            Axis::Vertical => (x, y),
            Axis::Horizontal => (y, x),
        }
    }

    /// The cumulative cost at image coordinate `(x, y)`.
    pub fn cost(&self, x: u32, y: u32) -> f32 {
        self.cells[self.scan_address(x, y)].cost
    }

    /// The backtrack direction at image coordinate `(x, y)`: -1, 0 or
    /// +1 along the carved dimension.
    pub fn direction(&self, x: u32, y: u32) -> i8 {
        self.cells[self.scan_address(x, y)].parent
    }

    pub(crate) fn scan_cost(&self, position: u32, line: u32) -> f32 {
        self.cells[(position, line)].cost
    }

    pub(crate) fn scan_parent(&self, position: u32, line: u32) -> i8 {
        self.cells[(position, line)].parent
    }

    /// The cheapest cell on the last scan line, lowest position first
    /// on ties.  `None` when every cell there is infinitely expensive.
    pub fn best_terminal(&self) -> Option<(u32, f32)> {
        let last = self.lines() - 1;
        let mut best: Option<(u32, f32)> = None;
        for x in 0..self.breadth() {
            let cost = self.scan_cost(x, last);
            if cost.is_finite() && best.map_or(true, |(_, c)| cost < c) {
                best = Some((x, cost));
            }
        }
        best
    }

    /// Wall off a seam.  Its cells cost infinity from now on, and every
    /// cell below whose cheapest path ran through one of them is
    /// repaired.  `positions` holds one scan position per scan line.
    ///
    /// The repair only revisits the band of positions that can have
    /// changed: it starts at the seam's first cell and widens by one on
    /// each side per line, narrowing again to the cells that actually
    /// changed.
    pub fn consume(&mut self, positions: &[u32]) {
        let breadth = self.breadth();
        debug_assert_eq!(positions.len(), self.lines() as usize);

        for (y, x) in positions.iter().enumerate() {
            self.consumed[(*x, y as u32)] = true;
        }

        let first = positions[0];
        self.cells[(first, 0)] = CostAndBackPointer {
            cost: std::f32::INFINITY,
            parent: 0,
        };
        let (mut lo, mut hi) = (first, first);

        for (y, seam_x) in positions.iter().enumerate().skip(1) {
            let y = y as u32;
            let start = lo.saturating_sub(1).min(*seam_x);
            let end = (hi + 1).min(breadth - 1).max(*seam_x);
            let mut changed: Option<(u32, u32)> = None;
            for x in start..=end {
                let repaired = self.relax(x, y);
                if repaired != self.cells[(x, y)] || x == *seam_x {
                    self.cells[(x, y)] = repaired;
                    changed = Some(changed.map_or((x, x), |(l, _)| (l, x)));
                }
            }
            // The seam cell itself always counts as changed.
            if let Some((l, h)) = changed {
                lo = l;
                hi = h;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENERGY_DATA: [f32; 20] = [
        9., 9., 0., 9., 9., 9., 1., 9., 8., 9., 9., 9., 9., 9., 0., 9., 9., 9., 0., 9.,
    ];

    fn energies() -> EnergyMap {
        EnergyMap::from_vec(5, 4, ENERGY_DATA.to_vec()).unwrap()
    }

    #[test]
    fn first_row_is_seeded_from_energy() {
        let table = CumulativeCostTable::build(&energies(), Axis::Vertical).unwrap();
        for x in 0..5 {
            assert_eq!(table.cost(x, 0), ENERGY_DATA[x as usize]);
        }
    }

    #[test]
    fn every_cell_is_its_energy_plus_the_cheapest_parent() {
        let energy = energies();
        let table = CumulativeCostTable::build(&energy, Axis::Vertical).unwrap();
        for y in 1..4 {
            for x in 0..5u32 {
                let lo = x.saturating_sub(1);
                let hi = (x + 1).min(4);
                let cheapest = (lo..=hi)
                    .map(|px| table.cost(px, y - 1))
                    .fold(std::f32::INFINITY, f32::min);
                assert_eq!(table.cost(x, y), energy[(x, y)] + cheapest);
                let parent = (x as i64 + table.direction(x, y) as i64) as u32;
                assert_eq!(table.cost(parent, y - 1), cheapest);
            }
        }
    }

    #[test]
    fn ties_prefer_center_then_left() {
        let flat = EnergyMap::from_vec(3, 2, vec![1., 1., 1., 1., 1., 1.]).unwrap();
        let table = CumulativeCostTable::build(&flat, Axis::Vertical).unwrap();
        assert_eq!(table.direction(0, 1), 0);
        assert_eq!(table.direction(1, 1), 0);
        assert_eq!(table.direction(2, 1), 0);

        let valley = EnergyMap::from_vec(3, 2, vec![0., 5., 0., 1., 1., 1.]).unwrap();
        let table = CumulativeCostTable::build(&valley, Axis::Vertical).unwrap();
        assert_eq!(table.direction(1, 1), -1);
    }

    #[test]
    fn horizontal_tables_scan_columns() {
        let energy = energies();
        let table = CumulativeCostTable::build(&energy, Axis::Horizontal).unwrap();
        assert_eq!(table.dimensions(), (5, 4));
        for y in 0..4 {
            assert_eq!(table.cost(0, y), energy[(0, y)]);
        }
        // (1, 0) can only come from (0, 0) or (0, 1).
        let expected = energy[(1, 0)] + energy[(0, 0)].min(energy[(0, 1)]);
        assert_eq!(table.cost(1, 0), expected);
    }

    #[test]
    fn empty_maps_are_refused() {
        let empty = EnergyMap::new(0, 3);
        assert!(CumulativeCostTable::build(&empty, Axis::Vertical).is_err());
    }

    #[test]
    fn consumed_cells_are_never_on_a_finite_path() {
        let energy = energies();
        let mut table = CumulativeCostTable::build(&energy, Axis::Vertical).unwrap();
        let seam = [2, 3, 4, 3];
        table.consume(&seam);

        for (y, x) in seam.iter().enumerate() {
            assert!(table.cost(*x, y as u32).is_infinite());
        }
        // Every finite cell's parent is finite, so no finite path can
        // run through the seam.
        for y in 1..4 {
            for x in 0..5u32 {
                if table.cost(x, y).is_finite() {
                    let parent = (x as i64 + table.direction(x, y) as i64) as u32;
                    assert!(table.cost(parent, y - 1).is_finite());
                }
            }
        }
    }

    #[test]
    fn repair_matches_a_rebuild_over_walled_energy() {
        let energy = energies();
        let mut table = CumulativeCostTable::build(&energy, Axis::Vertical).unwrap();
        let seam = [2, 3, 4, 3];
        table.consume(&seam);

        let mut walled = energy.clone();
        for (y, x) in seam.iter().enumerate() {
            walled[(*x, y as u32)] = std::f32::INFINITY;
        }
        let rebuilt = CumulativeCostTable::build(&walled, Axis::Vertical).unwrap();
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(table.cost(x, y), rebuilt.cost(x, y));
            }
        }
    }
}
