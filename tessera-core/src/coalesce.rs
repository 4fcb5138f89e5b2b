//! Dirty-region coalescing
//!
//! Turns a [`DirtyMap`] into rectangles of cells to redraw. Two strategies:
//!
//! - [`coalesce`]: greedy maximal rectangles. Scanning in row-major order, the
//!   first dirty cell becomes a top-left corner; the rectangle grows down its
//!   column as far as the cells are dirty, then right one whole column at a
//!   time. A column that is only partly dirty is put back and ends the
//!   growth. Height wins over width; this is not an optimal decomposition.
//! - [`per_cell`]: one 1×1 rectangle per dirty cell.
//!
//! Both consume bits as they go, so every dirty cell is emitted exactly once
//! and a second pass over the same map yields nothing.

use crate::dirty::DirtyMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    /// Create a rectangle
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of cells covered
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Whether cell `(x, y)` lies inside
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x - self.x) < self.width
            && (y - self.y) < self.height
    }
}

/// How a flush turns dirty cells into draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RedrawPolicy {
    /// Merge into greedy maximal rectangles (fewer, larger draws)
    #[default]
    Coalesce,
    /// One draw per dirty cell (cheaper to plan, more draws)
    PerCell,
    /// Per-cell while at most `max_cells` are dirty, coalesce above that
    Auto { max_cells: u16 },
}

impl RedrawPolicy {
    /// Start draining a map according to this policy
    pub fn regions<const COLS: usize, const ROWS: usize>(
        self,
        map: &mut DirtyMap<COLS, ROWS>,
    ) -> Regions<'_, COLS, ROWS> {
        let per_cell_mode = match self {
            RedrawPolicy::Coalesce => false,
            RedrawPolicy::PerCell => true,
            RedrawPolicy::Auto { max_cells } => map.count() <= usize::from(max_cells),
        };
        if per_cell_mode {
            Regions::PerCell(per_cell(map))
        } else {
            Regions::Coalesce(coalesce(map))
        }
    }
}

/// Row-major scan position shared by both strategies
#[derive(Debug, Clone, Copy)]
struct Scan {
    x: usize,
    y: usize,
}

impl Scan {
    const fn start() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Find the next dirty cell at or after the scan position
    fn next_dirty<const COLS: usize, const ROWS: usize>(
        &mut self,
        map: &DirtyMap<COLS, ROWS>,
    ) -> Option<(usize, usize)> {
        while self.y < ROWS {
            if self.x < COLS {
                let pending = map.row_bits(self.y) & (u64::MAX << self.x);
                if pending != 0 {
                    let x = pending.trailing_zeros() as usize;
                    self.x = x + 1;
                    return Some((x, self.y));
                }
            }
            self.x = 0;
            self.y += 1;
        }
        None
    }
}

/// Greedy rectangle iterator, see [`coalesce`]
pub struct Coalesce<'a, const COLS: usize, const ROWS: usize> {
    map: &'a mut DirtyMap<COLS, ROWS>,
    scan: Scan,
}

/// Drain `map` into greedy maximal rectangles
///
/// Bits are cleared as each rectangle is finalized; dropping the iterator
/// early leaves the remaining cells dirty.
pub fn coalesce<const COLS: usize, const ROWS: usize>(
    map: &mut DirtyMap<COLS, ROWS>,
) -> Coalesce<'_, COLS, ROWS> {
    Coalesce {
        map,
        scan: Scan::start(),
    }
}

impl<const COLS: usize, const ROWS: usize> Iterator for Coalesce<'_, COLS, ROWS> {
    type Item = CellRect;

    fn next(&mut self) -> Option<CellRect> {
        let (x, y) = self.scan.next_dirty(self.map)?;
        let map = &mut *self.map;
        map.clear(x, y);

        // Grow down the starting column
        let mut height = 1;
        while y + height < ROWS && map.is_set(x, y + height) {
            map.clear(x, y + height);
            height += 1;
        }

        // Grow right while whole columns are dirty
        let mut width = 1;
        'grow: while x + width < COLS {
            let probe_x = x + width;
            for probe_y in y..y + height {
                if !map.is_set(probe_x, probe_y) {
                    // Put back what this column already consumed
                    for undo_y in y..probe_y {
                        map.set(probe_x, undo_y);
                    }
                    break 'grow;
                }
                map.clear(probe_x, probe_y);
            }
            width += 1;
        }

        Some(CellRect::new(x as u16, y as u16, width as u16, height as u16))
    }
}

/// Single-cell iterator, see [`per_cell`]
pub struct PerCell<'a, const COLS: usize, const ROWS: usize> {
    map: &'a mut DirtyMap<COLS, ROWS>,
    scan: Scan,
}

/// Drain `map` as one 1×1 rectangle per dirty cell
pub fn per_cell<const COLS: usize, const ROWS: usize>(
    map: &mut DirtyMap<COLS, ROWS>,
) -> PerCell<'_, COLS, ROWS> {
    PerCell {
        map,
        scan: Scan::start(),
    }
}

impl<const COLS: usize, const ROWS: usize> Iterator for PerCell<'_, COLS, ROWS> {
    type Item = CellRect;

    fn next(&mut self) -> Option<CellRect> {
        let (x, y) = self.scan.next_dirty(self.map)?;
        self.map.clear(x, y);
        Some(CellRect::new(x as u16, y as u16, 1, 1))
    }
}

/// Iterator chosen by a [`RedrawPolicy`]
pub enum Regions<'a, const COLS: usize, const ROWS: usize> {
    Coalesce(Coalesce<'a, COLS, ROWS>),
    PerCell(PerCell<'a, COLS, ROWS>),
}

impl<const COLS: usize, const ROWS: usize> Iterator for Regions<'_, COLS, ROWS> {
    type Item = CellRect;

    fn next(&mut self) -> Option<CellRect> {
        match self {
            Regions::Coalesce(it) => it.next(),
            Regions::PerCell(it) => it.next(),
        }
    }
}
