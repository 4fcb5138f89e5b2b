//! Bit-per-cell change tracking
//!
//! One `u64` word per grid row, bit `x` set when cell `(x, y)` changed since
//! it was last drawn. Logically this is the row-major bit array
//! `index = y * COLS + x`; the per-row words let the coalescer skip clean
//! spans with a single `trailing_zeros`.

/// Dirty bitmap for a `COLS × ROWS` grid
///
/// `COLS` must be 1 to 64: each row is a single `u64` word and wider maps
/// fail to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyMap<const COLS: usize, const ROWS: usize> {
    rows: [u64; ROWS],
}

impl<const COLS: usize, const ROWS: usize> Default for DirtyMap<COLS, ROWS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const COLS: usize, const ROWS: usize> DirtyMap<COLS, ROWS> {
    const FITS: () = assert!(COLS > 0 && COLS <= 64, "grid rows must fit in one u64 word");

    /// Mask of the valid bits in a row word
    const ROW_MASK: u64 = if COLS >= 64 {
        u64::MAX
    } else {
        (1u64 << COLS) - 1
    };

    /// Create an all-clear map
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS;
        Self { rows: [0; ROWS] }
    }

    /// Number of columns
    pub const fn cols(&self) -> usize {
        COLS
    }

    /// Number of rows
    pub const fn rows(&self) -> usize {
        ROWS
    }

    /// Test a cell; out-of-range cells read as clean
    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < COLS && y < ROWS && self.rows[y] & (1 << x) != 0
    }

    /// Mark a cell dirty; out-of-range cells are ignored
    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        if x < COLS && y < ROWS {
            self.rows[y] |= 1 << x;
        }
    }

    /// Mark a cell clean; out-of-range cells are ignored
    #[inline]
    pub fn clear(&mut self, x: usize, y: usize) {
        if x < COLS && y < ROWS {
            self.rows[y] &= !(1 << x);
        }
    }

    /// Mark a horizontal run of cells dirty, clipped to the row
    pub fn set_span(&mut self, x: usize, y: usize, width: usize) {
        if y >= ROWS || x >= COLS || width == 0 {
            return;
        }
        let end = (x + width).min(COLS);
        let span = if end - x >= 64 {
            u64::MAX
        } else {
            ((1u64 << (end - x)) - 1) << x
        };
        self.rows[y] |= span;
    }

    /// Mark every cell dirty
    pub fn set_all(&mut self) {
        self.rows = [Self::ROW_MASK; ROWS];
    }

    /// Mark every cell clean
    pub fn clear_all(&mut self) {
        self.rows = [0; ROWS];
    }

    /// Number of dirty cells
    pub fn count(&self) -> usize {
        self.rows.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether no cell is dirty
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|&w| w == 0)
    }

    /// Raw word for a row (bit `x` = column `x`)
    #[inline]
    pub fn row_bits(&self, y: usize) -> u64 {
        self.rows.get(y).copied().unwrap_or(0)
    }

    /// Mark every cell of a `width × height` block dirty, clipped to the grid
    pub fn set_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        for row in y..y.saturating_add(height).min(ROWS) {
            self.set_span(x, row, width);
        }
    }

    /// Mark every cell that is dirty in `other`
    pub fn merge(&mut self, other: &Self) {
        for (word, extra) in self.rows.iter_mut().zip(other.rows.iter()) {
            *word |= extra;
        }
    }

    /// Return the current map and leave this one all-clear
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_clean() {
        let map = DirtyMap::<40, 20>::new();
        assert!(map.is_empty());
        assert_eq!(map.count(), 0);
    }

    #[test]
    fn test_set_and_clear() {
        let mut map = DirtyMap::<40, 20>::new();
        map.set(39, 19);
        map.set(0, 0);
        assert!(map.is_set(39, 19));
        assert!(map.is_set(0, 0));
        assert_eq!(map.count(), 2);

        map.clear(39, 19);
        assert!(!map.is_set(39, 19));
        assert_eq!(map.count(), 1);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut map = DirtyMap::<40, 20>::new();
        map.set(40, 0);
        map.set(0, 20);
        assert!(map.is_empty());
        assert!(!map.is_set(40, 0));
    }

    #[test]
    fn test_set_all_respects_width() {
        let mut map = DirtyMap::<40, 3>::new();
        map.set_all();
        assert_eq!(map.count(), 120);
        assert_eq!(map.row_bits(0), (1u64 << 40) - 1);

        let mut wide = DirtyMap::<64, 2>::new();
        wide.set_all();
        assert_eq!(wide.count(), 128);
    }

    #[test]
    fn test_set_span_clips() {
        let mut map = DirtyMap::<10, 2>::new();
        map.set_span(7, 1, 8);
        assert_eq!(map.row_bits(1), 0b11_1000_0000);
        assert_eq!(map.count(), 3);
    }

    #[test]
    fn test_set_rect_and_merge() {
        let mut map = DirtyMap::<8, 4>::new();
        map.set_rect(6, 2, 5, 5);
        assert_eq!(map.row_bits(2), 0b1100_0000);
        assert_eq!(map.row_bits(3), 0b1100_0000);
        assert_eq!(map.count(), 4);

        let mut other = DirtyMap::<8, 4>::new();
        other.set(0, 0);
        other.set(6, 2);
        map.merge(&other);
        assert!(map.is_set(0, 0));
        assert_eq!(map.count(), 5);
    }

    #[test]
    fn test_take_clears_source() {
        let mut map = DirtyMap::<8, 8>::new();
        map.set(3, 4);
        let taken = map.take();
        assert!(map.is_empty());
        assert!(taken.is_set(3, 4));
    }
}
