//! Character cell grid
//!
//! A fixed `COLS × ROWS` matrix of [`Cell`]s plus its [`DirtyMap`]. Writes go
//! through a cursor and use the current foreground/background indices.
//!
//! Invert is resolved when a cell is written: the two palette nibbles are
//! simply stored swapped, so the rasterizer never needs to know about it.

use crate::dirty::DirtyMap;

/// First representable raw character (space)
pub const FIRST_PRINTABLE: u8 = 32;

/// Last representable raw character
pub const LAST_PRINTABLE: u8 = 127;

/// One character cell
///
/// `colors` packs the primary palette index (drawn where the glyph bit is
/// set) in bits 4–7 and the secondary index in bits 0–3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    /// Glyph code, `raw - 32`
    pub glyph: u8,
    /// Packed palette indices
    pub colors: u8,
}

impl Cell {
    /// Blank cell: space glyph, index 0 on index 0
    pub const BLANK: Cell = Cell {
        glyph: 0,
        colors: 0,
    };

    /// Build a cell from a glyph code and the two palette indices
    pub const fn new(glyph: u8, primary: u8, secondary: u8) -> Self {
        Self {
            glyph,
            colors: ((primary & 0x0F) << 4) | (secondary & 0x0F),
        }
    }

    /// Build a cell for a raw character
    ///
    /// Returns `None` for characters outside `32..=127`.
    pub const fn from_char(raw: u8, fg: u8, bg: u8, invert: bool) -> Option<Self> {
        if raw < FIRST_PRINTABLE || raw > LAST_PRINTABLE {
            return None;
        }
        let glyph = raw - FIRST_PRINTABLE;
        Some(if invert {
            Self::new(glyph, bg, fg)
        } else {
            Self::new(glyph, fg, bg)
        })
    }

    /// Palette index for set glyph bits
    #[inline]
    pub const fn primary(&self) -> u8 {
        self.colors >> 4
    }

    /// Palette index for clear glyph bits
    #[inline]
    pub const fn secondary(&self) -> u8 {
        self.colors & 0x0F
    }

    /// Same glyph with primary and secondary exchanged
    pub const fn inverted(&self) -> Self {
        Self::new(self.glyph, self.secondary(), self.primary())
    }
}

/// Text grid with cursor, current colors and change tracking
///
/// `COLS` is capped at 64 because each row's dirty bits live in one `u64`
/// word; a wider grid is rejected at compile time. A 320 px panel with 6 px
/// glyphs gives 53 columns; a 480 px panel needs glyphs at least 8 px wide.
#[derive(Debug, Clone)]
pub struct CellGrid<const COLS: usize, const ROWS: usize> {
    cells: [[Cell; COLS]; ROWS],
    dirty: DirtyMap<COLS, ROWS>,
    fg: u8,
    bg: u8,
    cursor_x: u16,
    cursor_y: u16,
}

impl<const COLS: usize, const ROWS: usize> Default for CellGrid<COLS, ROWS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const COLS: usize, const ROWS: usize> CellGrid<COLS, ROWS> {
    /// Create a blank grid with a clean dirty map
    ///
    /// Default colors are foreground 8 (white) on background 0 (black).
    pub const fn new() -> Self {
        Self {
            cells: [[Cell::BLANK; COLS]; ROWS],
            dirty: DirtyMap::new(),
            fg: 8,
            bg: 0,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    /// Number of columns
    pub const fn cols(&self) -> usize {
        COLS
    }

    /// Number of rows
    pub const fn rows(&self) -> usize {
        ROWS
    }

    /// Set the foreground palette index for subsequent writes
    pub fn set_foreground(&mut self, index: u8) {
        self.fg = index & 0x0F;
    }

    /// Set the background palette index for subsequent writes
    pub fn set_background(&mut self, index: u8) {
        self.bg = index & 0x0F;
    }

    /// Current foreground index
    pub fn foreground(&self) -> u8 {
        self.fg
    }

    /// Current background index
    pub fn background(&self) -> u8 {
        self.bg
    }

    /// Move the write cursor
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    /// Write cursor as `(x, y)`
    pub fn cursor(&self) -> (u16, u16) {
        (self.cursor_x, self.cursor_y)
    }

    /// Write one character at the cursor without moving it
    ///
    /// Unrepresentable characters and a cursor outside the grid leave the
    /// cell and its dirty bit untouched.
    pub fn put_char(&mut self, raw: u8, invert: bool) {
        let (x, y) = (usize::from(self.cursor_x), usize::from(self.cursor_y));
        if x >= COLS || y >= ROWS {
            return;
        }
        if let Some(cell) = Cell::from_char(raw, self.fg, self.bg, invert) {
            self.cells[y][x] = cell;
            self.dirty.set(x, y);
        }
    }

    /// Write bytes starting at the cursor, one cell each, advancing the cursor
    ///
    /// No wrapping: anything past the right edge is dropped.
    pub fn write(&mut self, text: &[u8], invert: bool) {
        for &raw in text {
            self.put_char(raw, invert);
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    /// Write a string at the cursor, advancing the cursor
    pub fn print(&mut self, text: &str, invert: bool) {
        self.write(text.as_bytes(), invert);
    }

    /// Read a cell
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.cells
            .get(usize::from(y))
            .and_then(|row| row.get(usize::from(x)))
            .copied()
    }

    /// Blank every cell on `bg`, home the cursor and mark everything dirty
    pub fn clear(&mut self, bg: u8) {
        let blank = Cell::new(0, self.fg, bg);
        for row in self.cells.iter_mut() {
            row.fill(blank);
        }
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.dirty.set_all();
    }

    /// Swap primary and secondary colors over a run of cells in one row
    pub fn invert_region(&mut self, x: u16, y: u16, width: u16) {
        let (x, y) = (usize::from(x), usize::from(y));
        let Some(row) = self.cells.get_mut(y) else {
            return;
        };
        let end = (x + usize::from(width)).min(COLS);
        if x >= end {
            return;
        }
        for cell in &mut row[x..end] {
            *cell = cell.inverted();
        }
        self.dirty.set_span(x, y, end - x);
    }

    /// Mark every cell for redraw (after a palette or font change)
    pub fn mark_all_dirty(&mut self) {
        self.dirty.set_all();
    }

    /// Change tracking
    pub fn dirty(&self) -> &DirtyMap<COLS, ROWS> {
        &self.dirty
    }

    /// Mutable change tracking
    pub fn dirty_mut(&mut self) -> &mut DirtyMap<COLS, ROWS> {
        &mut self.dirty
    }

    /// Take the pending changes, leaving the grid clean
    pub fn take_dirty(&mut self) -> DirtyMap<COLS, ROWS> {
        self.dirty.take()
    }

    /// Cell lookup for the rasterizer; caller guarantees bounds
    #[inline]
    pub(crate) fn cell_at(&self, x: usize, y: usize) -> Cell {
        self.cells[y][x]
    }
}
