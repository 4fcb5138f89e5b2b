//! Text backend trait
//!
//! Row/column text interface for UI code that does not care how characters
//! reach the glass. The [`Renderer`] implements it directly; other display
//! types can implement it with their own storage.

use core::fmt::{self, Write};

use heapless::String;
use tessera_core::{GlyphSource, Renderer};
use tessera_protocol::DisplayController;

/// Longest line [`TextBackend::draw_fmt`] formats in one call
pub const FMT_LINE_LEN: usize = 64;

/// Text backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackendError {
    /// Communication error with the display controller
    Communication,
    /// Row or column outside the grid
    InvalidCoordinates,
    /// Formatted text longer than [`FMT_LINE_LEN`]
    BufferOverflow,
}

/// Character-addressed display
pub trait TextBackend {
    /// Blank the display on the current background color
    fn clear(&mut self) -> Result<(), BackendError>;

    /// Write `text` into the cells of `row` starting at column `col`
    ///
    /// One byte per cell in the current colors. Characters past the last
    /// column are dropped rather than wrapped, and unprintable bytes leave
    /// their cell untouched. Nothing reaches the panel until [`flush`].
    ///
    /// [`flush`]: TextBackend::flush
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), BackendError>;

    /// Format and draw text at the specified row and column
    fn draw_fmt(&mut self, row: u8, col: u8, args: fmt::Arguments<'_>) -> Result<(), BackendError> {
        let mut line: String<FMT_LINE_LEN> = String::new();
        line.write_fmt(args)
            .map_err(|_| BackendError::BufferOverflow)?;
        self.draw_text(row, col, &line)
    }

    /// Highlight columns `start_col..end_col` of `row`
    ///
    /// Each cell's foreground and background palette indices trade places
    /// and the cell is marked dirty. Inverting twice restores the original
    /// colors. The span is clipped to the grid; an empty span does nothing.
    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), BackendError>;

    /// Push pending changes to the display
    fn flush(&mut self) -> Result<(), BackendError>;

    /// Display size in characters as `(columns, rows)`
    fn dimensions(&self) -> (u8, u8);
}

impl<D, G, const COLS: usize, const ROWS: usize, const SCRATCH: usize> TextBackend
    for Renderer<'_, D, G, COLS, ROWS, SCRATCH>
where
    D: DisplayController,
    G: GlyphSource,
{
    fn clear(&mut self) -> Result<(), BackendError> {
        let bg = self.grid().background();
        Renderer::clear(self, bg).map_err(|_| {
            warn!("display write failed during clear");
            BackendError::Communication
        })
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), BackendError> {
        if usize::from(row) >= ROWS || usize::from(col) >= COLS {
            return Err(BackendError::InvalidCoordinates);
        }
        self.set_cursor(u16::from(col), u16::from(row));
        self.print(text, false);
        Ok(())
    }

    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), BackendError> {
        if usize::from(row) >= ROWS {
            return Err(BackendError::InvalidCoordinates);
        }
        let width = end_col.saturating_sub(start_col);
        Renderer::invert_region(self, u16::from(start_col), u16::from(row), u16::from(width));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        Renderer::flush(self).map(|_| ()).map_err(|_| {
            warn!("display write failed during flush");
            BackendError::Communication
        })
    }

    fn dimensions(&self) -> (u8, u8) {
        (
            u8::try_from(COLS).unwrap_or(u8::MAX),
            u8::try_from(ROWS).unwrap_or(u8::MAX),
        )
    }
}
