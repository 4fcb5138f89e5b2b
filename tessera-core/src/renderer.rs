//! Renderer
//!
//! Owns the cell grid, the palette, the rasterizer and the display
//! controller. The host writes text through it and calls [`Renderer::flush`]
//! periodically; flush turns the pending dirty cells into rectangles and
//! streams each one to the controller.
//!
//! Everything here is synchronous and single-writer. A host that redraws from
//! a timer on another thread has to put the whole renderer behind its own
//! mutex.

use tessera_protocol::DisplayController;

use crate::coalesce::{CellRect, RedrawPolicy};
use crate::color::Rgb565;
use crate::config::{ConfigError, RenderConfig};
use crate::glyph::GlyphSource;
use crate::grid::{Cell, CellGrid};
use crate::palette::Palette;
use crate::raster::Rasterizer;

/// Summary of one flush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushStats {
    /// Rectangles drawn
    pub regions: u16,
    /// Cells covered by those rectangles
    pub cells: u32,
}

/// Character-cell renderer
///
/// - `COLS × ROWS`: grid size in cells, with `COLS` at most 64 (see [`CellGrid`])
/// - `SCRATCH`: rasterizer scratch capacity in pixels; must hold at least
///   one full character row (`COLS × glyph width × glyph height`)
pub struct Renderer<'f, D, G, const COLS: usize, const ROWS: usize, const SCRATCH: usize> {
    display: D,
    grid: CellGrid<COLS, ROWS>,
    palette: Palette,
    raster: Rasterizer<SCRATCH>,
    fonts: &'f [G],
    font_index: usize,
    redraw: RedrawPolicy,
}

impl<'f, D, G, const COLS: usize, const ROWS: usize, const SCRATCH: usize>
    Renderer<'f, D, G, COLS, ROWS, SCRATCH>
where
    D: DisplayController,
    G: GlyphSource,
{
    /// Create a renderer drawing with `fonts[0]`
    ///
    /// Every font in the set must have the same glyph size.
    pub fn new(display: D, fonts: &'f [G], config: RenderConfig) -> Result<Self, ConfigError> {
        let Some(first) = fonts.first() else {
            warn!("renderer needs at least one font");
            return Err(ConfigError::NoFonts);
        };
        let (gw, gh) = (first.width(), first.height());
        if fonts.iter().any(|f| f.width() != gw || f.height() != gh) {
            warn!("font set mixes glyph sizes");
            return Err(ConfigError::FontMismatch);
        }
        if Rasterizer::<SCRATCH>::chunk_rows(COLS, gw, gh) == 0 {
            warn!(
                "scratch of {} px cannot hold a {}-column character row",
                SCRATCH,
                COLS
            );
            return Err(ConfigError::ScratchTooSmall);
        }

        Ok(Self {
            display,
            grid: CellGrid::new(),
            palette: Palette::new(config.byte_order),
            raster: Rasterizer::new(config.orientation, config.panel_width, config.panel_height),
            fonts,
            font_index: 0,
            redraw: config.redraw,
        })
    }

    /// The display controller
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable display controller (panel bring-up, diagnostics)
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Give back the display controller
    pub fn release(self) -> D {
        self.display
    }

    /// The cell grid
    pub fn grid(&self) -> &CellGrid<COLS, ROWS> {
        &self.grid
    }

    /// Mutable cell grid
    pub fn grid_mut(&mut self) -> &mut CellGrid<COLS, ROWS> {
        &mut self.grid
    }

    /// The palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Mutable palette; changes are not marked dirty
    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Current redraw policy
    pub fn redraw_policy(&self) -> RedrawPolicy {
        self.redraw
    }

    /// Change the redraw policy
    pub fn set_redraw_policy(&mut self, policy: RedrawPolicy) {
        self.redraw = policy;
    }

    /// Set the foreground palette index for subsequent writes
    pub fn set_foreground(&mut self, index: u8) {
        self.grid.set_foreground(index);
    }

    /// Set the background palette index for subsequent writes
    pub fn set_background(&mut self, index: u8) {
        self.grid.set_background(index);
    }

    /// Move the write cursor
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.grid.set_cursor(x, y);
    }

    /// Write cursor as `(x, y)`
    pub fn cursor(&self) -> (u16, u16) {
        self.grid.cursor()
    }

    /// Write one character at the cursor; the cursor does not move
    pub fn put_char(&mut self, raw: u8, invert: bool) {
        self.grid.put_char(raw, invert);
    }

    /// Write a string at the cursor, advancing it
    pub fn print(&mut self, text: &str, invert: bool) {
        self.grid.print(text, invert);
    }

    /// Write bytes at the cursor, advancing it
    pub fn write(&mut self, text: &[u8], invert: bool) {
        self.grid.write(text, invert);
    }

    /// Read a cell
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.grid.cell(x, y)
    }

    /// Swap colors over `width` cells of row `y` starting at column `x`
    pub fn invert_region(&mut self, x: u16, y: u16, width: u16) {
        self.grid.invert_region(x, y, width);
    }

    /// Overwrite a palette slot without marking anything dirty
    pub fn set_palette_color(&mut self, index: u8, color: Rgb565) {
        self.palette.set(index, color);
    }

    /// Overwrite a palette slot and schedule a full redraw if it changed
    ///
    /// Returns whether the slot changed.
    pub fn sync_palette_color(&mut self, index: u8, color: Rgb565) -> bool {
        let changed = self.palette.sync(index, color);
        if changed {
            trace!("palette slot {} changed", index);
            self.grid.mark_all_dirty();
        }
        changed
    }

    /// Index of the active font
    pub fn font_index(&self) -> usize {
        self.font_index
    }

    /// Switch to another font of the set and schedule a full redraw
    ///
    /// Out-of-range indices are ignored.
    pub fn set_font_index(&mut self, index: usize) {
        if index < self.fonts.len() && index != self.font_index {
            self.font_index = index;
            self.grid.mark_all_dirty();
        }
    }

    /// Draw every changed cell and clear the dirty map
    ///
    /// If the controller fails, the rectangle being drawn and every one not
    /// yet reached stay dirty for the next flush.
    pub fn flush(&mut self) -> Result<FlushStats, D::Error> {
        let mut pending = self.grid.take_dirty();
        if pending.is_empty() {
            return Ok(FlushStats::default());
        }

        let font = &self.fonts[self.font_index];
        let mut stats = FlushStats::default();
        let mut failed = None;
        for rect in self.redraw.regions(&mut pending) {
            if let Err(err) =
                self.raster
                    .draw_region(&mut self.display, &self.grid, &self.palette, font, rect)
            {
                failed = Some((rect, err));
                break;
            }
            stats.regions = stats.regions.saturating_add(1);
            stats.cells += rect.area();
        }

        if let Some((rect, err)) = failed {
            pending.set_rect(
                usize::from(rect.x),
                usize::from(rect.y),
                usize::from(rect.width),
                usize::from(rect.height),
            );
            self.grid.dirty_mut().merge(&pending);
            warn!(
                "flush stopped after {} regions, {} cells left dirty",
                stats.regions,
                self.grid.dirty().count()
            );
            return Err(err);
        }

        debug!("flush: {} regions, {} cells", stats.regions, stats.cells);
        Ok(stats)
    }

    /// Draw a rectangle of cells regardless of its dirty state
    pub fn draw_region(&mut self, rect: CellRect) -> Result<(), D::Error> {
        let font = &self.fonts[self.font_index];
        self.raster
            .draw_region(&mut self.display, &self.grid, &self.palette, font, rect)
    }

    /// Redraw the whole grid and clear the dirty map
    pub fn draw_screen(&mut self) -> Result<(), D::Error> {
        self.grid.dirty_mut().clear_all();
        self.draw_region(CellRect::new(0, 0, COLS as u16, ROWS as u16))
    }

    /// Blank the grid on `bg`, home the cursor and redraw everything
    pub fn clear(&mut self, bg: u8) -> Result<(), D::Error> {
        self.grid.clear(bg);
        self.draw_screen()
    }

    /// Mark every cell for redraw on the next flush
    pub fn invalidate(&mut self) {
        self.grid.mark_all_dirty();
    }

    /// Fill a logical pixel rectangle with one palette color
    ///
    /// Bypasses the cell grid; the next redraw of overlapping cells paints
    /// over it.
    pub fn fill_rect(
        &mut self,
        color_index: u8,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), D::Error> {
        self.raster.fill_rect(
            &mut self.display,
            &self.palette,
            color_index,
            x,
            y,
            width,
            height,
        )
    }
}
