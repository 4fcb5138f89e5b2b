//! Glyph rasterizer
//!
//! Expands a rectangle of cells into pixels and streams them as one windowed
//! write per pass. The scratch buffer is a fixed `[u16; SCRATCH]` owned by the
//! rasterizer and reused for every pass and every flush.
//!
//! A pass covers at most [`Rasterizer::chunk_rows`] character rows, so a tall
//! rectangle becomes several passes, each addressed on its own, top to
//! bottom.
//!
//! # Orientation
//!
//! Both orientations run the same emission loop; only the mapping from
//! emission order to logical pixel differs.
//!
//! - [`Orientation::Landscape`]: the controller window is the logical pixel
//!   rectangle, emitted row by row.
//! - [`Orientation::Rotated`]: the panel is mounted 90° clockwise. Logical
//!   `(lx, ly)` lives at controller column `panel_height - 1 - ly`, row `lx`,
//!   so emission walks logical x ascending, then logical y from the bottom up.

use tessera_protocol::command::madctl;
use tessera_protocol::DisplayController;

use crate::coalesce::CellRect;
use crate::glyph::GlyphSource;
use crate::grid::CellGrid;
use crate::palette::Palette;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical mounting of the panel relative to the logical screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Controller axes match the logical screen
    #[default]
    Landscape,
    /// Panel mounted rotated 90° clockwise
    Rotated,
}

impl Orientation {
    /// Memory access control value the panel should be brought up with
    pub const fn memory_access(self) -> u8 {
        match self {
            Orientation::Landscape => madctl::MV | madctl::BGR,
            Orientation::Rotated => madctl::MY | madctl::MX,
        }
    }

    /// Controller window `(x0, y0, x1, y1)` for a logical pixel rectangle
    ///
    /// Meaningful for a non-empty rectangle inside the logical panel. Other
    /// inputs saturate at the `u16` range instead of wrapping.
    pub fn window(self, panel_height: u16, x: u16, y: u16, w: u16, h: u16) -> (u16, u16, u16, u16) {
        let (w_last, h_last) = (w.saturating_sub(1), h.saturating_sub(1));
        match self {
            Orientation::Landscape => (x, y, x.saturating_add(w_last), y.saturating_add(h_last)),
            Orientation::Rotated => {
                let col0 = panel_height.saturating_sub(y).saturating_sub(h);
                (col0, x, col0.saturating_add(h_last), x.saturating_add(w_last))
            }
        }
    }

    /// Emission loop extents `(major, minor)` for a `w × h` logical block
    #[inline]
    fn extent(self, w: usize, h: usize) -> (usize, usize) {
        match self {
            Orientation::Landscape => (h, w),
            Orientation::Rotated => (w, h),
        }
    }

    /// Block-local logical pixel for emission step `(major, minor)`
    #[inline]
    fn locate(self, major: usize, minor: usize, h: usize) -> (usize, usize) {
        match self {
            Orientation::Landscape => (minor, major),
            Orientation::Rotated => (major, h - 1 - minor),
        }
    }
}

/// Cell-to-pixel expander with a bounded scratch buffer
pub struct Rasterizer<const SCRATCH: usize> {
    scratch: [u16; SCRATCH],
    orientation: Orientation,
    panel_width: u16,
    panel_height: u16,
}

impl<const SCRATCH: usize> Rasterizer<SCRATCH> {
    const NONEMPTY: () = assert!(SCRATCH > 0, "scratch buffer must hold at least one pixel");

    /// Create a rasterizer for a logical `panel_width × panel_height` screen
    pub const fn new(orientation: Orientation, panel_width: u16, panel_height: u16) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONEMPTY;
        Self {
            scratch: [0; SCRATCH],
            orientation,
            panel_width,
            panel_height,
        }
    }

    /// Scratch capacity in pixels
    pub const fn capacity(&self) -> usize {
        SCRATCH
    }

    /// Panel orientation
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Logical panel size `(width, height)` in pixels
    pub fn panel_size(&self) -> (u16, u16) {
        (self.panel_width, self.panel_height)
    }

    /// Character rows per pass for a grid `cols` wide
    ///
    /// Zero means the scratch cannot hold even one full character row.
    pub const fn chunk_rows(cols: usize, glyph_width: u8, glyph_height: u8) -> usize {
        let row_pixels = cols * glyph_width as usize * glyph_height as usize;
        if row_pixels == 0 {
            return 0;
        }
        SCRATCH / row_pixels
    }

    /// Draw a rectangle of cells
    ///
    /// The rectangle is clipped to the grid and to the logical panel; empty
    /// rectangles draw nothing.
    pub fn draw_region<D, G, const COLS: usize, const ROWS: usize>(
        &mut self,
        display: &mut D,
        grid: &CellGrid<COLS, ROWS>,
        palette: &Palette,
        font: &G,
        rect: CellRect,
    ) -> Result<(), D::Error>
    where
        D: DisplayController,
        G: GlyphSource + ?Sized,
    {
        let (gw, gh) = (usize::from(font.width()), usize::from(font.height()));
        if gw == 0 || gh == 0 {
            return Ok(());
        }

        // Clip to the grid and to whole cells on the panel
        let cols = COLS.min(usize::from(self.panel_width) / gw);
        let rows = ROWS.min(usize::from(self.panel_height) / gh);
        let (x, y) = (usize::from(rect.x), usize::from(rect.y));
        if x >= cols || y >= rows {
            return Ok(());
        }
        let width = usize::from(rect.width).min(cols - x);
        let height = usize::from(rect.height).min(rows - y);
        if width == 0 || height == 0 {
            return Ok(());
        }

        let chunk = Self::chunk_rows(COLS, font.width(), font.height()).max(1);
        let mut done = 0;
        while done < height {
            let pass = (height - done).min(chunk);
            self.draw_pass(display, grid, palette, font, x, y + done, width, pass)?;
            done += pass;
        }
        Ok(())
    }

    /// Stream one pass of at most `chunk_rows` character rows
    #[allow(clippy::too_many_arguments)]
    fn draw_pass<D, G, const COLS: usize, const ROWS: usize>(
        &mut self,
        display: &mut D,
        grid: &CellGrid<COLS, ROWS>,
        palette: &Palette,
        font: &G,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<(), D::Error>
    where
        D: DisplayController,
        G: GlyphSource + ?Sized,
    {
        let (gw, gh) = (usize::from(font.width()), usize::from(font.height()));
        let (pw, ph) = (width * gw, height * gh);

        let (x0, y0, x1, y1) = self.orientation.window(
            self.panel_height,
            (x * gw) as u16,
            (y * gh) as u16,
            pw as u16,
            ph as u16,
        );
        display.set_window(x0, y0, x1, y1)?;
        display.begin_write()?;

        let (majors, minors) = self.orientation.extent(pw, ph);
        let mut len = 0;
        for major in 0..majors {
            for minor in 0..minors {
                let (lx, ly) = self.orientation.locate(major, minor, ph);
                let cell = grid.cell_at(x + lx / gw, y + ly / gh);
                let lit = font.pixel(cell.glyph, (lx % gw) as u8, (ly % gh) as u8);
                self.scratch[len] = if lit {
                    palette.encoded(cell.primary())
                } else {
                    palette.encoded(cell.secondary())
                };
                len += 1;

                // Only reached when the scratch is smaller than one pass
                if len == SCRATCH {
                    display.write_pixels(&self.scratch)?;
                    len = 0;
                }
            }
        }
        if len > 0 {
            display.write_pixels(&self.scratch[..len])?;
        }

        display.end_write()
    }

    /// Fill a logical pixel rectangle with one palette color
    ///
    /// Rectangles starting off-panel are ignored; the extent is clamped to
    /// the panel edge.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_rect<D: DisplayController>(
        &mut self,
        display: &mut D,
        palette: &Palette,
        color_index: u8,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), D::Error> {
        if x >= self.panel_width || y >= self.panel_height {
            return Ok(());
        }
        let width = width.min(self.panel_width - x);
        let height = height.min(self.panel_height - y);
        if width == 0 || height == 0 {
            return Ok(());
        }

        let (x0, y0, x1, y1) = self
            .orientation
            .window(self.panel_height, x, y, width, height);
        display.fill(
            x0,
            y0,
            x1 - x0 + 1,
            y1 - y0 + 1,
            palette.encoded(color_index),
            &mut self.scratch,
        )
    }
}
