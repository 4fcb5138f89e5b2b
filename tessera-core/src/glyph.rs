//! Glyph source
//!
//! Font bitmaps live outside this crate. Anything that can answer "which
//! pixels of row `r` of glyph `code` are lit" can drive the rasterizer.

/// Number of glyphs in a font (printable ASCII, `32..=127`)
pub const GLYPH_COUNT: usize = 96;

/// Widest supported glyph, in pixels
pub const MAX_GLYPH_WIDTH: u8 = 16;

/// Fixed-size bitmap font lookup
pub trait GlyphSource {
    /// Glyph width in pixels (`1..=16`)
    fn width(&self) -> u8;

    /// Glyph height in pixels
    fn height(&self) -> u8;

    /// Bits of one glyph row, top row first
    ///
    /// The leftmost pixel is bit `width - 1`. Unknown codes or rows return 0.
    fn row(&self, code: u8, row: u8) -> u16;

    /// Whether pixel `(col, row)` of a glyph is lit
    #[inline]
    fn pixel(&self, code: u8, col: u8, row: u8) -> bool {
        let width = self.width();
        col < width && self.row(code, row) & (1 << (width - 1 - col)) != 0
    }
}

impl<G: GlyphSource + ?Sized> GlyphSource for &G {
    fn width(&self) -> u8 {
        (**self).width()
    }

    fn height(&self) -> u8 {
        (**self).height()
    }

    fn row(&self, code: u8, row: u8) -> u16 {
        (**self).row(code, row)
    }
}

/// Font backed by a static table of `H` rows per glyph
#[derive(Debug, Clone, Copy)]
pub struct BitmapFont<'a, const H: usize> {
    width: u8,
    glyphs: &'a [[u16; H]; GLYPH_COUNT],
}

impl<'a, const H: usize> BitmapFont<'a, H> {
    /// Wrap a glyph table; `width` is clamped to `1..=16`
    pub const fn new(width: u8, glyphs: &'a [[u16; H]; GLYPH_COUNT]) -> Self {
        let width = if width == 0 {
            1
        } else if width > MAX_GLYPH_WIDTH {
            MAX_GLYPH_WIDTH
        } else {
            width
        };
        Self { width, glyphs }
    }
}

impl<const H: usize> GlyphSource for BitmapFont<'_, H> {
    fn width(&self) -> u8 {
        self.width
    }

    fn height(&self) -> u8 {
        H as u8
    }

    #[inline]
    fn row(&self, code: u8, row: u8) -> u16 {
        self.glyphs
            .get(usize::from(code))
            .and_then(|glyph| glyph.get(usize::from(row)))
            .copied()
            .unwrap_or(0)
    }
}
