//! Host panel driven through the text backend.
//!
//! Whatever text lands in the grid must come back out of the panel surface
//! as the glyph bitmaps in palette colors, after byte-order decoding.

use embedded_graphics::pixelcolor::Rgb888;
use proptest::prelude::*;
use tessera_core::{
    BitmapFont, ByteOrder, GlyphSource, Orientation, RedrawPolicy, RenderConfig, Renderer,
    GLYPH_COUNT,
};
use tessera_display::{HostPanel, TextBackend};

const COLS: usize = 16;
const ROWS: usize = 6;
const GW: u16 = 4;
const GH: u16 = 6;
const PANEL_W: u16 = COLS as u16 * GW;
const PANEL_H: u16 = ROWS as u16 * GH;

/// Each glyph draws its own code as a bit pattern so neighbours differ
static FONT_TABLE: [[u16; 6]; GLYPH_COUNT] = {
    let mut table = [[0u16; 6]; GLYPH_COUNT];
    let mut code = 0;
    while code < GLYPH_COUNT {
        let bits = code as u16;
        table[code] = [
            bits & 0xF,
            (bits >> 4) & 0xF,
            0b1001,
            0b0110,
            (bits ^ 0xF) & 0xF,
            0,
        ];
        code += 1;
    }
    table
};

fn font() -> BitmapFont<'static, 6> {
    BitmapFont::new(GW as u8, &FONT_TABLE)
}

fn config(order: ByteOrder, redraw: RedrawPolicy) -> RenderConfig {
    RenderConfig {
        orientation: Orientation::Landscape,
        redraw,
        byte_order: order,
        panel_width: PANEL_W,
        panel_height: PANEL_H,
    }
}

fn surface() -> Vec<u16> {
    vec![0u16; usize::from(PANEL_W) * usize::from(PANEL_H)]
}

#[test]
fn swapped_surface_decodes_to_palette_colors() {
    let mut words = surface();
    let panel = HostPanel::new(&mut words, PANEL_W, PANEL_H, ByteOrder::Swapped).unwrap();
    let fonts = [font()];
    let mut renderer = Renderer::<_, _, COLS, ROWS, 512>::new(
        panel,
        &fonts,
        config(ByteOrder::Swapped, RedrawPolicy::Coalesce),
    )
    .unwrap();

    renderer.set_foreground(14);
    renderer.set_background(2);
    renderer.draw_text(2, 3, "A").unwrap();
    TextBackend::flush(&mut renderer).unwrap();

    let fg = renderer.palette().get(14);
    let bg = renderer.palette().get(2);
    let panel = renderer.display();
    let glyph = b'A' - 32;
    for py in 0..GH {
        for px in 0..GW {
            let want = if font().pixel(glyph, px as u8, py as u8) { fg } else { bg };
            assert_eq!(panel.pixel(3 * GW + px, 2 * GH + py), Some(want));
        }
    }

    let mut rgb = vec![Rgb888::new(0, 0, 0); usize::from(PANEL_W) * usize::from(PANEL_H)];
    assert_eq!(panel.present_rgb888(&mut rgb), rgb.len());
    let corner = usize::from(2 * GH) * usize::from(PANEL_W) + usize::from(3 * GW);
    let expected = panel.pixel(3 * GW, 2 * GH).map(Rgb888::from);
    assert_eq!(Some(rgb[corner]), expected);
}

#[test]
fn menu_highlight_repaints_only_selection() {
    let mut words = surface();
    let panel = HostPanel::new(&mut words, PANEL_W, PANEL_H, ByteOrder::Native).unwrap();
    let fonts = [font()];
    let mut renderer = Renderer::<_, _, COLS, ROWS, 512>::new(
        panel,
        &fonts,
        config(ByteOrder::Native, RedrawPolicy::Coalesce),
    )
    .unwrap();

    renderer.draw_text(0, 0, "Start").unwrap();
    renderer.draw_text(1, 0, "Stop").unwrap();
    TextBackend::flush(&mut renderer).unwrap();
    let before: Vec<u16> = renderer.display().surface().to_vec();

    TextBackend::invert_region(&mut renderer, 1, 0, 4).unwrap();
    let stats = Renderer::flush(&mut renderer).unwrap();
    assert_eq!(stats.regions, 1);
    assert_eq!(stats.cells, 4);

    let after = renderer.display().surface();
    for y in 0..PANEL_H {
        for x in 0..PANEL_W {
            let i = usize::from(y) * usize::from(PANEL_W) + usize::from(x);
            let in_selection = (GH..2 * GH).contains(&y) && x < 4 * GW;
            if in_selection {
                assert_ne!(after[i], before[i], "({}, {}) not inverted", x, y);
            } else {
                assert_eq!(after[i], before[i], "({}, {}) changed", x, y);
            }
        }
    }
}

proptest! {
    #[test]
    fn drawn_text_matches_glyphs(
        row in 0u8..ROWS as u8,
        col in 0u8..COLS as u8,
        text in "[ -~]{1,20}",
        per_cell in any::<bool>(),
    ) {
        let mut words = surface();
        let panel = HostPanel::new(&mut words, PANEL_W, PANEL_H, ByteOrder::Native).unwrap();
        let fonts = [font()];
        let redraw = if per_cell { RedrawPolicy::PerCell } else { RedrawPolicy::Coalesce };
        let mut renderer = Renderer::<_, _, COLS, ROWS, 512>::new(
            panel,
            &fonts,
            config(ByteOrder::Native, redraw),
        )
        .unwrap();

        renderer.set_foreground(1);
        renderer.set_background(0);
        renderer.draw_text(row, col, &text).unwrap();
        TextBackend::flush(&mut renderer).unwrap();

        let fg = renderer.palette().get(1);
        let bg = renderer.palette().get(0);
        let panel = renderer.display();
        let visible = (COLS - usize::from(col)).min(text.len());
        for (i, raw) in text.bytes().take(visible).enumerate() {
            let cx = u16::from(col) + i as u16;
            for py in 0..GH {
                for px in 0..GW {
                    let lit = font().pixel(raw - 32, px as u8, py as u8);
                    let want = if lit { fg } else { bg };
                    let got = panel.pixel(cx * GW + px, u16::from(row) * GH + py);
                    prop_assert_eq!(got, Some(want));
                }
            }
        }
    }
}
