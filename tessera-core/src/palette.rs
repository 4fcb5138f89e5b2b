//! 16-color palette
//!
//! Slots hold sink-encoded words so the rasterizer can copy them straight
//! into the scratch buffer. Changing a slot changes every cell that refers to
//! it, but nothing is marked dirty here; use
//! [`Renderer::sync_palette_color`](crate::Renderer::sync_palette_color) or
//! mark the grid dirty yourself.

use embedded_graphics::prelude::*;

use crate::color::{rgb565, ByteOrder, Rgb565};

/// Number of palette slots (4-bit index)
pub const PALETTE_SIZE: usize = 16;

/// Power-on palette, packed RGB565
pub const DEFAULT_PALETTE: [u16; PALETTE_SIZE] = [
    0x0000, 0x49E5, 0xB926, 0xE371, 0x9CF3, 0xA324, 0xEC46, 0xF70D, 0xFFFF, 0x1926, 0x2A49,
    0x4443, 0xA664, 0x02B0, 0x351E, 0xB6FD,
];

/// Color substituted for reads through an out-of-range index
pub const FALLBACK_COLOR: Rgb565 = Rgb565::BLACK;

/// Indexed color table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Palette {
    /// Encoded slot values
    slots: [u16; PALETTE_SIZE],
    order: ByteOrder,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(ByteOrder::default())
    }
}

impl Palette {
    /// Create the default palette for a sink byte order
    pub fn new(order: ByteOrder) -> Self {
        let mut slots = [0u16; PALETTE_SIZE];
        for (slot, &raw) in slots.iter_mut().zip(DEFAULT_PALETTE.iter()) {
            *slot = order.apply(raw);
        }
        Self { slots, order }
    }

    /// Sink byte order the slots are encoded in
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Switch byte order, re-encoding every slot
    pub fn set_order(&mut self, order: ByteOrder) {
        if order == self.order {
            return;
        }
        for slot in self.slots.iter_mut() {
            *slot = order.encode(self.order.decode(*slot));
        }
        self.order = order;
    }

    /// Overwrite a slot
    ///
    /// Out-of-range indices are ignored.
    pub fn set(&mut self, index: u8, color: Rgb565) {
        if let Some(slot) = self.slots.get_mut(usize::from(index)) {
            *slot = self.order.encode(color);
        }
    }

    /// Overwrite a slot only if it differs
    ///
    /// Returns `true` when the slot changed.
    pub fn sync(&mut self, index: u8, color: Rgb565) -> bool {
        let encoded = self.order.encode(color);
        match self.slots.get_mut(usize::from(index)) {
            Some(slot) if *slot != encoded => {
                *slot = encoded;
                true
            }
            _ => false,
        }
    }

    /// Color in a slot, or [`FALLBACK_COLOR`] for an out-of-range index
    pub fn get(&self, index: u8) -> Rgb565 {
        self.slots
            .get(usize::from(index))
            .map(|&word| self.order.decode(word))
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Encoded sink word for a slot, or the encoded fallback color
    #[inline]
    pub fn encoded(&self, index: u8) -> u16 {
        match self.slots.get(usize::from(index)) {
            Some(&word) => word,
            None => self.order.encode(FALLBACK_COLOR),
        }
    }
}

/// Default palette entry as a color
pub fn default_color(index: u8) -> Rgb565 {
    DEFAULT_PALETTE
        .get(usize::from(index))
        .map(|&raw| rgb565(raw))
        .unwrap_or(FALLBACK_COLOR)
}
