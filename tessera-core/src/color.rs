//! Pixel color representation and sink byte order
//!
//! Colors are RGB565. Before a color reaches the scratch buffer it is turned
//! into a 16-bit word in the byte order the final sink expects; that
//! transform is [`ByteOrder`] and is chosen per target, never hardcoded.

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;

pub use embedded_graphics::pixelcolor::{Rgb565, Rgb888};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Byte order of pixel words as stored and streamed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ByteOrder {
    /// Words keep the RGB565 value as-is (host textures)
    Native,
    /// High and low bytes exchanged, so a little-endian MCU clocks the
    /// word out big-endian (SPI panels)
    #[default]
    Swapped,
}

impl ByteOrder {
    /// Apply the transform to a raw word (it is its own inverse)
    pub const fn apply(self, word: u16) -> u16 {
        match self {
            ByteOrder::Native => word,
            ByteOrder::Swapped => word.swap_bytes(),
        }
    }

    /// Encode a color into a sink word
    pub fn encode(self, color: Rgb565) -> u16 {
        self.apply(color.into_storage())
    }

    /// Decode a sink word back into a color
    pub fn decode(self, word: u16) -> Rgb565 {
        Rgb565::from(RawU16::new(self.apply(word)))
    }
}

/// Build a color from a packed RGB565 value
pub fn rgb565(raw: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(raw))
}

/// Reduce 8-bit channels to RGB565 by truncating the low bits
pub fn from_rgb888(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}
