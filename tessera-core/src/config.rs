//! Render configuration
//!
//! Per-target choices that are not correctness decisions: panel mounting,
//! redraw strategy, sink byte order and logical panel size. With the `serde`
//! feature the configuration can be persisted as postcard binary data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coalesce::RedrawPolicy;
use crate::color::ByteOrder;
use crate::raster::Orientation;

/// ILI9341 long side in pixels
pub const DEFAULT_PANEL_WIDTH: u16 = 320;

/// ILI9341 short side in pixels
pub const DEFAULT_PANEL_HEIGHT: u16 = 240;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Font set is empty
    NoFonts,
    /// Fonts in the set do not share glyph dimensions
    FontMismatch,
    /// Scratch buffer cannot hold one full character row
    ScratchTooSmall,
    /// Serialization or deserialization failed
    Encoding,
}

/// Rendering configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderConfig {
    /// Panel mounting
    pub orientation: Orientation,
    /// Dirty-region strategy used by flush
    pub redraw: RedrawPolicy,
    /// Byte order of pixel words at the sink
    pub byte_order: ByteOrder,
    /// Logical panel width in pixels
    pub panel_width: u16,
    /// Logical panel height in pixels
    pub panel_height: u16,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Landscape,
            redraw: RedrawPolicy::Coalesce,
            byte_order: ByteOrder::Swapped,
            panel_width: DEFAULT_PANEL_WIDTH,
            panel_height: DEFAULT_PANEL_HEIGHT,
        }
    }
}

impl RenderConfig {
    /// Host-side mock defaults: native byte order, no rotation
    pub fn host() -> Self {
        Self {
            byte_order: ByteOrder::Native,
            ..Self::default()
        }
    }

    /// Serialize into `buf` as postcard binary, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_bytes<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encoding)
    }

    /// Deserialize from postcard binary
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Encoding)
    }
}
