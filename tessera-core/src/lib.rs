//! Board-agnostic character-cell rendering engine
//!
//! This crate contains everything between "put this character here" and the
//! display controller protocol:
//!
//! - 16-slot palette and the sink byte order
//! - Cell grid with cursor-based writes and a bit-per-cell dirty map
//! - Dirty-region coalescer (greedy maximal rectangles)
//! - Glyph rasterizer with a bounded scratch buffer and panel orientation
//! - Render configuration
//! - [`Renderer`], which owns the grid and palette and flushes changes to any
//!   [`DisplayController`](tessera_protocol::DisplayController)
//!
//! The glyph bitmaps themselves are not part of this crate; they come in
//! through the [`GlyphSource`] trait.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod coalesce;
pub mod color;
pub mod config;
pub mod dirty;
pub mod glyph;
pub mod grid;
pub mod palette;
pub mod raster;
pub mod renderer;

pub use coalesce::{coalesce, per_cell, CellRect, RedrawPolicy};
pub use color::{ByteOrder, Rgb565};
pub use config::{ConfigError, RenderConfig};
pub use dirty::DirtyMap;
pub use glyph::{BitmapFont, GlyphSource, GLYPH_COUNT};
pub use grid::{Cell, CellGrid};
pub use palette::{Palette, PALETTE_SIZE};
pub use raster::{Orientation, Rasterizer};
pub use renderer::{FlushStats, Renderer};
