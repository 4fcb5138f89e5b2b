//! Windowed Pixel-Streaming Display Controller Protocol
//!
//! This crate models the command/addressing protocol spoken by ILI9341-class
//! TFT controllers. A write is always the same shape:
//!
//! ```text
//! CASET x0 x1 → PASET y0 y1 → RAMWR → pixel, pixel, pixel, ...
//! ```
//!
//! The controller keeps a write cursor that starts at `(x0, y0)`, walks right
//! across the window and wraps to the next row after `x1`.
//!
//! The same [`DisplayController`] trait is implemented by the real SPI panel
//! driver and by the [`Emulator`], which replays the protocol into a plain
//! pixel surface for host-side development and tests.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod command;
pub mod controller;
pub mod emulator;
pub mod window;

pub use command::cmd;
pub use controller::DisplayController;
pub use emulator::{Emulator, SurfaceError};
pub use window::{AddressWindow, Placement};
