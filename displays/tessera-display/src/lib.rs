//! Display sinks and text backend for Tessera
//!
//! This crate provides:
//! - [`SpiPanel`]: ILI9341-class TFT over `embedded-hal` SPI with a
//!   data/command pin
//! - [`HostPanel`]: the protocol emulator over a caller-owned surface, with
//!   color decoding for desktop presentation
//! - [`TextBackend`]: row/column text interface, implemented for the
//!   [`Renderer`](tessera_core::Renderer)
//!
//! # Architecture
//!
//! Both sinks implement
//! [`DisplayController`](tessera_protocol::DisplayController), so the same
//! renderer drives real hardware on the target and the emulator on the host.
//! Only the byte order in the render configuration differs.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod backend;
pub mod host;
pub mod panel;

// Re-export key types
pub use backend::{BackendError, TextBackend, FMT_LINE_LEN};
pub use host::HostPanel;
pub use panel::{hard_reset, PanelError, SpiPanel};
