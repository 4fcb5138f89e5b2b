//! Host-side panel
//!
//! The emulator over a caller-owned surface, plus the color decoding a
//! desktop window or texture upload needs. The surface holds sink words in
//! the configured byte order, exactly as a panel would receive them.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use tessera_core::{ByteOrder, Rgb565};
use tessera_protocol::{DisplayController, Emulator, SurfaceError};

/// Emulated panel backed by a pixel surface
pub struct HostPanel<'fb> {
    emulator: Emulator<'fb>,
    order: ByteOrder,
}

impl<'fb> HostPanel<'fb> {
    /// Wrap a `width × height` surface holding words in `order`
    pub fn new(
        surface: &'fb mut [u16],
        width: u16,
        height: u16,
        order: ByteOrder,
    ) -> Result<Self, SurfaceError> {
        Ok(Self {
            emulator: Emulator::new(surface, width, height)?,
            order,
        })
    }

    /// Surface size `(width, height)` in pixels
    pub fn size(&self) -> (u16, u16) {
        (self.emulator.width(), self.emulator.height())
    }

    /// Byte order of the stored words
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Decoded color at `(x, y)`
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb565> {
        self.emulator.pixel(x, y).map(|word| self.order.decode(word))
    }

    /// The raw surface words
    pub fn surface(&self) -> &[u16] {
        self.emulator.surface()
    }

    /// The underlying emulator
    pub fn emulator(&self) -> &Emulator<'fb> {
        &self.emulator
    }

    /// Mutable emulator (reset, dropped-pixel counter)
    pub fn emulator_mut(&mut self) -> &mut Emulator<'fb> {
        &mut self.emulator
    }

    /// Decode the whole surface into 8-bit RGB, row-major
    ///
    /// Writes `min(out.len(), width * height)` pixels and returns the count.
    pub fn present_rgb888(&self, out: &mut [Rgb888]) -> usize {
        let surface = self.emulator.surface();
        let count = out.len().min(surface.len());
        for (dst, &word) in out.iter_mut().zip(surface) {
            *dst = Rgb888::from(self.order.decode(word));
        }
        trace!("presented {} pixels", count);
        count
    }
}

impl DisplayController for HostPanel<'_> {
    type Error = Infallible;

    fn set_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.emulator.set_command(command)
    }

    fn param(&mut self, value: u8) -> Result<(), Self::Error> {
        self.emulator.param(value)
    }

    fn param16(&mut self, value: u16) -> Result<(), Self::Error> {
        self.emulator.param16(value)
    }

    fn begin_write(&mut self) -> Result<(), Self::Error> {
        self.emulator.begin_write()
    }

    fn end_write(&mut self) -> Result<(), Self::Error> {
        self.emulator.end_write()
    }

    fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), Self::Error> {
        self.emulator.write_pixels(pixels)
    }
}
