//! Protocol emulator
//!
//! Replays the controller protocol into a caller-owned pixel surface. Used as
//! the host-side stand-in for the panel during development and in tests.
//!
//! Pixels landing outside the surface, or past the bottom of the window, are
//! dropped one at a time. The write cursor keeps moving either way.

use core::convert::Infallible;

use crate::command::cmd;
use crate::controller::DisplayController;
use crate::window::{AddressWindow, Placement};

/// Surface construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// Buffer length is not `width * height`
    SizeMismatch,
}

/// Emulated display controller backed by a pixel surface
pub struct Emulator<'fb> {
    surface: &'fb mut [u16],
    width: u16,
    height: u16,
    window: AddressWindow,
    /// Last memory access control parameter
    madctl: u8,
    /// Pixels dropped since the last `take_dropped`
    dropped: u32,
    writing: bool,
}

impl<'fb> Emulator<'fb> {
    /// Wrap a `width × height` row-major surface
    pub fn new(surface: &'fb mut [u16], width: u16, height: u16) -> Result<Self, SurfaceError> {
        if surface.len() != usize::from(width) * usize::from(height) {
            return Err(SurfaceError::SizeMismatch);
        }

        Ok(Self {
            surface,
            width,
            height,
            window: AddressWindow::new(),
            madctl: 0,
            dropped: 0,
            writing: false,
        })
    }

    /// Reset the surface to zero and the protocol state to power-on
    pub fn reset(&mut self) {
        self.surface.fill(0);
        self.window = AddressWindow::new();
        self.madctl = 0;
        self.dropped = 0;
        self.writing = false;
    }

    /// Surface width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Surface height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The whole surface, row-major
    pub fn surface(&self) -> &[u16] {
        &*self.surface
    }

    /// Read one surface pixel
    pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.surface[usize::from(y) * usize::from(self.width) + usize::from(x)])
    }

    /// Addressing state
    pub fn window(&self) -> &AddressWindow {
        &self.window
    }

    /// Last memory access control parameter received
    pub fn memory_access(&self) -> u8 {
        self.madctl
    }

    /// Whether a `begin_write` is open
    pub fn is_writing(&self) -> bool {
        self.writing
    }

    /// Number of pixels dropped since the last call
    pub fn take_dropped(&mut self) -> u32 {
        core::mem::take(&mut self.dropped)
    }

    fn store(&mut self, pixel: u16) {
        match self.window.advance() {
            Placement::At { x, y } if x < u32::from(self.width) && y < u32::from(self.height) => {
                let idx = y as usize * usize::from(self.width) + x as usize;
                self.surface[idx] = pixel;
            }
            _ => self.dropped = self.dropped.saturating_add(1),
        }
    }
}

impl DisplayController for Emulator<'_> {
    type Error = Infallible;

    fn set_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.window.command(command);
        if command == cmd::RAMWR {
            let (x0, y0, x1, y1) = self.window.bounds();
            trace!("RAMWR window ({}, {})..=({}, {})", x0, y0, x1, y1);
        }
        Ok(())
    }

    fn param(&mut self, value: u8) -> Result<(), Self::Error> {
        if self.window.current_command() == cmd::MADCTL {
            self.madctl = value;
        }
        Ok(())
    }

    fn param16(&mut self, value: u16) -> Result<(), Self::Error> {
        self.window.param16(value);
        Ok(())
    }

    fn begin_write(&mut self) -> Result<(), Self::Error> {
        self.writing = true;
        Ok(())
    }

    fn end_write(&mut self) -> Result<(), Self::Error> {
        self.writing = false;
        if self.dropped > 0 {
            debug!("{} pixels dropped outside surface", self.dropped);
        }
        Ok(())
    }

    fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), Self::Error> {
        for &pixel in pixels {
            self.store(pixel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u16 = 8;
    const H: u16 = 6;

    #[test]
    fn test_size_mismatch_rejected() {
        let mut fb = [0u16; 10];
        assert!(matches!(
            Emulator::new(&mut fb, W, H),
            Err(SurfaceError::SizeMismatch)
        ));
    }

    #[test]
    fn test_window_fill_row_by_row() {
        let mut fb = [0u16; (W * H) as usize];
        let mut emu = Emulator::new(&mut fb, W, H).unwrap();

        emu.set_window(2, 1, 4, 2).unwrap();
        emu.begin_write().unwrap();
        emu.write_pixels(&[1, 2, 3, 4, 5, 6]).unwrap();
        emu.end_write().unwrap();

        assert_eq!(emu.pixel(2, 1), Some(1));
        assert_eq!(emu.pixel(3, 1), Some(2));
        assert_eq!(emu.pixel(4, 1), Some(3));
        assert_eq!(emu.pixel(2, 2), Some(4));
        assert_eq!(emu.pixel(4, 2), Some(6));
        assert_eq!(emu.pixel(5, 1), Some(0));
        assert_eq!(emu.pixel(1, 2), Some(0));
        assert_eq!(emu.window().cursor(), (2, 3));
        assert_eq!(emu.take_dropped(), 0);
    }

    #[test]
    fn test_split_writes_continue_cursor() {
        let mut fb = [0u16; (W * H) as usize];
        let mut emu = Emulator::new(&mut fb, W, H).unwrap();

        emu.set_window(0, 0, 2, 1).unwrap();
        emu.write_pixels(&[1, 2]).unwrap();
        emu.write_pixels(&[3, 4]).unwrap();

        assert_eq!(emu.pixel(2, 0), Some(3));
        assert_eq!(emu.pixel(0, 1), Some(4));
    }

    #[test]
    fn test_clipped_pixels_keep_rows_aligned() {
        let mut fb = [0u16; (W * H) as usize];
        let mut emu = Emulator::new(&mut fb, W, H).unwrap();

        // Window hangs two columns off the right edge
        emu.set_window(6, 0, 9, 1).unwrap();
        emu.write_pixels(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        assert_eq!(emu.pixel(6, 0), Some(1));
        assert_eq!(emu.pixel(7, 0), Some(2));
        assert_eq!(emu.pixel(6, 1), Some(5));
        assert_eq!(emu.pixel(7, 1), Some(6));
        assert_eq!(emu.take_dropped(), 4);
    }

    #[test]
    fn test_writes_past_window_bottom_dropped() {
        let mut fb = [0u16; (W * H) as usize];
        let mut emu = Emulator::new(&mut fb, W, H).unwrap();

        emu.set_window(0, 0, 1, 0).unwrap();
        emu.write_pixels(&[7, 7, 9, 9]).unwrap();

        assert_eq!(emu.pixel(0, 1), Some(0));
        assert_eq!(emu.pixel(1, 1), Some(0));
        assert_eq!(emu.take_dropped(), 2);
    }

    #[test]
    fn test_fill_helper() {
        let mut fb = [0u16; (W * H) as usize];
        let mut emu = Emulator::new(&mut fb, W, H).unwrap();
        let mut line = [0u16; 3];

        // Line scratch narrower than the block
        emu.fill(1, 1, 5, 2, 0xABCD, &mut line).unwrap();

        for y in 0..H {
            for x in 0..W {
                let inside = (1..6).contains(&x) && (1..3).contains(&y);
                let expected = if inside { 0xABCD } else { 0 };
                assert_eq!(emu.pixel(x, y), Some(expected), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_madctl_recorded() {
        let mut fb = [0u16; (W * H) as usize];
        let mut emu = Emulator::new(&mut fb, W, H).unwrap();

        emu.set_command(cmd::MADCTL).unwrap();
        emu.param(0x28).unwrap();
        assert_eq!(emu.memory_access(), 0x28);

        // Parameters to other commands leave it alone
        emu.set_command(cmd::COLMOD).unwrap();
        emu.param(0x55).unwrap();
        assert_eq!(emu.memory_access(), 0x28);
    }

    #[test]
    fn test_reset_clears_surface() {
        let mut fb = [0u16; (W * H) as usize];
        let mut emu = Emulator::new(&mut fb, W, H).unwrap();
        emu.set_window(0, 0, 0, 0).unwrap();
        emu.write_pixels(&[5]).unwrap();
        emu.reset();
        assert!(emu.surface().iter().all(|&p| p == 0));
    }
}
