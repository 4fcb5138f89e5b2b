//! Display controller trait
//!
//! The seam between the renderer and whatever actually receives the protocol:
//! an SPI panel, the host-side [`Emulator`](crate::Emulator), or a test probe.

use crate::command::cmd;

/// A windowed pixel-streaming display controller
///
/// Pixels are 16-bit words already in the sink's byte order; the controller
/// never reinterprets them.
pub trait DisplayController {
    /// Transport error type
    type Error;

    /// Select the current command context
    fn set_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send an 8-bit parameter to the current command
    fn param(&mut self, value: u8) -> Result<(), Self::Error>;

    /// Send a 16-bit parameter to the current command (high byte first on the wire)
    fn param16(&mut self, value: u16) -> Result<(), Self::Error>;

    /// Mark the start of a bulk pixel transfer
    fn begin_write(&mut self) -> Result<(), Self::Error>;

    /// Mark the end of a bulk pixel transfer
    fn end_write(&mut self) -> Result<(), Self::Error>;

    /// Stream pixels at the write cursor
    fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), Self::Error>;

    /// Address the inclusive window `(x0, y0)..=(x1, y1)` and arm a memory write
    ///
    /// Leaves the controller in RAMWR context with the cursor at `(x0, y0)`.
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error> {
        self.set_command(cmd::CASET)?;
        self.param16(x0)?;
        self.param16(x1)?;
        self.set_command(cmd::PASET)?;
        self.param16(y0)?;
        self.param16(y1)?;
        self.set_command(cmd::RAMWR)
    }

    /// Fill a `width × height` block at `(x, y)` with one pixel value
    ///
    /// `line` is scratch space for one row of the block; rows wider than the
    /// scratch are streamed in pieces. The block must already be clipped to
    /// the panel by the caller.
    fn fill(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixel: u16,
        line: &mut [u16],
    ) -> Result<(), Self::Error> {
        if width == 0 || height == 0 || line.is_empty() {
            return Ok(());
        }

        self.set_window(
            x,
            y,
            x.saturating_add(width - 1),
            y.saturating_add(height - 1),
        )?;
        self.begin_write()?;

        let row_len = usize::from(width);
        let chunk = row_len.min(line.len());
        line[..chunk].fill(pixel);

        for _ in 0..height {
            let mut remaining = row_len;
            while remaining > 0 {
                let n = remaining.min(chunk);
                self.write_pixels(&line[..n])?;
                remaining -= n;
            }
        }

        self.end_write()
    }
}

impl<T: DisplayController + ?Sized> DisplayController for &mut T {
    type Error = T::Error;

    fn set_command(&mut self, command: u8) -> Result<(), Self::Error> {
        (**self).set_command(command)
    }

    fn param(&mut self, value: u8) -> Result<(), Self::Error> {
        (**self).param(value)
    }

    fn param16(&mut self, value: u16) -> Result<(), Self::Error> {
        (**self).param16(value)
    }

    fn begin_write(&mut self) -> Result<(), Self::Error> {
        (**self).begin_write()
    }

    fn end_write(&mut self) -> Result<(), Self::Error> {
        (**self).end_write()
    }

    fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), Self::Error> {
        (**self).write_pixels(pixels)
    }
}
