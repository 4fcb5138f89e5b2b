//! Addressing window state machine
//!
//! Tracks the command context, the `(x0, x1) × (y0, y1)` window set through
//! CASET/PASET parameter pairs, and the write cursor that RAMWR arms.
//!
//! Each axis has its own start/end toggle: the first 16-bit parameter after
//! CASET sets `x0`, the second sets `x1`, and likewise for PASET and `y0`/`y1`.
//! Selecting the axis command rearms its toggle, the other axis is untouched.

use crate::command::cmd;

/// Where the next streamed pixel goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Placement {
    /// Inside the window rows at this controller coordinate
    ///
    /// The coordinate may still lie outside the backing surface.
    At { x: u32, y: u32 },
    /// The cursor has wrapped past the bottom row of the window
    Overrun,
}

/// Controller addressing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressWindow {
    /// Current command context
    command: u8,
    x0: u16,
    x1: u16,
    y0: u16,
    y1: u16,
    /// Write cursor (wider than the window so it never wraps numerically)
    cx: u32,
    cy: u32,
    /// Next CASET parameter sets `x1`
    x_end_next: bool,
    /// Next PASET parameter sets `y1`
    y_end_next: bool,
}

impl Default for AddressWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressWindow {
    /// Create a window state with everything at zero
    pub const fn new() -> Self {
        Self {
            command: 0,
            x0: 0,
            x1: 0,
            y0: 0,
            y1: 0,
            cx: 0,
            cy: 0,
            x_end_next: false,
            y_end_next: false,
        }
    }

    /// Select the current command context
    ///
    /// RAMWR moves the write cursor to `(x0, y0)`.
    pub fn command(&mut self, command: u8) {
        self.command = command;
        match command {
            cmd::CASET => self.x_end_next = false,
            cmd::PASET => self.y_end_next = false,
            cmd::RAMWR => {
                self.cx = u32::from(self.x0);
                self.cy = u32::from(self.y0);
            }
            _ => {}
        }
    }

    /// Feed a 16-bit parameter to the current command
    ///
    /// Ignored unless the current command is CASET or PASET.
    pub fn param16(&mut self, value: u16) {
        match self.command {
            cmd::CASET => {
                if self.x_end_next {
                    self.x1 = value;
                } else {
                    self.x0 = value;
                }
                self.x_end_next = !self.x_end_next;
            }
            cmd::PASET => {
                if self.y_end_next {
                    self.y1 = value;
                } else {
                    self.y0 = value;
                }
                self.y_end_next = !self.y_end_next;
            }
            _ => {}
        }
    }

    /// Consume one pixel slot and advance the cursor
    ///
    /// The cursor advances (and wraps at `x1`) whether or not the caller can
    /// actually store the pixel, so clipping never desynchronizes later rows.
    pub fn advance(&mut self) -> Placement {
        let placement = if self.cy > u32::from(self.y1) {
            Placement::Overrun
        } else {
            Placement::At {
                x: self.cx,
                y: self.cy,
            }
        };

        self.cx += 1;
        if self.cx > u32::from(self.x1) {
            self.cx = u32::from(self.x0);
            self.cy += 1;
        }

        placement
    }

    /// Current command context
    pub fn current_command(&self) -> u8 {
        self.command
    }

    /// Window bounds as `(x0, y0, x1, y1)`, inclusive
    pub fn bounds(&self) -> (u16, u16, u16, u16) {
        (self.x0, self.y0, self.x1, self.y1)
    }

    /// Write cursor position
    pub fn cursor(&self) -> (u32, u32) {
        (self.cx, self.cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addressed(x0: u16, y0: u16, x1: u16, y1: u16) -> AddressWindow {
        let mut w = AddressWindow::new();
        w.command(cmd::CASET);
        w.param16(x0);
        w.param16(x1);
        w.command(cmd::PASET);
        w.param16(y0);
        w.param16(y1);
        w.command(cmd::RAMWR);
        w
    }

    #[test]
    fn test_parameter_pairs_set_bounds() {
        let w = addressed(10, 20, 17, 27);
        assert_eq!(w.bounds(), (10, 20, 17, 27));
        assert_eq!(w.cursor(), (10, 20));
    }

    #[test]
    fn test_axis_toggles_are_independent() {
        let mut w = AddressWindow::new();
        w.command(cmd::CASET);
        w.param16(4);
        // Switch axis halfway through the column pair
        w.command(cmd::PASET);
        w.param16(6);
        w.param16(9);
        assert_eq!(w.bounds(), (4, 6, 0, 9));
    }

    #[test]
    fn test_reselecting_axis_rearms_toggle() {
        let mut w = AddressWindow::new();
        w.command(cmd::CASET);
        w.param16(1);
        w.command(cmd::CASET);
        w.param16(2);
        w.param16(3);
        assert_eq!(w.bounds().0, 2);
        assert_eq!(w.bounds().2, 3);
    }

    #[test]
    fn test_params_ignored_for_other_commands() {
        let mut w = addressed(1, 1, 2, 2);
        w.command(cmd::MADCTL);
        w.param16(0xFFFF);
        assert_eq!(w.bounds(), (1, 1, 2, 2));
    }

    #[test]
    fn test_cursor_wraps_at_window_edge() {
        let mut w = addressed(5, 0, 6, 1);
        assert_eq!(w.advance(), Placement::At { x: 5, y: 0 });
        assert_eq!(w.advance(), Placement::At { x: 6, y: 0 });
        assert_eq!(w.advance(), Placement::At { x: 5, y: 1 });
        assert_eq!(w.advance(), Placement::At { x: 6, y: 1 });
        assert_eq!(w.advance(), Placement::Overrun);
    }

    #[test]
    fn test_ramwr_resets_cursor() {
        let mut w = addressed(3, 3, 4, 4);
        w.advance();
        w.advance();
        w.advance();
        w.command(cmd::RAMWR);
        assert_eq!(w.cursor(), (3, 3));
    }

    #[test]
    fn test_cursor_survives_u16_edge() {
        let mut w = addressed(0xFFFF, 0, 0xFFFF, 0);
        assert_eq!(w.advance(), Placement::At { x: 0xFFFF, y: 0 });
        assert_eq!(w.advance(), Placement::Overrun);
    }
}
