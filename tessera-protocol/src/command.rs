//! Controller command set
//!
//! Only the commands the renderer and the panel bring-up actually issue are
//! listed. The emulator interprets the addressing commands and records
//! memory-access control; everything else is accepted and ignored.

/// ILI9341 command opcodes
pub mod cmd {
    /// Software reset
    pub const SWRESET: u8 = 0x01;
    /// Leave sleep mode
    pub const SLPOUT: u8 = 0x11;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Column address set (two 16-bit parameters: start, end)
    pub const CASET: u8 = 0x2A;
    /// Page (row) address set (two 16-bit parameters: start, end)
    pub const PASET: u8 = 0x2B;
    /// Memory write; resets the write cursor to the window origin
    pub const RAMWR: u8 = 0x2C;
    /// Memory access control (scan direction / row-column exchange)
    pub const MADCTL: u8 = 0x36;
    /// Interface pixel format
    pub const COLMOD: u8 = 0x3A;
}

/// Memory access control parameter bits
pub mod madctl {
    /// Row address order
    pub const MY: u8 = 0x80;
    /// Column address order
    pub const MX: u8 = 0x40;
    /// Row/column exchange
    pub const MV: u8 = 0x20;
    /// BGR subpixel order
    pub const BGR: u8 = 0x08;
}

/// Interface pixel format parameter for 16 bits per pixel (RGB565)
pub const COLMOD_RGB565: u8 = 0x55;
