//! ILI9341-class SPI panel
//!
//! Driver for 4-wire SPI TFT controllers with a data/command select line.
//! Chip select is owned by the [`SpiDevice`]; every command byte and every
//! data burst is its own transaction.
//!
//! Pixel words are sent in memory order. Feed it words encoded with
//! [`ByteOrder::Swapped`](tessera_core::ByteOrder::Swapped) on a
//! little-endian MCU so they arrive big-endian on the wire.

use bytemuck::cast_slice;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use tessera_protocol::command::{cmd, COLMOD_RGB565};
use tessera_protocol::DisplayController;

/// Panel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError<SpiE, PinE> {
    /// SPI transfer failed
    Spi(SpiE),
    /// Data/command or reset pin failed
    Pin(PinE),
}

/// Delay after SWRESET before the controller accepts commands
const RESET_DELAY_MS: u32 = 150;

/// Delay after SLPOUT while the charge pumps settle
const SLEEP_OUT_DELAY_MS: u32 = 120;

/// Delay after DISPON
const DISPLAY_ON_DELAY_MS: u32 = 20;

/// SPI panel driver
pub struct SpiPanel<SPI, DC> {
    spi: SPI,
    dc: DC,
    /// Inside a begin/end pixel transfer
    writing: bool,
}

impl<SPI, DC> SpiPanel<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Wrap an SPI device and its data/command pin
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self {
            spi,
            dc,
            writing: false,
        }
    }

    /// Release the bus and pin
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    /// Bring the panel up: software reset, wake, RGB565, orientation, on
    ///
    /// `memory_access` is the MADCTL value, usually
    /// [`Orientation::memory_access`](tessera_core::Orientation::memory_access).
    pub fn init(
        &mut self,
        delay: &mut impl DelayNs,
        memory_access: u8,
    ) -> Result<(), PanelError<SPI::Error, DC::Error>> {
        debug!("panel init, MADCTL {=u8:#x}", memory_access);

        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(RESET_DELAY_MS);

        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(SLEEP_OUT_DELAY_MS);

        self.command(cmd::COLMOD, &[COLMOD_RGB565])?;
        self.command(cmd::MADCTL, &[memory_access])?;

        self.command(cmd::DISPON, &[])?;
        delay.delay_ms(DISPLAY_ON_DELAY_MS);

        Ok(())
    }

    /// Send a command byte followed by its parameter bytes
    pub fn command(
        &mut self,
        command: u8,
        params: &[u8],
    ) -> Result<(), PanelError<SPI::Error, DC::Error>> {
        self.dc.set_low().map_err(PanelError::Pin)?;
        self.spi.write(&[command]).map_err(PanelError::Spi)?;
        self.dc.set_high().map_err(PanelError::Pin)?;
        if !params.is_empty() {
            self.spi.write(params).map_err(PanelError::Spi)?;
        }
        Ok(())
    }

    /// Whether a pixel transfer is open
    pub fn is_writing(&self) -> bool {
        self.writing
    }
}

/// Hardware reset pulse on the panel's reset line
pub fn hard_reset<RST: OutputPin>(
    rst: &mut RST,
    delay: &mut impl DelayNs,
) -> Result<(), RST::Error> {
    rst.set_high()?;
    delay.delay_ms(1);
    rst.set_low()?;
    delay.delay_ms(10);
    rst.set_high()?;
    delay.delay_ms(RESET_DELAY_MS);
    Ok(())
}

impl<SPI, DC> DisplayController for SpiPanel<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = PanelError<SPI::Error, DC::Error>;

    fn set_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.command(command, &[])
    }

    fn param(&mut self, value: u8) -> Result<(), Self::Error> {
        self.spi.write(&[value]).map_err(PanelError::Spi)
    }

    fn param16(&mut self, value: u16) -> Result<(), Self::Error> {
        self.spi.write(&value.to_be_bytes()).map_err(PanelError::Spi)
    }

    fn begin_write(&mut self) -> Result<(), Self::Error> {
        self.writing = true;
        Ok(())
    }

    fn end_write(&mut self) -> Result<(), Self::Error> {
        self.writing = false;
        Ok(())
    }

    fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), Self::Error> {
        if pixels.is_empty() {
            return Ok(());
        }
        self.spi
            .write(cast_slice::<u16, u8>(pixels))
            .map_err(PanelError::Spi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use heapless::Vec;

    /// One recorded SPI write, tagged with the D/C level it went out with
    #[derive(Debug, PartialEq)]
    enum Wire {
        Command(u8),
        Data(Vec<u8, 16>),
    }

    #[derive(Default)]
    struct Bus {
        dc_high: bool,
        log: Vec<Wire, 32>,
    }

    struct MockSpi<'a>(&'a core::cell::RefCell<Bus>);
    struct MockDc<'a>(&'a core::cell::RefCell<Bus>);

    impl embedded_hal::spi::ErrorType for MockSpi<'_> {
        type Error = Infallible;
    }

    impl SpiDevice for MockSpi<'_> {
        fn transaction(
            &mut self,
            operations: &mut [embedded_hal::spi::Operation<'_, u8>],
        ) -> Result<(), Infallible> {
            let mut bus = self.0.borrow_mut();
            for op in operations {
                if let embedded_hal::spi::Operation::Write(bytes) = op {
                    let entry = if bus.dc_high {
                        Wire::Data(Vec::from_slice(bytes).unwrap())
                    } else {
                        assert_eq!(bytes.len(), 1);
                        Wire::Command(bytes[0])
                    };
                    bus.log.push(entry).unwrap();
                }
            }
            Ok(())
        }
    }

    impl embedded_hal::digital::ErrorType for MockDc<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MockDc<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dc_high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dc_high = true;
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn data(bytes: &[u8]) -> Wire {
        Wire::Data(Vec::from_slice(bytes).unwrap())
    }

    #[test]
    fn test_init_sequence() {
        let bus = core::cell::RefCell::new(Bus::default());
        let mut panel = SpiPanel::new(MockSpi(&bus), MockDc(&bus));
        panel.init(&mut NoDelay, 0x28).unwrap();

        assert_eq!(
            bus.borrow().log.as_slice(),
            &[
                Wire::Command(cmd::SWRESET),
                Wire::Command(cmd::SLPOUT),
                Wire::Command(cmd::COLMOD),
                data(&[0x55]),
                Wire::Command(cmd::MADCTL),
                data(&[0x28]),
                Wire::Command(cmd::DISPON),
            ]
        );
    }

    #[test]
    fn test_window_params_big_endian() {
        let bus = core::cell::RefCell::new(Bus::default());
        let mut panel = SpiPanel::new(MockSpi(&bus), MockDc(&bus));
        panel.set_window(0x0102, 0, 0x013F, 0x00EF).unwrap();

        assert_eq!(
            bus.borrow().log.as_slice(),
            &[
                Wire::Command(cmd::CASET),
                data(&[0x01, 0x02]),
                data(&[0x01, 0x3F]),
                Wire::Command(cmd::PASET),
                data(&[0x00, 0x00]),
                data(&[0x00, 0xEF]),
                Wire::Command(cmd::RAMWR),
            ]
        );
    }

    #[test]
    fn test_pixels_sent_in_memory_order() {
        let bus = core::cell::RefCell::new(Bus::default());
        let mut panel = SpiPanel::new(MockSpi(&bus), MockDc(&bus));

        panel.set_command(cmd::RAMWR).unwrap();
        panel.begin_write().unwrap();
        assert!(panel.is_writing());
        let words = [0x1234u16, 0xABCD];
        panel.write_pixels(&words).unwrap();
        panel.write_pixels(&[]).unwrap();
        panel.end_write().unwrap();
        assert!(!panel.is_writing());

        let log = &bus.borrow().log;
        assert_eq!(log.len(), 2);
        let mut expected = [0u8; 4];
        expected[..2].copy_from_slice(&words[0].to_ne_bytes());
        expected[2..].copy_from_slice(&words[1].to_ne_bytes());
        assert_eq!(log[1], data(&expected));
    }
}
