//! Async panel driver over `embedded-hal-async`.
//!
//! Same receive pipeline as the blocking [`crate::Panel`]; only the bus
//! and delay operations await. The reset line stays a plain
//! [`OutputPin`], there is no async GPIO write.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use haptos_protocol::{ByteQueue, Command, FrameAssembler, PanelEvent, RawFrame};

use crate::Error;
use crate::PANEL_ADDRESS;

/// Async driver for a Haptos touch-panel display.
pub struct Panel<I2C, RST> {
    i2c: I2C,
    rst: RST,
    address: u8,
    queue: ByteQueue,
    assembler: FrameAssembler,
}

impl<I2C, RST> Panel<I2C, RST>
where
    I2C: I2c,
    RST: OutputPin,
{
    /// Driver at the factory-default address.
    pub fn new(i2c: I2C, rst: RST) -> Self {
        Self::with_address(i2c, rst, PANEL_ADDRESS)
    }

    /// Driver at a non-default address.
    pub fn with_address(i2c: I2C, rst: RST, address: u8) -> Self {
        Self {
            i2c,
            rst,
            address,
            queue: ByteQueue::new(),
            assembler: FrameAssembler::new(),
        }
    }

    /// Pulse the reset line: low for 1 ms, then high. Clears the receive
    /// pipeline.
    pub async fn hard_reset(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.rst.set_low().map_err(Error::Pin)?;
        delay.delay_us(1000).await;
        self.rst.set_high().map_err(Error::Pin)?;
        self.reset_rx();
        Ok(())
    }

    /// Encode and transmit one command as a single bus write.
    pub async fn send(
        &mut self,
        command: &Command<'_>,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        let bytes = command.encode()?;
        self.i2c
            .write(self.address, &bytes)
            .await
            .map_err(Error::Bus)
    }

    /// Read one pending byte from the panel into the receive queue.
    pub async fn read_byte(&mut self) -> Result<(), Error<I2C::Error, RST::Error>> {
        let mut byte = [0u8; 1];
        self.i2c
            .read(self.address, &mut byte)
            .await
            .map_err(Error::Bus)?;
        self.queue.push(byte[0]);
        Ok(())
    }

    /// Queue a byte received outside the driver.
    pub fn feed(&mut self, byte: u8) {
        self.queue.push(byte);
    }

    /// Next completed notification frame, if the queued bytes hold one.
    pub fn next_frame(&mut self) -> Option<RawFrame> {
        self.assembler.poll(&mut self.queue)
    }

    /// Next decoded notification; undecodable frames are skipped.
    pub fn next_event(&mut self) -> Option<PanelEvent> {
        while let Some(frame) = self.next_frame() {
            match PanelEvent::from_frame(&frame) {
                Ok(event) => return Some(event),
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("undecodable frame: {:?}", _err);
                }
            }
        }
        None
    }

    /// Drop queued bytes and any partial frame (explicit resync).
    pub fn reset_rx(&mut self) {
        self.queue.reset();
        self.assembler.reset();
    }

    /// Release the bus and reset pin.
    pub fn release(self) -> (I2C, RST) {
        (self.i2c, self.rst)
    }
}
