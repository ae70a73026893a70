//! Haptos panel driver
//!
//! Device driver for Haptos smart touch-panel display modules. The panel
//! renders its widgets on board; this driver sends the binary commands
//! and reassembles the touch/value notifications coming back over the
//! same I2C bus.
//!
//! The blocking driver is [`Panel`]; an async variant over
//! `embedded-hal-async` lives in [`asynch`].
//!
//! ```ignore
//! let mut panel = Panel::new(i2c, rst);
//! panel.hard_reset(&mut delay)?;
//! panel.set_page(MAIN_PAGE)?;
//! panel.set_label(MAIN_PAGE, TITLE_LABEL, b"ready")?;
//!
//! loop {
//!     panel.read_byte()?;
//!     while let Some(event) = panel.next_event() {
//!         // react to PanelEvent::ButtonTouched { .. } etc.
//!     }
//! }
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod asynch;
mod panel;

pub use panel::{Panel, PANEL_ADDRESS};

pub use haptos_protocol as protocol;
pub use haptos_protocol::{Command, PanelEvent, RawFrame};

use haptos_protocol::CommandError;

/// Driver errors wrapping transport and encoding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<I2cE, PinE> {
    /// I2C transfer failed.
    Bus(I2cE),
    /// Reset pin could not be driven.
    Pin(PinE),
    /// Command could not be encoded.
    Command(CommandError),
}

impl<I2cE, PinE> From<CommandError> for Error<I2cE, PinE> {
    fn from(err: CommandError) -> Self {
        Error::Command(err)
    }
}
