//! Blocking panel driver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use haptos_protocol::{ByteQueue, Command, FontBank, FrameAssembler, PanelEvent, RawFrame};

use crate::Error;

/// Factory-default bus address of the panel controller.
pub const PANEL_ADDRESS: u8 = 0x77;

/// Blocking driver for a Haptos touch-panel display.
///
/// Owns the bus handle, the reset line, and the receive pipeline (byte
/// queue + frame assembler). Bytes enter the pipeline either through
/// [`Panel::read_byte`] (driver-paced bus reads) or [`Panel::feed`]
/// (externally drained bytes, e.g. from an interrupt handler);
/// [`Panel::next_event`] turns them into decoded notifications.
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

    /// Driver at a non-default address (panels can be re-strapped).
    pub fn with_address(i2c: I2C, rst: RST, address: u8) -> Self {
        Self {
            i2c,
            rst,
            address,
            queue: ByteQueue::new(),
            assembler: FrameAssembler::new(),
        }
    }

    /// Pulse the reset line: low for 1 ms, then high.
    ///
    /// The panel reboots to its power-on page; the receive pipeline is
    /// cleared since any partial frame died with the panel.
    pub fn hard_reset(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.rst.set_low().map_err(Error::Pin)?;
        delay.delay_us(1000);
        self.rst.set_high().map_err(Error::Pin)?;
        self.reset_rx();
        Ok(())
    }

    /// Encode and transmit one command as a single bus write.
    pub fn send(&mut self, command: &Command<'_>) -> Result<(), Error<I2C::Error, RST::Error>> {
        let bytes = command.encode()?;
        self.i2c.write(self.address, &bytes).map_err(Error::Bus)
    }

    /// Read one pending byte from the panel into the receive queue.
    pub fn read_byte(&mut self) -> Result<(), Error<I2C::Error, RST::Error>> {
        let mut byte = [0u8; 1];
        self.i2c.read(self.address, &mut byte).map_err(Error::Bus)?;
        self.queue.push(byte[0]);
        Ok(())
    }

    /// Queue a byte that was received outside the driver, e.g. by an
    /// interrupt handler draining the bus itself.
    pub fn feed(&mut self, byte: u8) {
        self.queue.push(byte);
    }

    /// Next completed notification frame, if the queued bytes hold one.
    pub fn next_frame(&mut self) -> Option<RawFrame> {
        self.assembler.poll(&mut self.queue)
    }

    /// Next decoded notification.
    ///
    /// Frames that fail to decode are skipped. The assembler only emits
    /// recognized opcodes, so a failure here means a vocabulary byte this
    /// driver and the panel firmware disagree on.
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

/// Widget and screen operations, one bus write each.
impl<I2C, RST> Panel<I2C, RST>
where
    I2C: I2c,
    RST: OutputPin,
{
    /// Soft-reset the panel controller over the bus.
    pub fn reset_panel(&mut self) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::Reset)
    }

    pub fn clear_screen(&mut self, color: u16) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::ClearScreen { color })
    }

    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetBrightness { level })
    }

    pub fn touch_panel_enable(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::TouchPanelEnable { enable })
    }

    pub fn calibrate_touch_panel(&mut self) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::CalibrateTouchPanel)
    }

    pub fn touch_panel_test(&mut self, enable: bool) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::TouchPanelTest { enable })
    }

    pub fn display_image(
        &mut self,
        x: u16,
        y: u16,
        image_id: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::DisplayImage { x, y, image_id })
    }

    pub fn display_cut_image(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        image_id: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::DisplayCutImage {
            x,
            y,
            width,
            height,
            image_id,
        })
    }

    /// Render text at a pixel position.
    #[allow(clippy::too_many_arguments)]
    pub fn put_string(
        &mut self,
        x: u16,
        y: u16,
        display_mode: u8,
        font: FontBank,
        image_id: u8,
        background: u16,
        foreground: u16,
        text: &[u8],
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::PutString {
            x,
            y,
            display_mode,
            font,
            image_id,
            background,
            foreground,
            text,
        })
    }

    /// Pop up a transient message box for `seconds`.
    pub fn display_message(
        &mut self,
        font: FontBank,
        seconds: u8,
        text: &[u8],
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::DisplayMessage {
            font,
            seconds,
            text,
        })
    }

    pub fn draw_line(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::Line { x0, y0, x1, y1, color })
    }

    pub fn draw_rectangle(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::Rectangle { x0, y0, x1, y1, color })
    }

    pub fn fill_rectangle(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::FilledRectangle { x0, y0, x1, y1, color })
    }

    /// Switch the visible page.
    pub fn set_page(&mut self, page_id: u8) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetPage { page_id })
    }

    /// Ask which page is visible; the answer arrives as
    /// [`PanelEvent::PageReported`].
    pub fn request_page(&mut self) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::GetPage)
    }

    pub fn set_label(
        &mut self,
        page_id: u8,
        control_id: u8,
        text: &[u8],
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetLabel {
            page_id,
            control_id,
            text,
        })
    }

    pub fn set_number(
        &mut self,
        page_id: u8,
        control_id: u8,
        value: u16,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetNumber {
            page_id,
            control_id,
            value,
        })
    }

    pub fn set_edit(
        &mut self,
        page_id: u8,
        control_id: u8,
        text: &[u8],
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetEdit {
            page_id,
            control_id,
            text,
        })
    }

    /// Ask for an edit control's contents; the answer arrives as
    /// [`PanelEvent::EditReported`].
    pub fn request_edit(
        &mut self,
        page_id: u8,
        control_id: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::GetEdit {
            page_id,
            control_id,
        })
    }

    /// Ask for a touch-edit control's contents; the answer arrives as
    /// [`PanelEvent::TouchEditReported`].
    pub fn request_touch_edit(
        &mut self,
        page_id: u8,
        control_id: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::GetTouchEdit {
            page_id,
            control_id,
        })
    }

    pub fn set_progress_bar(
        &mut self,
        page_id: u8,
        control_id: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetProgressBar {
            page_id,
            control_id,
            value,
        })
    }

    pub fn set_checkbox(
        &mut self,
        page_id: u8,
        control_id: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetCheckbox {
            page_id,
            control_id,
            value,
        })
    }

    /// Ask for a checkbox state; the answer arrives as
    /// [`PanelEvent::CheckboxReported`].
    pub fn request_checkbox(
        &mut self,
        page_id: u8,
        control_id: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::GetCheckbox {
            page_id,
            control_id,
        })
    }

    pub fn set_circle_gauge(
        &mut self,
        page_id: u8,
        control_id: u8,
        value: u16,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetCircleGauge {
            page_id,
            control_id,
            value,
        })
    }

    pub fn set_bar_gauge(
        &mut self,
        page_id: u8,
        control_id: u8,
        value: u16,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetBarGauge {
            page_id,
            control_id,
            value,
        })
    }

    pub fn set_water_gauge(
        &mut self,
        page_id: u8,
        control_id: u8,
        value: u16,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetWaterGauge {
            page_id,
            control_id,
            value,
        })
    }

    pub fn set_thermometer(
        &mut self,
        page_id: u8,
        control_id: u8,
        value: u16,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetThermometer {
            page_id,
            control_id,
            value,
        })
    }

    pub fn set_battery(
        &mut self,
        page_id: u8,
        control_id: u8,
        value: u16,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetBattery {
            page_id,
            control_id,
            value,
        })
    }

    pub fn set_waveform(
        &mut self,
        page_id: u8,
        control_id: u8,
        channel: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetWaveform {
            page_id,
            control_id,
            channel,
            value,
        })
    }

    pub fn waveform_clear(
        &mut self,
        page_id: u8,
        control_id: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::WaveformClear {
            page_id,
            control_id,
        })
    }

    pub fn waveform_insert(
        &mut self,
        page_id: u8,
        control_id: u8,
        channel: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::WaveformInsert {
            page_id,
            control_id,
            channel,
            value,
        })
    }

    pub fn waveform_refresh(
        &mut self,
        page_id: u8,
        control_id: u8,
        channel: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::WaveformRefresh {
            page_id,
            control_id,
            channel,
        })
    }

    /// Ask for a slider position; the answer arrives as
    /// [`PanelEvent::SliderReported`].
    pub fn request_slider(
        &mut self,
        page_id: u8,
        control_id: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::GetSlider {
            page_id,
            control_id,
        })
    }

    pub fn set_slider(
        &mut self,
        page_id: u8,
        control_id: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error, RST::Error>> {
        self.send(&Command::SetSlider {
            page_id,
            control_id,
            value,
        })
    }
}
