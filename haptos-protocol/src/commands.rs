//! Outbound command encoding.
//!
//! Every command serializes as `[opcode][fields...]` with multi-byte
//! values big-endian, and goes to the panel as a single bus write. Widget
//! commands address their target as `[control_id][page_id]` right after
//! the opcode. Text rides at the tail as raw bytes, no terminator; the
//! byte meaning depends on the font bank in use (ASC banks are ASCII,
//! HZK banks are GB2312-coded).

use heapless::Vec;

/// Largest encoded command, matching the panel's command buffer.
pub const MAX_COMMAND_SIZE: usize = 65;

// Screen and touch-panel opcodes
const CMD_ICON_DISPLAY: u8 = 0x49;
const CMD_CUT_ICON: u8 = 0x4F;
const CMD_CLEAR_SCREEN: u8 = 0x43;
const CMD_STR_DISPLAY: u8 = 0x53;
const CMD_DRAW_FILL_RECT: u8 = 0x46;
const CMD_DRAW_RECT: u8 = 0x52;
const CMD_DRAW_LINE: u8 = 0x4C;
const CMD_SET_BRIGHTNESS: u8 = 0x42;
const CMD_TP_CALIBRATION: u8 = 0x50;
const CMD_TP_TEST: u8 = 0x54;
const CMD_TP_SET: u8 = 0x51;
const CMD_MESSAGE_DISPLAY: u8 = 0x4D;
const CMD_RESET: u8 = 0x4A;

// Widget opcodes
const WIDGET_SET_PAGE: u8 = 0x70;
const WIDGET_GET_PAGE: u8 = 0x71;
const WIDGET_LABEL: u8 = 0x74;
const WIDGET_NUMBER: u8 = 0x6E;
const WIDGET_EDIT: u8 = 0x65;
const WIDGET_GET_EDIT: u8 = 0x75;
const WIDGET_GET_TOUCH_EDIT: u8 = 0x7C;
const WIDGET_PROGRESS: u8 = 0x6F;
const WIDGET_CHECKBOX: u8 = 0x63;
const WIDGET_GET_CHECKBOX: u8 = 0x64;
const WIDGET_CIRCLE_GAUGE: u8 = 0x7A;
const WIDGET_BAR_GAUGE: u8 = 0x61;
const WIDGET_WATER_GAUGE: u8 = 0x77;
const WIDGET_THERMOMETER: u8 = 0x6D;
const WIDGET_BATTERY: u8 = 0x79;
const WIDGET_WAVEFORM: u8 = 0x66;
const WIDGET_CLEAR_WAVEFORM: u8 = 0x76;
const WIDGET_INSERT_WAVEFORM: u8 = 0x6A;
const WIDGET_REFRESH_WAVEFORM: u8 = 0x6B;
const WIDGET_GET_SLIDER: u8 = 0x68;
const WIDGET_SET_SLIDER: u8 = 0x5F;

/// RGB565 colors the panel documentation names.
pub mod color {
    pub const RED: u16 = 0xF800;
    pub const GREEN: u16 = 0x07E0;
    pub const BLUE: u16 = 0x001F;
    pub const LIGHT_BLUE: u16 = 0x075F;
}

/// Font banks selectable for text commands.
///
/// ASC banks hold ASCII bitmap glyphs at 8/12/16 px; HZK banks hold
/// GB2312-coded glyphs at 16/24/32 px.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontBank {
    Asc8 = 1,
    Asc12 = 2,
    Asc16 = 3,
    Hzk16 = 4,
    Hzk24 = 5,
    Hzk32 = 6,
}

impl FontBank {
    /// Convert to the wire byte.
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Errors that can occur while encoding a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Encoded command would not fit the panel's 65-byte command buffer.
    TextTooLong,
}

/// A command to the panel, ready to encode for one bus write.
///
/// Widget setters take effect even while another page is shown; the
/// panel repaints when the owning page becomes visible. The `Get*`
/// queries are answered asynchronously with a notification frame (see
/// [`crate::events::PanelEvent`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// Soft-reset the panel controller.
    Reset,
    /// Fill the whole screen with an RGB565 color.
    ClearScreen { color: u16 },
    /// Show an image from the panel's flash catalogue at a pixel position.
    DisplayImage { x: u16, y: u16, image_id: u8 },
    /// Show a cropped region of a catalogued image.
    DisplayCutImage {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        image_id: u8,
    },
    /// Render text at a pixel position.
    PutString {
        x: u16,
        y: u16,
        display_mode: u8,
        font: FontBank,
        image_id: u8,
        background: u16,
        foreground: u16,
        text: &'a [u8],
    },
    /// Pop up a transient message box for `seconds`.
    DisplayMessage {
        font: FontBank,
        seconds: u8,
        text: &'a [u8],
    },
    Line {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    },
    Rectangle {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    },
    FilledRectangle {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    },
    /// Backlight level.
    SetBrightness { level: u8 },
    /// Enable or disable touch reporting.
    TouchPanelEnable { enable: bool },
    /// Enter the panel's touch calibration routine.
    CalibrateTouchPanel,
    /// Enable or disable the touch test overlay.
    TouchPanelTest { enable: bool },

    /// Switch the visible page.
    SetPage { page_id: u8 },
    /// Ask which page is visible; answered by `PageReported`.
    GetPage,
    /// Replace a label control's text.
    SetLabel {
        page_id: u8,
        control_id: u8,
        text: &'a [u8],
    },
    /// Replace a number control's value.
    SetNumber {
        page_id: u8,
        control_id: u8,
        value: u16,
    },
    /// Replace an edit control's contents.
    SetEdit {
        page_id: u8,
        control_id: u8,
        text: &'a [u8],
    },
    /// Ask for an edit control's contents; answered by `EditReported`.
    GetEdit { page_id: u8, control_id: u8 },
    /// Ask for a touch-edit control's contents; answered by
    /// `TouchEditReported`.
    GetTouchEdit { page_id: u8, control_id: u8 },
    SetProgressBar {
        page_id: u8,
        control_id: u8,
        value: u8,
    },
    SetCheckbox {
        page_id: u8,
        control_id: u8,
        value: u8,
    },
    /// Ask for a checkbox state; answered by `CheckboxReported`.
    GetCheckbox { page_id: u8, control_id: u8 },
    SetCircleGauge {
        page_id: u8,
        control_id: u8,
        value: u16,
    },
    SetBarGauge {
        page_id: u8,
        control_id: u8,
        value: u16,
    },
    SetWaterGauge {
        page_id: u8,
        control_id: u8,
        value: u16,
    },
    SetThermometer {
        page_id: u8,
        control_id: u8,
        value: u16,
    },
    SetBattery {
        page_id: u8,
        control_id: u8,
        value: u16,
    },
    /// Append a sample to a waveform channel and draw it.
    SetWaveform {
        page_id: u8,
        control_id: u8,
        channel: u8,
        value: u8,
    },
    /// Drop all buffered waveform samples.
    WaveformClear { page_id: u8, control_id: u8 },
    /// Buffer a sample without drawing.
    WaveformInsert {
        page_id: u8,
        control_id: u8,
        channel: u8,
        value: u8,
    },
    /// Redraw a channel from buffered samples.
    WaveformRefresh {
        page_id: u8,
        control_id: u8,
        channel: u8,
    },
    /// Ask for a slider position; answered by `SliderReported`.
    GetSlider { page_id: u8, control_id: u8 },
    SetSlider {
        page_id: u8,
        control_id: u8,
        value: u8,
    },
}

impl<'a> Command<'a> {
    /// Encode into the byte sequence for one bus write.
    pub fn encode(&self) -> Result<Vec<u8, MAX_COMMAND_SIZE>, CommandError> {
        let mut out = Encoder::new();
        match *self {
            Command::Reset => {
                out.u8(CMD_RESET)?;
                out.bytes(b"Reset")?;
            }
            Command::ClearScreen { color } => {
                out.u8(CMD_CLEAR_SCREEN)?;
                out.u16(color)?;
            }
            Command::DisplayImage { x, y, image_id } => {
                out.u8(CMD_ICON_DISPLAY)?;
                out.u16(x)?;
                out.u16(y)?;
                out.u8(image_id)?;
            }
            Command::DisplayCutImage {
                x,
                y,
                width,
                height,
                image_id,
            } => {
                out.u8(CMD_CUT_ICON)?;
                out.u16(x)?;
                out.u16(y)?;
                out.u16(width)?;
                out.u16(height)?;
                out.u8(image_id)?;
            }
            Command::PutString {
                x,
                y,
                display_mode,
                font,
                image_id,
                background,
                foreground,
                text,
            } => {
                out.u8(CMD_STR_DISPLAY)?;
                out.u16(x)?;
                out.u16(y)?;
                out.u8(display_mode)?;
                out.u8(font.to_byte())?;
                out.u8(image_id)?;
                out.u16(background)?;
                out.u16(foreground)?;
                out.bytes(text)?;
            }
            Command::DisplayMessage {
                font,
                seconds,
                text,
            } => {
                out.u8(CMD_MESSAGE_DISPLAY)?;
                out.u8(font.to_byte())?;
                out.u8(seconds)?;
                out.bytes(text)?;
            }
            Command::Line { x0, y0, x1, y1, color } => {
                out.u8(CMD_DRAW_LINE)?;
                out.rect(x0, y0, x1, y1, color)?;
            }
            Command::Rectangle { x0, y0, x1, y1, color } => {
                out.u8(CMD_DRAW_RECT)?;
                out.rect(x0, y0, x1, y1, color)?;
            }
            Command::FilledRectangle { x0, y0, x1, y1, color } => {
                out.u8(CMD_DRAW_FILL_RECT)?;
                out.rect(x0, y0, x1, y1, color)?;
            }
            Command::SetBrightness { level } => {
                out.u8(CMD_SET_BRIGHTNESS)?;
                out.u8(level)?;
            }
            Command::TouchPanelEnable { enable } => {
                out.u8(CMD_TP_SET)?;
                out.u8(enable as u8)?;
            }
            Command::CalibrateTouchPanel => {
                out.u8(CMD_TP_CALIBRATION)?;
                out.u8(CMD_TP_CALIBRATION)?;
            }
            Command::TouchPanelTest { enable } => {
                out.u8(CMD_TP_TEST)?;
                out.u8(enable as u8)?;
            }
            Command::SetPage { page_id } => {
                out.u8(WIDGET_SET_PAGE)?;
                out.u8(page_id)?;
            }
            Command::GetPage => {
                out.u8(WIDGET_GET_PAGE)?;
            }
            Command::SetLabel {
                page_id,
                control_id,
                text,
            } => {
                out.widget(WIDGET_LABEL, control_id, page_id)?;
                out.bytes(text)?;
            }
            Command::SetNumber {
                page_id,
                control_id,
                value,
            } => {
                out.widget(WIDGET_NUMBER, control_id, page_id)?;
                out.u16(value)?;
            }
            Command::SetEdit {
                page_id,
                control_id,
                text,
            } => {
                out.widget(WIDGET_EDIT, control_id, page_id)?;
                out.bytes(text)?;
            }
            Command::GetEdit {
                page_id,
                control_id,
            } => {
                out.widget(WIDGET_GET_EDIT, control_id, page_id)?;
            }
            Command::GetTouchEdit {
                page_id,
                control_id,
            } => {
                out.widget(WIDGET_GET_TOUCH_EDIT, control_id, page_id)?;
            }
            Command::SetProgressBar {
                page_id,
                control_id,
                value,
            } => {
                out.widget(WIDGET_PROGRESS, control_id, page_id)?;
                out.u8(value)?;
            }
            Command::SetCheckbox {
                page_id,
                control_id,
                value,
            } => {
                out.widget(WIDGET_CHECKBOX, control_id, page_id)?;
                out.u8(value)?;
            }
            Command::GetCheckbox {
                page_id,
                control_id,
            } => {
                out.widget(WIDGET_GET_CHECKBOX, control_id, page_id)?;
            }
            Command::SetCircleGauge {
                page_id,
                control_id,
                value,
            } => {
                out.widget(WIDGET_CIRCLE_GAUGE, control_id, page_id)?;
                out.u16(value)?;
            }
            Command::SetBarGauge {
                page_id,
                control_id,
                value,
            } => {
                out.widget(WIDGET_BAR_GAUGE, control_id, page_id)?;
                out.u16(value)?;
            }
            Command::SetWaterGauge {
                page_id,
                control_id,
                value,
            } => {
                out.widget(WIDGET_WATER_GAUGE, control_id, page_id)?;
                out.u16(value)?;
            }
            Command::SetThermometer {
                page_id,
                control_id,
                value,
            } => {
                out.widget(WIDGET_THERMOMETER, control_id, page_id)?;
                out.u16(value)?;
            }
            Command::SetBattery {
                page_id,
                control_id,
                value,
            } => {
                out.widget(WIDGET_BATTERY, control_id, page_id)?;
                out.u16(value)?;
            }
            Command::SetWaveform {
                page_id,
                control_id,
                channel,
                value,
            } => {
                out.widget(WIDGET_WAVEFORM, control_id, page_id)?;
                out.u8(channel)?;
                out.u8(value)?;
            }
            Command::WaveformClear {
                page_id,
                control_id,
            } => {
                out.widget(WIDGET_CLEAR_WAVEFORM, control_id, page_id)?;
            }
            Command::WaveformInsert {
                page_id,
                control_id,
                channel,
                value,
            } => {
                out.widget(WIDGET_INSERT_WAVEFORM, control_id, page_id)?;
                out.u8(channel)?;
                out.u8(value)?;
            }
            Command::WaveformRefresh {
                page_id,
                control_id,
                channel,
            } => {
                out.widget(WIDGET_REFRESH_WAVEFORM, control_id, page_id)?;
                out.u8(channel)?;
            }
            Command::GetSlider {
                page_id,
                control_id,
            } => {
                out.widget(WIDGET_GET_SLIDER, control_id, page_id)?;
            }
            Command::SetSlider {
                page_id,
                control_id,
                value,
            } => {
                out.widget(WIDGET_SET_SLIDER, control_id, page_id)?;
                out.u8(value)?;
            }
        }
        Ok(out.finish())
    }
}

struct Encoder {
    buf: Vec<u8, MAX_COMMAND_SIZE>,
}

impl Encoder {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn u8(&mut self, byte: u8) -> Result<(), CommandError> {
        self.buf.push(byte).map_err(|_| CommandError::TextTooLong)
    }

    fn u16(&mut self, value: u16) -> Result<(), CommandError> {
        self.u8((value >> 8) as u8)?;
        self.u8(value as u8)
    }

    fn bytes(&mut self, bytes: &[u8]) -> Result<(), CommandError> {
        self.buf
            .extend_from_slice(bytes)
            .map_err(|_| CommandError::TextTooLong)
    }

    /// Widget preamble: opcode, then control before page on the wire.
    fn widget(&mut self, opcode: u8, control_id: u8, page_id: u8) -> Result<(), CommandError> {
        self.u8(opcode)?;
        self.u8(control_id)?;
        self.u8(page_id)
    }

    /// Two corner points and a color, the shared layout of the drawing
    /// primitives.
    fn rect(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, color: u16) -> Result<(), CommandError> {
        self.u16(x0)?;
        self.u16(y0)?;
        self.u16(x1)?;
        self.u16(y1)?;
        self.u16(color)
    }

    fn finish(self) -> Vec<u8, MAX_COMMAND_SIZE> {
        self.buf
    }
}
