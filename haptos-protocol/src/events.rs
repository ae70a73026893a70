//! Decoded notification events.
//!
//! [`PanelEvent`] gives each opcode family a record with named fields,
//! decoded from a completed [`RawFrame`] after its length is resolved.
//! The raw header slots (STATUS, KEY_TYPE, KEY_VALUE) mean different
//! things per family; the wire vocabularies live in [`TouchAction`],
//! [`CheckboxState`] and [`EditKey`].

use heapless::Vec;

use crate::assembler::{
    RawFrame, FRAME_HEADER_LEN, MAX_FRAME_SIZE, NOTIFY_GET_CHECKBOX, NOTIFY_GET_EDIT,
    NOTIFY_GET_PAGE, NOTIFY_GET_SLIDER, NOTIFY_GET_TOUCH_EDIT, NOTIFY_TOUCH_BUTTON,
    NOTIFY_TOUCH_CHECKBOX, NOTIFY_TOUCH_EDIT, NOTIFY_TOUCH_SLIDER,
};

/// Longest edit text a single frame can carry.
pub const MAX_TEXT_LEN: usize = MAX_FRAME_SIZE - FRAME_HEADER_LEN;

// Wire values for the STATUS slot of touch notifications
const STATUS_KEY_DOWN: u8 = 0x44;
const STATUS_KEY_RELEASE: u8 = 0x55;

// Wire values for checkbox state
const CHECKBOX_SELECTED: u8 = 0x53;
const CHECKBOX_UNSELECTED: u8 = 0x55;

// Wire values for the KEY_TYPE slot of touch-edit notifications
const KEY_CHAR: u8 = 0x30;
const KEY_CLEAR: u8 = 0x31;
const KEY_BACKSPACE: u8 = 0x32;
const KEY_SPACE: u8 = 0x33;
const KEY_ENTER: u8 = 0x34;
const KEY_CHANGE_PAGE: u8 = 0x35;
const KEY_UPLOAD_CONTROL_ID: u8 = 0x36;

/// Press phase of a touch notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchAction {
    /// Finger down on the control
    Down,
    /// Finger lifted
    Release,
}

impl TouchAction {
    /// Parse from the STATUS wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            STATUS_KEY_DOWN => Some(TouchAction::Down),
            STATUS_KEY_RELEASE => Some(TouchAction::Release),
            _ => None,
        }
    }

    /// Convert to the STATUS wire byte.
    pub fn to_byte(self) -> u8 {
        match self {
            TouchAction::Down => STATUS_KEY_DOWN,
            TouchAction::Release => STATUS_KEY_RELEASE,
        }
    }
}

/// Checkbox state as reported by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CheckboxState {
    Selected,
    Unselected,
}

impl CheckboxState {
    /// Parse from the wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CHECKBOX_SELECTED => Some(CheckboxState::Selected),
            CHECKBOX_UNSELECTED => Some(CheckboxState::Unselected),
            _ => None,
        }
    }

    /// Convert to the wire byte.
    pub fn to_byte(self) -> u8 {
        match self {
            CheckboxState::Selected => CHECKBOX_SELECTED,
            CheckboxState::Unselected => CHECKBOX_UNSELECTED,
        }
    }

    /// Returns true for [`CheckboxState::Selected`].
    pub fn is_selected(self) -> bool {
        matches!(self, CheckboxState::Selected)
    }
}

/// Key reported by the panel's on-screen keyboard while an edit control
/// has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditKey {
    /// A printable character; the character code rides in the KEY_VALUE
    /// slot
    Char,
    /// Clear the edit contents
    Clear,
    Backspace,
    Space,
    Enter,
    /// Keyboard asked for a page change
    ChangePage,
    /// Keyboard uploaded the focused control id
    UploadControlId,
}

impl EditKey {
    /// Parse from the KEY_TYPE wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            KEY_CHAR => Some(EditKey::Char),
            KEY_CLEAR => Some(EditKey::Clear),
            KEY_BACKSPACE => Some(EditKey::Backspace),
            KEY_SPACE => Some(EditKey::Space),
            KEY_ENTER => Some(EditKey::Enter),
            KEY_CHANGE_PAGE => Some(EditKey::ChangePage),
            KEY_UPLOAD_CONTROL_ID => Some(EditKey::UploadControlId),
            _ => None,
        }
    }

    /// Convert to the KEY_TYPE wire byte.
    pub fn to_byte(self) -> u8 {
        match self {
            EditKey::Char => KEY_CHAR,
            EditKey::Clear => KEY_CLEAR,
            EditKey::Backspace => KEY_BACKSPACE,
            EditKey::Space => KEY_SPACE,
            EditKey::Enter => KEY_ENTER,
            EditKey::ChangePage => KEY_CHANGE_PAGE,
            EditKey::UploadControlId => KEY_UPLOAD_CONTROL_ID,
        }
    }
}

/// Errors that can occur while decoding a frame into an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Frame length does not match its opcode's layout.
    Truncated,
    /// Leading byte is not a notification opcode.
    UnknownOpcode,
    /// A header slot held a value outside its wire vocabulary.
    InvalidField,
}

/// A decoded notification from the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// A button control was touched (0x62).
    ButtonTouched {
        control_id: u8,
        page_id: u8,
        action: TouchAction,
        /// Raw KEY_TYPE slot; meaning depends on the button's configuration
        key_type: u8,
        /// Raw KEY_VALUE slot
        key_value: u8,
    },
    /// A checkbox control was touched (0x60).
    CheckboxTouched {
        control_id: u8,
        page_id: u8,
        state: CheckboxState,
    },
    /// A slider control was dragged (0x67).
    SliderTouched {
        control_id: u8,
        page_id: u8,
        value: u8,
    },
    /// The on-screen keyboard reported a key for an edit control (0x7B).
    EditTouched {
        control_id: u8,
        page_id: u8,
        key: EditKey,
        /// Character code when `key` is [`EditKey::Char`]
        key_value: u8,
    },
    /// Reply to a page query (0x71).
    PageReported { page_id: u8 },
    /// Reply to a checkbox query (0x64).
    CheckboxReported {
        control_id: u8,
        page_id: u8,
        state: CheckboxState,
    },
    /// Reply to a slider query (0x68).
    SliderReported {
        control_id: u8,
        page_id: u8,
        value: u8,
    },
    /// Reply to an edit query, carrying the edit contents (0x75).
    EditReported {
        control_id: u8,
        page_id: u8,
        text: Vec<u8, MAX_TEXT_LEN>,
    },
    /// Reply to a touch-edit query, carrying the edit contents (0x7C).
    TouchEditReported {
        control_id: u8,
        page_id: u8,
        text: Vec<u8, MAX_TEXT_LEN>,
    },
}

impl PanelEvent {
    /// Decode a completed frame.
    pub fn from_frame(frame: &RawFrame) -> Result<Self, DecodeError> {
        Self::decode(frame.as_bytes())
    }

    /// Decode an event from raw frame bytes (header plus any parameters).
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < FRAME_HEADER_LEN {
            return Err(DecodeError::Truncated);
        }
        let control_id = bytes[1];
        let page_id = bytes[2];
        let status = bytes[3];
        let key_type = bytes[4];
        let key_value = bytes[5];

        match bytes[0] {
            NOTIFY_TOUCH_BUTTON => Ok(PanelEvent::ButtonTouched {
                control_id,
                page_id,
                action: TouchAction::from_byte(status).ok_or(DecodeError::InvalidField)?,
                key_type,
                key_value,
            }),
            NOTIFY_TOUCH_CHECKBOX => Ok(PanelEvent::CheckboxTouched {
                control_id,
                page_id,
                state: CheckboxState::from_byte(key_value).ok_or(DecodeError::InvalidField)?,
            }),
            NOTIFY_TOUCH_SLIDER => Ok(PanelEvent::SliderTouched {
                control_id,
                page_id,
                value: key_value,
            }),
            NOTIFY_TOUCH_EDIT => Ok(PanelEvent::EditTouched {
                control_id,
                page_id,
                key: EditKey::from_byte(key_type).ok_or(DecodeError::InvalidField)?,
                key_value,
            }),
            NOTIFY_GET_PAGE => Ok(PanelEvent::PageReported { page_id }),
            NOTIFY_GET_CHECKBOX => Ok(PanelEvent::CheckboxReported {
                control_id,
                page_id,
                state: CheckboxState::from_byte(key_value).ok_or(DecodeError::InvalidField)?,
            }),
            NOTIFY_GET_SLIDER => Ok(PanelEvent::SliderReported {
                control_id,
                page_id,
                value: key_value,
            }),
            NOTIFY_GET_EDIT => Ok(PanelEvent::EditReported {
                control_id,
                page_id,
                text: edit_text(bytes)?,
            }),
            NOTIFY_GET_TOUCH_EDIT => Ok(PanelEvent::TouchEditReported {
                control_id,
                page_id,
                text: edit_text(bytes)?,
            }),
            _ => Err(DecodeError::UnknownOpcode),
        }
    }

    /// The page the event originated from, where the frame carries one.
    pub fn page_id(&self) -> u8 {
        match *self {
            PanelEvent::ButtonTouched { page_id, .. }
            | PanelEvent::CheckboxTouched { page_id, .. }
            | PanelEvent::SliderTouched { page_id, .. }
            | PanelEvent::EditTouched { page_id, .. }
            | PanelEvent::PageReported { page_id }
            | PanelEvent::CheckboxReported { page_id, .. }
            | PanelEvent::SliderReported { page_id, .. }
            | PanelEvent::EditReported { page_id, .. }
            | PanelEvent::TouchEditReported { page_id, .. } => page_id,
        }
    }
}

fn edit_text(bytes: &[u8]) -> Result<Vec<u8, MAX_TEXT_LEN>, DecodeError> {
    let mut text = Vec::new();
    text.extend_from_slice(&bytes[FRAME_HEADER_LEN..])
        .map_err(|_| DecodeError::Truncated)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_button_touch() {
        let event = PanelEvent::decode(&[0x62, 0x07, 0x04, 0x44, 0x01, 0x09]).unwrap();
        assert_eq!(
            event,
            PanelEvent::ButtonTouched {
                control_id: 0x07,
                page_id: 0x04,
                action: TouchAction::Down,
                key_type: 0x01,
                key_value: 0x09,
            }
        );
    }

    #[test]
    fn test_decode_button_release() {
        let event = PanelEvent::decode(&[0x62, 0x07, 0x04, 0x55, 0x00, 0x00]).unwrap();
        match event {
            PanelEvent::ButtonTouched { action, .. } => {
                assert_eq!(action, TouchAction::Release)
            }
            other => panic!("wrong event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_checkbox_touch() {
        let event = PanelEvent::decode(&[0x60, 0x02, 0x05, 0x44, 0x00, 0x53]).unwrap();
        assert_eq!(
            event,
            PanelEvent::CheckboxTouched {
                control_id: 0x02,
                page_id: 0x05,
                state: CheckboxState::Selected,
            }
        );
    }

    #[test]
    fn test_decode_slider_touch() {
        let event = PanelEvent::decode(&[0x67, 0x01, 0x06, 0x44, 0x00, 0x63]).unwrap();
        assert_eq!(
            event,
            PanelEvent::SliderTouched {
                control_id: 0x01,
                page_id: 0x06,
                value: 0x63,
            }
        );
    }

    #[test]
    fn test_decode_edit_keyboard_key() {
        let event = PanelEvent::decode(&[0x7B, 0x03, 0x03, 0x44, 0x30, b'A']).unwrap();
        assert_eq!(
            event,
            PanelEvent::EditTouched {
                control_id: 0x03,
                page_id: 0x03,
                key: EditKey::Char,
                key_value: b'A',
            }
        );

        let enter = PanelEvent::decode(&[0x7B, 0x03, 0x03, 0x44, 0x34, 0x00]).unwrap();
        match enter {
            PanelEvent::EditTouched { key, .. } => assert_eq!(key, EditKey::Enter),
            other => panic!("wrong event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_page_report() {
        let event = PanelEvent::decode(&[0x71, 0x00, 0x08, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(event, PanelEvent::PageReported { page_id: 0x08 });
        assert_eq!(event.page_id(), 0x08);
    }

    #[test]
    fn test_decode_checkbox_report() {
        let event = PanelEvent::decode(&[0x64, 0x02, 0x05, 0x00, 0x00, 0x55]).unwrap();
        match event {
            PanelEvent::CheckboxReported { state, .. } => {
                assert!(!state.is_selected());
            }
            other => panic!("wrong event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_slider_report() {
        let event = PanelEvent::decode(&[0x68, 0x09, 0x06, 0x00, 0x00, 0x2A]).unwrap();
        assert_eq!(
            event,
            PanelEvent::SliderReported {
                control_id: 0x09,
                page_id: 0x06,
                value: 42,
            }
        );
    }

    #[test]
    fn test_decode_edit_report_with_text() {
        let event =
            PanelEvent::decode(&[0x75, 0x01, 0x08, 0x00, 0x00, 0x03, b'1', b'2', b'3']).unwrap();
        match event {
            PanelEvent::EditReported {
                control_id,
                page_id,
                text,
            } => {
                assert_eq!(control_id, 0x01);
                assert_eq!(page_id, 0x08);
                assert_eq!(&text, b"123");
            }
            other => panic!("wrong event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_touch_edit_report_empty_text() {
        let event = PanelEvent::decode(&[0x7C, 0x01, 0x03, 0x00, 0x00, 0x00]).unwrap();
        match event {
            PanelEvent::TouchEditReported { text, .. } => assert!(text.is_empty()),
            other => panic!("wrong event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_short_frame() {
        assert_eq!(
            PanelEvent::decode(&[0x62, 0x01, 0x02]),
            Err(DecodeError::Truncated)
        );
    }

    #[test]
    fn test_decode_rejects_unknown_opcode() {
        assert_eq!(
            PanelEvent::decode(&[0xAA, 0x01, 0x02, 0x03, 0x04, 0x05]),
            Err(DecodeError::UnknownOpcode)
        );
    }

    #[test]
    fn test_decode_rejects_bad_vocabulary() {
        // 0x99 is neither KEY_DOWN nor KEY_RELEASE
        assert_eq!(
            PanelEvent::decode(&[0x62, 0x01, 0x02, 0x99, 0x00, 0x00]),
            Err(DecodeError::InvalidField)
        );
    }

    #[test]
    fn test_vocabulary_roundtrips() {
        for action in [TouchAction::Down, TouchAction::Release] {
            assert_eq!(TouchAction::from_byte(action.to_byte()), Some(action));
        }
        for state in [CheckboxState::Selected, CheckboxState::Unselected] {
            assert_eq!(CheckboxState::from_byte(state.to_byte()), Some(state));
        }
        for key in [
            EditKey::Char,
            EditKey::Clear,
            EditKey::Backspace,
            EditKey::Space,
            EditKey::Enter,
            EditKey::ChangePage,
            EditKey::UploadControlId,
        ] {
            assert_eq!(EditKey::from_byte(key.to_byte()), Some(key));
        }
        assert_eq!(EditKey::from_byte(0xFF), None);
    }
}
