//! Incremental reassembly of notification frames.
//!
//! The panel reports touches and value reads as short binary frames. All
//! frames share a fixed six-byte header:
//!
//! ```text
//! ┌────────┬────────────┬─────────┬────────┬──────────┬───────────┐
//! │ OPCODE │ CONTROL_ID │ PAGE_ID │ STATUS │ KEY_TYPE │ KEY_VALUE │
//! └────────┴────────────┴─────────┴────────┴──────────┴───────────┘
//! ```
//!
//! For the two edit-read opcodes the KEY_VALUE slot carries a parameter
//! count `n` and the frame continues with `n` text bytes, so the total
//! length is `6 + n`. Every other frame is exactly six bytes.
//!
//! The byte stream may start mid-frame, lose bytes, or arrive one byte at
//! a time. The assembler self-resynchronizes: bytes that are not a
//! recognized opcode are discarded between frames, runaway frames are
//! dropped at the size cap, and partial state persists across calls so
//! reassembly resumes wherever the stream left off.

use heapless::Vec;

use crate::queue::ByteQueue;

/// Fixed header length shared by all notification frames.
pub const FRAME_HEADER_LEN: usize = 6;

/// Hard cap on a single frame, parameter bytes included.
pub const MAX_FRAME_SIZE: usize = 65;

// Notification opcodes the assembler accepts as a frame start.
pub const NOTIFY_TOUCH_BUTTON: u8 = 0x62;
pub const NOTIFY_TOUCH_CHECKBOX: u8 = 0x60;
pub const NOTIFY_TOUCH_SLIDER: u8 = 0x67;
pub const NOTIFY_TOUCH_EDIT: u8 = 0x7B;
pub const NOTIFY_GET_EDIT: u8 = 0x75;
pub const NOTIFY_GET_PAGE: u8 = 0x71;
pub const NOTIFY_GET_CHECKBOX: u8 = 0x64;
pub const NOTIFY_GET_SLIDER: u8 = 0x68;
pub const NOTIFY_GET_TOUCH_EDIT: u8 = 0x7C;

/// Returns true for opcodes that may begin a frame. Anything else seen
/// between frames is line noise.
pub fn is_frame_start(byte: u8) -> bool {
    matches!(
        byte,
        NOTIFY_TOUCH_BUTTON
            | NOTIFY_TOUCH_CHECKBOX
            | NOTIFY_TOUCH_SLIDER
            | NOTIFY_TOUCH_EDIT
            | NOTIFY_GET_EDIT
            | NOTIFY_GET_PAGE
            | NOTIFY_GET_CHECKBOX
            | NOTIFY_GET_SLIDER
            | NOTIFY_GET_TOUCH_EDIT
    )
}

/// A completed notification frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    bytes: Vec<u8, MAX_FRAME_SIZE>,
}

impl RawFrame {
    /// The frame's leading opcode byte.
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    /// The complete frame, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total frame length in bytes (at least [`FRAME_HEADER_LEN`]).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Never true; completed frames always carry a header.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// State machine that rebuilds frames from the raw byte stream.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    state: State,
    buffer: Vec<u8, MAX_FRAME_SIZE>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Discarding bytes until a recognized opcode arrives.
    Idle,
    /// Accumulating the fixed six-byte header.
    Header,
    /// Header complete; `remaining` parameter bytes still expected.
    Params { remaining: usize },
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Create an idle assembler.
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            buffer: Vec::new(),
        }
    }

    /// Abandon any partial frame and return to idle.
    ///
    /// Callers that want a frame timeout track elapsed time themselves and
    /// call this to drop a stalled partial frame.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.buffer.clear();
    }

    /// Feed a single byte.
    ///
    /// Returns a frame exactly when its final byte lands; `None` while a
    /// frame is still accumulating or the byte was discarded as noise.
    pub fn feed(&mut self, byte: u8) -> Option<RawFrame> {
        match self.state {
            State::Idle => {
                if !is_frame_start(byte) {
                    return None;
                }
                self.buffer.clear();
                let _ = self.buffer.push(byte);
                self.state = State::Header;
                None
            }
            State::Header => {
                let _ = self.buffer.push(byte);
                if self.buffer.len() < FRAME_HEADER_LEN {
                    return None;
                }
                // Header complete. The KEY_VALUE slot of the two edit-read
                // opcodes is a trailing parameter count; everything else
                // finishes at the header boundary.
                let opcode = self.buffer[0];
                let params = if opcode == NOTIFY_GET_EDIT || opcode == NOTIFY_GET_TOUCH_EDIT {
                    byte as usize
                } else {
                    0
                };
                if params == 0 {
                    return Some(self.take_frame());
                }
                self.state = State::Params { remaining: params };
                None
            }
            State::Params { remaining } => {
                if self.buffer.is_full() {
                    // Declared count ran past the frame cap; drop the
                    // frame, and this byte with it, and resynchronize.
                    self.reset();
                    return None;
                }
                let _ = self.buffer.push(byte);
                if remaining == 1 {
                    return Some(self.take_frame());
                }
                self.state = State::Params {
                    remaining: remaining - 1,
                };
                None
            }
        }
    }

    /// Drain `queue` until a frame completes or the queue runs dry.
    ///
    /// Returns as soon as one frame completes; bytes still queued stay
    /// queued for the next call. Partial frame state persists too, so
    /// reassembly resumes where the stream left off.
    pub fn poll(&mut self, queue: &mut ByteQueue) -> Option<RawFrame> {
        while let Some(byte) = queue.pop() {
            if let Some(frame) = self.feed(byte) {
                return Some(frame);
            }
        }
        None
    }

    fn take_frame(&mut self) -> RawFrame {
        self.state = State::Idle;
        RawFrame {
            bytes: core::mem::take(&mut self.buffer),
        }
    }
}
