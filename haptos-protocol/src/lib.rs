//! Haptos touch-panel wire protocol
//!
//! This crate defines the I2C protocol spoken by Haptos smart display
//! modules. The panel renders widgets (buttons, sliders, gauges, edits)
//! on board; the host sends short binary commands and receives
//! asynchronous touch/value notifications on the same bus.
//!
//! # Protocol Overview
//!
//! Outbound commands are `[opcode][fields...]`, one bus write each (see
//! [`commands`]). Inbound notifications share a six-byte header:
//!
//! ```text
//! ┌────────┬────────────┬─────────┬────────┬──────────┬───────────┐
//! │ OPCODE │ CONTROL_ID │ PAGE_ID │ STATUS │ KEY_TYPE │ KEY_VALUE │
//! │ 1B     │ 1B         │ 1B      │ 1B     │ 1B       │ 1B        │
//! └────────┴────────────┴─────────┴────────┴──────────┴───────────┘
//! ```
//!
//! and the two edit-read opcodes append a variable text tail counted by
//! the KEY_VALUE slot. Inbound bytes flow through a lossy SPSC
//! [`ByteQueue`] into the [`FrameAssembler`], which recovers frame
//! boundaries from a stream that may start mid-frame, lose bytes, or
//! arrive one byte at a time.

#![no_std]
#![deny(unsafe_code)]

pub mod assembler;
pub mod commands;
pub mod events;
pub mod queue;

pub use assembler::{FrameAssembler, RawFrame, FRAME_HEADER_LEN, MAX_FRAME_SIZE};
pub use commands::{Command, CommandError, FontBank, MAX_COMMAND_SIZE};
pub use events::{CheckboxState, DecodeError, EditKey, PanelEvent, TouchAction, MAX_TEXT_LEN};
pub use queue::{ByteQueue, QUEUE_SIZE};
