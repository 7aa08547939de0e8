//! Control/panel link protocol
//!
//! This crate defines the serial handshake between the control controller
//! (bolt motor, buzzer, EEPROM) and the panel controller (keypad, LCD), and
//! the single definition of the application state codes both sides use.
//!
//! # Protocol Overview
//!
//! There is no framing: every transaction moves exactly one byte, guarded by
//! a request/ready exchange so each side knows whose turn it is to speak.
//!
//! ```text
//! Announce round (once per control loop iteration)
//!
//!   control                         panel
//!      │ ── ASK_FROM_CONTROL  0x01 ──▶ │
//!      │ ◀── READY_FROM_INTERFACE 0x02 │
//!      │ ── state code ───────────────▶ │
//!
//! Data-exchange round (menu key, one password digit)
//!
//!   control                         panel
//!      │ ◀── ASK_FROM_INTERFACE 0x03 ─ │
//!      │ ── READY_FROM_CONTROL 0x04 ──▶ │
//!      │ ◀── payload byte ──────────── │
//! ```
//!
//! Multi-byte payloads (a password) are independent rounds with no
//! atomicity across them.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod link;
pub mod state;
pub mod token;

pub use link::{ControlLink, InterfaceLink, LinkError, WaitPolicy, GARBLED_PAYLOAD};
pub use state::{AppState, MenuKey, ENTER_KEY};
pub use token::Token;

/// Revision of the wire schema defined by this crate
///
/// Both firmware images are built from the same revision; the value is not
/// exchanged on the wire.
pub const PROTOCOL_VERSION: u8 = 1;
