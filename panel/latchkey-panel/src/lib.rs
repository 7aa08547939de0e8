//! Keypad/display panel logic for the door lock
//!
//! This crate provides:
//! - `DisplayBackend` trait for character displays, and an in-memory `Screen`
//! - `Keypad` trait and the `Key` values a 4x4 keypad produces
//! - The texts the panel shows
//! - `PanelMachine`, the panel side of the control/panel handshake
//!
//! # Architecture
//!
//! The panel holds no application state of its own. Each round it waits for
//! control to announce the canonical state, performs the keypad and display
//! work for that state, sends the user's input back one byte at a time, and
//! returns to waiting. Door and alarm notices are replayed locally on the
//! same tick schedule control uses for the actuators.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod error;
pub mod keypad;
pub mod machine;
pub mod messages;
pub mod screen;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use error::PanelError;
pub use keypad::{Key, Keypad, KeypadError};
pub use machine::{PanelMachine, PanelMode, ScreenSink};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
