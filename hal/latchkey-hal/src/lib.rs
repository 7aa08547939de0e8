//! Latchkey Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware interfaces the lock logic is
//! written against. Chip-specific crates (RP2040, ...) implement them so the
//! same control and panel state machines run on either controller, or on the
//! host under test.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  latchkey-core / latchkey-panel (machines)   │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  latchkey-hal (this crate - traits)          │
//! └──────────────────────────────────────────────┘
//!                       │
//!           ┌───────────┴───────────┐
//!           ▼                       ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ latchkey-hal-    │     │ latchkey-drivers │
//! │    rp2040        │     │  (24Cxx EEPROM)  │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Blocking serial link between the controllers
//! - [`eeprom::ByteStorage`] - Byte-addressed persistent storage
//! - [`timer::TickTimer`] - Periodic tick source for actuation sequences

#![no_std]
#![deny(unsafe_code)]

pub mod eeprom;
pub mod timer;
pub mod uart;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use eeprom::{ByteStorage, StorageError};
pub use timer::TickTimer;
pub use uart::{Uart, UartRx, UartTx};
