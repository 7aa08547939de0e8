//! RP2040-specific HAL for the door lock firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `latchkey-hal` traits:
//!
//! - Blocking UART link (implements `latchkey_hal::UartTx` / `UartRx`)
//! - Polled tick timer on the embassy time driver (implements `latchkey_hal::TickTimer`)

#![no_std]

pub mod timer;
pub mod uart;

pub use timer::InstantTicker;
pub use uart::{rp_config, LinkUart, UartBusError};
