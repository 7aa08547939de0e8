//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined in
//! latchkey-core, latchkey-hal and latchkey-panel, written against
//! `embedded-hal` 1.0:
//!
//! - Bolt motor (H-bridge DC motor)
//! - Alarm (GPIO buzzer)
//! - Secret storage (24Cxx I2C EEPROM)
//! - Keypad (4x4 matrix)
//! - Display (HD44780 character LCD, 4-bit bus)

#![no_std]
#![deny(unsafe_code)]

pub mod alarm;
pub mod eeprom;
pub mod keypad;
pub mod lcd;
pub mod motor;
