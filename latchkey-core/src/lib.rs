//! Board-agnostic control logic for the door lock firmware
//!
//! This crate contains everything the control controller does that does not
//! depend on specific hardware:
//!
//! - Build-time configuration defaults
//! - Password lifecycle (create, verify, lockout)
//! - Tick-driven actuation sequencer
//! - Transition table and the control state machine
//! - Motor and alarm traits

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod password;
pub mod sequencer;
pub mod state;
pub mod traits;

pub use config::{LockConfig, SequenceTiming};
pub use error::{ActuatorError, ControlError};
pub use state::{ControlMachine, Event, Transition};
