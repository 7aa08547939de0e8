//! Control state machine
//!
//! Control owns the canonical application state. The transition rules are a
//! pure table; [`ControlMachine`] performs the I/O that produces each event.

pub mod control;
pub mod events;
pub mod machine;

pub use control::{Actuators, ControlMachine, Transition};
pub use events::Event;
pub use machine::transition;
