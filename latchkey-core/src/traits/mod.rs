//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic and the
//! concrete bolt motor and buzzer drivers.

pub mod alarm;
pub mod motor;

pub use alarm::{AlarmError, AlarmOutput};
pub use motor::{Direction, MotorDriver, MotorError};
