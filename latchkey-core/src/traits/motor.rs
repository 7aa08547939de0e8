//! Bolt motor trait
//!
//! The bolt is moved by a DC motor behind an H-bridge. Opening turns the
//! motor clockwise, locking turns it counter-clockwise.

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise rotation (bolt retracts)
    Clockwise,
    /// Counter-clockwise rotation (bolt extends)
    CounterClockwise,
}

/// Errors that can occur with motor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// A direction pin could not be driven
    Pin,
    /// The enable channel rejected the duty cycle
    Pwm,
    /// Speed outside 0-100 %
    InvalidSpeed,
}

/// DC motor driver
pub trait MotorDriver {
    /// Turn in `direction` at `speed_percent` (0-100) of full power
    fn rotate(&mut self, direction: Direction, speed_percent: u8) -> Result<(), MotorError>;

    /// Remove power and let the motor stop
    fn stop(&mut self) -> Result<(), MotorError>;

    /// Current direction, or `None` while stopped
    fn direction(&self) -> Option<Direction>;

    /// Check if the motor is currently powered
    fn is_running(&self) -> bool {
        self.direction().is_some()
    }
}

impl<T: MotorDriver + ?Sized> MotorDriver for &mut T {
    fn rotate(&mut self, direction: Direction, speed_percent: u8) -> Result<(), MotorError> {
        (**self).rotate(direction, speed_percent)
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        (**self).stop()
    }

    fn direction(&self) -> Option<Direction> {
        (**self).direction()
    }
}
