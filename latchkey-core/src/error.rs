//! Control-side error types

use latchkey_hal::StorageError;
use latchkey_protocol::LinkError;

use crate::traits::{AlarmError, MotorError};

/// Errors from the bolt motor or the buzzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Bolt motor failed
    Motor(MotorError),
    /// Buzzer failed
    Alarm(AlarmError),
}

impl From<MotorError> for ActuatorError {
    fn from(err: MotorError) -> Self {
        ActuatorError::Motor(err)
    }
}

impl From<AlarmError> for ActuatorError {
    fn from(err: AlarmError) -> Self {
        ActuatorError::Alarm(err)
    }
}

/// Errors that abort one control loop iteration
///
/// A failed iteration leaves the application state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError {
    /// Serial link failed
    Link(LinkError),
    /// Secret storage failed
    Storage(StorageError),
    /// Actuator failed outside a sequence
    Actuator(ActuatorError),
}

impl From<LinkError> for ControlError {
    fn from(err: LinkError) -> Self {
        ControlError::Link(err)
    }
}

impl From<StorageError> for ControlError {
    fn from(err: StorageError) -> Self {
        ControlError::Storage(err)
    }
}

impl From<ActuatorError> for ControlError {
    fn from(err: ActuatorError) -> Self {
        ControlError::Actuator(err)
    }
}

impl From<MotorError> for ControlError {
    fn from(err: MotorError) -> Self {
        ControlError::Actuator(err.into())
    }
}

impl From<AlarmError> for ControlError {
    fn from(err: AlarmError) -> Self {
        ControlError::Actuator(err.into())
    }
}
