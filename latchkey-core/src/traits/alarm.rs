//! Audible alarm trait

/// Errors from the alarm output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// The output pin could not be driven
    Pin,
}

/// On/off alarm output such as a buzzer
pub trait AlarmOutput {
    /// Switch the alarm on or off
    fn set_active(&mut self, active: bool) -> Result<(), AlarmError>;

    /// Check if the alarm is sounding
    fn is_active(&self) -> bool;
}

impl<T: AlarmOutput + ?Sized> AlarmOutput for &mut T {
    fn set_active(&mut self, active: bool) -> Result<(), AlarmError> {
        (**self).set_active(active)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
