//! GPIO buzzer
//!
//! An active buzzer driven directly from a GPIO pin (or through a
//! transistor). The pin can be configured as active-high (default) or
//! active-low.

use embedded_hal::digital::{OutputPin, PinState};
use latchkey_core::traits::{AlarmError, AlarmOutput};

/// GPIO buzzer
pub struct Buzzer<P> {
    pin: P,
    /// If true, buzzer ON = pin LOW
    inverted: bool,
    /// Current logical state (true = sounding)
    active: bool,
}

impl<P: OutputPin> Buzzer<P> {
    /// Create a new buzzer, silenced
    pub fn new(pin: P, inverted: bool) -> Result<Self, AlarmError> {
        let mut buzzer = Self {
            pin,
            inverted,
            active: false,
        };
        // Ensure buzzer starts off
        buzzer.set_active(false)?;
        Ok(buzzer)
    }

    /// Create a buzzer with active-high output
    pub fn new_active_high(pin: P) -> Result<Self, AlarmError> {
        Self::new(pin, false)
    }

    /// Create a buzzer with active-low output
    pub fn new_active_low(pin: P) -> Result<Self, AlarmError> {
        Self::new(pin, true)
    }
}

impl<P: OutputPin> AlarmOutput for Buzzer<P> {
    fn set_active(&mut self, active: bool) -> Result<(), AlarmError> {
        self.pin
            .set_state(PinState::from(active != self.inverted))
            .map_err(|_| AlarmError::Pin)?;
        self.active = active;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn test_active_high_buzzer() {
        let mut buzzer = Buzzer::new_active_high(MockPin { high: true }).unwrap();

        // Initially off
        assert!(!buzzer.is_active());
        assert!(!buzzer.pin.high);

        buzzer.set_active(true).unwrap();
        assert!(buzzer.is_active());
        assert!(buzzer.pin.high);
    }

    #[test]
    fn test_active_low_buzzer() {
        let mut buzzer = Buzzer::new_active_low(MockPin { high: false }).unwrap();
        assert!(buzzer.pin.high);

        buzzer.set_active(true).unwrap();
        assert!(!buzzer.pin.high);
    }
}
