//! H-bridge DC motor driver
//!
//! Two direction inputs select the rotation, the enable input carries the
//! power level. An enable line wired to a plain GPIO can be wrapped in
//! [`OnOffEnable`], which treats any non-zero duty cycle as fully on.
//!
//! | Direction        | IN1  | IN2  |
//! |------------------|------|------|
//! | Clockwise        | high | low  |
//! | CounterClockwise | low  | high |
//! | Stopped          | low  | low  |

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::{self, SetDutyCycle};
use latchkey_core::traits::{Direction, MotorDriver, MotorError};

/// DC motor on an H-bridge
pub struct DcMotor<A, B, EN> {
    in1: A,
    in2: B,
    enable: EN,
    direction: Option<Direction>,
    speed: u8,
}

impl<A, B, EN> DcMotor<A, B, EN>
where
    A: OutputPin,
    B: OutputPin,
    EN: SetDutyCycle,
{
    /// Create a new motor driver
    ///
    /// The bridge is driven to the stopped state before returning.
    pub fn new(in1: A, in2: B, enable: EN) -> Result<Self, MotorError> {
        let mut motor = Self {
            in1,
            in2,
            enable,
            direction: None,
            speed: 0,
        };
        // Ensure motor starts stopped
        motor.stop()?;
        Ok(motor)
    }

    /// Current power level (0-100 %)
    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Release the pins
    pub fn release(self) -> (A, B, EN) {
        (self.in1, self.in2, self.enable)
    }

    fn set_bridge(&mut self, in1: bool, in2: bool) -> Result<(), MotorError> {
        self.in1
            .set_state(PinState::from(in1))
            .map_err(|_| MotorError::Pin)?;
        self.in2
            .set_state(PinState::from(in2))
            .map_err(|_| MotorError::Pin)
    }
}

impl<A, B, EN> MotorDriver for DcMotor<A, B, EN>
where
    A: OutputPin,
    B: OutputPin,
    EN: SetDutyCycle,
{
    fn rotate(&mut self, direction: Direction, speed_percent: u8) -> Result<(), MotorError> {
        if speed_percent > 100 {
            return Err(MotorError::InvalidSpeed);
        }

        match direction {
            Direction::Clockwise => self.set_bridge(true, false)?,
            Direction::CounterClockwise => self.set_bridge(false, true)?,
        }
        self.enable
            .set_duty_cycle_percent(speed_percent)
            .map_err(|_| MotorError::Pwm)?;

        self.direction = Some(direction);
        self.speed = speed_percent;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.set_bridge(false, false)?;
        self.enable
            .set_duty_cycle_fully_off()
            .map_err(|_| MotorError::Pwm)?;

        self.direction = None;
        self.speed = 0;
        Ok(())
    }

    fn direction(&self) -> Option<Direction> {
        self.direction
    }
}

/// Error from an [`OnOffEnable`] pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnablePinError;

impl pwm::Error for EnablePinError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

/// GPIO enable line presented as a duty cycle output
///
/// Full scale is 100; any non-zero duty drives the pin high.
pub struct OnOffEnable<P> {
    pin: P,
}

impl<P: OutputPin> OnOffEnable<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> pwm::ErrorType for OnOffEnable<P> {
    type Error = EnablePinError;
}

impl<P: OutputPin> SetDutyCycle for OnOffEnable<P> {
    fn max_duty_cycle(&self) -> u16 {
        100
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.pin
            .set_state(PinState::from(duty > 0))
            .map_err(|_| EnablePinError)
    }
}
