//! Control loop driver
//!
//! Runs the control state machine forever and reports what happened on
//! each iteration. A failed iteration leaves the machine in the same state,
//! so the loop simply carries on and the next announce retries it.

use defmt::*;

use latchkey_core::traits::{AlarmOutput, MotorDriver};
use latchkey_core::{ControlMachine, Transition};
use latchkey_hal::{ByteStorage, TickTimer, Uart};

/// Run the control loop
pub fn run<U, S, M, B, T>(mut machine: ControlMachine<U, S, M, B, T>) -> !
where
    U: Uart,
    S: ByteStorage,
    M: MotorDriver,
    B: AlarmOutput,
    T: TickTimer,
{
    if let Err(e) = machine.park() {
        warn!("Failed to park actuators: {:?}", e);
    }

    info!("Control loop running in {:?}", machine.state());

    loop {
        match machine.step() {
            Ok(transition) => {
                report(&transition, machine.failures());

                if transition.fault.is_some() {
                    // Leave nothing energised after a partial sequence
                    if let Err(e) = machine.park() {
                        warn!("Failed to park actuators: {:?}", e);
                    }
                }
            }
            Err(e) => {
                warn!("Step in {:?} failed: {:?}", machine.state(), e);
            }
        }
    }
}

fn report(transition: &Transition, failures: u8) {
    if let Some(fault) = transition.fault {
        warn!("Actuator fault during {:?}: {:?}", transition.from, fault);
    }

    if transition.event.is_failure() {
        warn!(
            "{:?} in {:?}, {} consecutive wrong passwords",
            transition.event, transition.from, failures
        );
    }

    if transition.changed() {
        info!(
            "{:?} -> {:?} ({:?})",
            transition.from, transition.to, transition.event
        );
    } else {
        debug!("Staying in {:?} ({:?})", transition.from, transition.event);
    }
}
