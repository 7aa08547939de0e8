//! Latchkey - Control Controller Firmware
//!
//! Firmware for the control side of the two-controller door lock. It owns
//! the bolt motor, the alarm buzzer and the EEPROM holding the secret, and
//! drives the panel through the link protocol.
//!
//! Board wiring:
//!
//! | Function        | Pin                 |
//! |-----------------|---------------------|
//! | Link UART TX/RX | GPIO0 / GPIO1       |
//! | EEPROM SDA/SCL  | GPIO4 / GPIO5       |
//! | Bolt IN1/IN2/EN | GPIO10/GPIO11/GPIO12|
//! | Buzzer          | GPIO15              |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::uart::Uart;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use latchkey_core::sequencer::Profile;
use latchkey_core::{ControlMachine, LockConfig, SequenceTiming};
use latchkey_drivers::alarm::Buzzer;
use latchkey_drivers::eeprom::At24;
use latchkey_drivers::motor::{DcMotor, OnOffEnable};
use latchkey_hal::uart::UartConfig;
use latchkey_hal_rp2040::{rp_config, InstantTicker, LinkUart};
use latchkey_protocol::{ControlLink, PROTOCOL_VERSION};

mod controller;

#[allow(dead_code)]
mod lock_config {
    include!(concat!(env!("OUT_DIR"), "/lock_config.rs"));
}

/// Lock configuration from lock.toml
const LOCK_CONFIG: LockConfig = LockConfig {
    secret_base: lock_config::SECRET_ADDRESS,
    max_failed_attempts: lock_config::MAX_FAILED_ATTEMPTS,
    timing: SequenceTiming {
        kick_ms: lock_config::KICK_MS,
        door_tick_ms: lock_config::DOOR_TICK_MS,
        alarm_tick_ms: lock_config::ALARM_TICK_MS,
    },
};

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Latchkey control firmware starting (protocol v{})", PROTOCOL_VERSION);

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Link to the panel
    let link_config = UartConfig::with_baudrate(lock_config::LINK_BAUDRATE);
    let uart_config = unwrap!(rp_config(&link_config));
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let link = ControlLink::new(LinkUart::new(uart));
    info!("Link UART at {} baud", link_config.baudrate);

    // Secret storage
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let eeprom = At24::new(i2c, Delay)
        .with_capacity(lock_config::EEPROM_CAPACITY)
        .with_settle_ms(lock_config::EEPROM_SETTLE_MS);
    info!(
        "EEPROM ready, secret at {=u16:#x}",
        LOCK_CONFIG.secret_base
    );

    // Bolt motor on the H-bridge, enable line driven fully on or off
    let in1 = Output::new(p.PIN_10, Level::Low);
    let in2 = Output::new(p.PIN_11, Level::Low);
    let enable = OnOffEnable::new(Output::new(p.PIN_12, Level::Low));
    let motor = unwrap!(DcMotor::new(in1, in2, enable));

    // Alarm
    let buzzer = unwrap!(Buzzer::new_active_high(Output::new(p.PIN_15, Level::Low)));
    info!("Actuators initialized");

    let machine = ControlMachine::new(
        &LOCK_CONFIG,
        link,
        eeprom,
        motor,
        buzzer,
        InstantTicker::new(),
    );

    info!(
        "Lockout after {} attempts, door open for {} ms, alarm sounds for {} ms",
        LOCK_CONFIG.max_failed_attempts,
        Profile::control_door(&LOCK_CONFIG.timing).duration_ms(),
        Profile::control_alarm(&LOCK_CONFIG.timing).duration_ms()
    );

    controller::run(machine)
}
