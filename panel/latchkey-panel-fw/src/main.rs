//! Latchkey Panel Firmware
//!
//! Firmware for the human-interface side of the door lock: a 4x4 keypad
//! and a 16x2 character LCD. The panel keeps no lock state of its own; it
//! answers every announcement from the control controller over UART.
//!
//! Board wiring:
//!
//! | Function        | Pin            |
//! |-----------------|----------------|
//! | Link UART TX/RX | GPIO0 / GPIO1  |
//! | Keypad rows     | GPIO2 - GPIO5  |
//! | Keypad columns  | GPIO6 - GPIO9  |
//! | LCD RS / E      | GPIO10 / GPIO11|
//! | LCD D4 - D7     | GPIO12 - GPIO15|

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::uart::Uart;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use latchkey_core::SequenceTiming;
use latchkey_drivers::keypad::MatrixKeypad;
use latchkey_drivers::lcd::Hd44780;
use latchkey_hal::uart::UartConfig;
use latchkey_hal_rp2040::{rp_config, InstantTicker, LinkUart};
use latchkey_panel::PanelMachine;
use latchkey_protocol::{InterfaceLink, PROTOCOL_VERSION};

mod lock_config {
    include!(concat!(env!("OUT_DIR"), "/lock_config.rs"));
}

/// Sequence timing from lock.toml, shared with the control side
const TIMING: SequenceTiming = SequenceTiming {
    kick_ms: lock_config::KICK_MS,
    door_tick_ms: lock_config::DOOR_TICK_MS,
    alarm_tick_ms: lock_config::ALARM_TICK_MS,
};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Latchkey panel firmware starting (protocol v{})", PROTOCOL_VERSION);

    let p = embassy_rp::init(Default::default());

    // Link to the control controller
    let link_config = UartConfig::with_baudrate(lock_config::LINK_BAUDRATE);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, unwrap!(rp_config(&link_config)));
    let link = InterfaceLink::new(LinkUart::new(uart));
    info!("Link UART at {} baud", link_config.baudrate);

    // Keypad: rows driven, columns pulled up
    let rows = [
        Output::new(p.PIN_2, Level::High),
        Output::new(p.PIN_3, Level::High),
        Output::new(p.PIN_4, Level::High),
        Output::new(p.PIN_5, Level::High),
    ];
    let cols = [
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
        Input::new(p.PIN_8, Pull::Up),
        Input::new(p.PIN_9, Pull::Up),
    ];
    let keypad = unwrap!(MatrixKeypad::new(rows, cols, Delay))
        .with_hold_off_ms(lock_config::KEYPAD_HOLD_OFF_MS);

    // LCD on a 4-bit bus
    let rs = Output::new(p.PIN_10, Level::Low);
    let en = Output::new(p.PIN_11, Level::Low);
    let data = [
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
    ];
    let lcd = unwrap!(Hd44780::new(rs, en, data, Delay));
    info!("Keypad and LCD initialized");

    let mut panel = PanelMachine::new(TIMING, link, keypad, lcd, InstantTicker::new());

    info!("Waiting for control");
    loop {
        match panel.step() {
            Ok(state) => info!("Answered {:?}", state),
            Err(e) => warn!("Panel round failed: {:?}", e),
        }
    }
}
