//! Host-side test doubles
//!
//! Deterministic stand-ins for the serial link, the EEPROM and the tick
//! timer. Nothing here sleeps or blocks: a read from an empty UART script
//! fails instead of hanging, and the ticker delivers ticks instantly.

use heapless::{Deque, Vec};

use crate::eeprom::{ByteStorage, StorageError};
use crate::timer::TickTimer;
use crate::uart::{UartRx, UartTx};

/// Capacity of the scripted UART buffers
pub const SCRIPT_CAPACITY: usize = 256;

/// Capacity of the ticker's period log
pub const PERIOD_LOG_CAPACITY: usize = 32;

/// Errors from [`ScriptedUart`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockUartError {
    /// The receive script ran out of bytes
    Exhausted,
    /// A scripted framing error on the line
    Line,
    /// The transmit log is full
    Overflow,
}

/// UART fed from a pre-recorded receive script
///
/// Everything written is appended to a transmit log for inspection. Running
/// off the end of the script is fatal; a scripted line error is noise.
#[derive(Debug, Default)]
pub struct ScriptedUart {
    rx: Deque<Option<u8>, SCRIPT_CAPACITY>,
    tx: Vec<u8, SCRIPT_CAPACITY>,
}

impl ScriptedUart {
    /// Create a UART with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a UART that will receive `bytes` in order
    pub fn with_script(bytes: &[u8]) -> Self {
        let mut uart = Self::new();
        uart.push_script(bytes);
        uart
    }

    /// Append bytes to the receive script
    ///
    /// Bytes beyond [`SCRIPT_CAPACITY`] are dropped.
    pub fn push_script(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.rx.push_back(Some(byte)).is_err() {
                break;
            }
        }
    }

    /// Append a read that fails with [`MockUartError::Line`]
    pub fn push_line_error(&mut self) {
        let _ = self.rx.push_back(None);
    }

    /// Script entries not yet consumed, line errors included
    pub fn remaining(&self) -> usize {
        self.rx.len()
    }

    /// Everything written so far
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    /// Forget the transmit log
    pub fn clear_sent(&mut self) {
        self.tx.clear();
    }
}

impl UartTx for ScriptedUart {
    type Error = MockUartError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx
            .extend_from_slice(data)
            .map_err(|_| MockUartError::Overflow)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl UartRx for ScriptedUart {
    type Error = MockUartError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        for slot in buf.iter_mut() {
            *slot = self
                .rx
                .pop_front()
                .ok_or(MockUartError::Exhausted)?
                .ok_or(MockUartError::Line)?;
        }
        Ok(buf.len())
    }

    fn is_line_noise(&self, error: &Self::Error) -> bool {
        matches!(error, MockUartError::Line)
    }
}

/// In-memory EEPROM
///
/// Starts erased (all `0xFF`) and counts every access so tests can check how
/// many reads and writes an operation performed.
#[derive(Debug, Clone)]
pub struct MemoryStorage<const N: usize> {
    bytes: [u8; N],
    reads: usize,
    writes: usize,
    faulty: bool,
}

impl<const N: usize> Default for MemoryStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MemoryStorage<N> {
    /// Create an erased storage device
    pub fn new() -> Self {
        Self {
            bytes: [0xFF; N],
            reads: 0,
            writes: 0,
            faulty: false,
        }
    }

    /// Raw contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Contents of `len` bytes starting at `address`
    pub fn slice(&self, address: u16, len: usize) -> &[u8] {
        let start = address as usize;
        &self.bytes[start..start + len]
    }

    /// Number of successful reads
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Make every subsequent access fail with [`StorageError::Bus`]
    pub fn set_faulty(&mut self, faulty: bool) {
        self.faulty = faulty;
    }

    fn check(&self, address: u16) -> Result<usize, StorageError> {
        if self.faulty {
            return Err(StorageError::Bus);
        }
        let index = address as usize;
        if index >= N {
            return Err(StorageError::OutOfRange);
        }
        Ok(index)
    }
}

impl<const N: usize> ByteStorage for MemoryStorage<N> {
    fn capacity(&self) -> u16 {
        N.min(u16::MAX as usize) as u16
    }

    fn read_byte(&mut self, address: u16) -> Result<u8, StorageError> {
        let index = self.check(address)?;
        self.reads += 1;
        Ok(self.bytes[index])
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), StorageError> {
        let index = self.check(address)?;
        self.writes += 1;
        self.bytes[index] = value;
        Ok(())
    }
}

/// Tick timer that delivers every tick immediately
///
/// Records each programmed period so tests can assert on reprogramming.
#[derive(Debug, Default)]
pub struct ManualTicker {
    period_ms: Option<u32>,
    periods: Vec<u32, PERIOD_LOG_CAPACITY>,
    ticks: u32,
    stops: u32,
}

impl ManualTicker {
    /// Create a stopped ticker
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently programmed period
    pub fn period_ms(&self) -> Option<u32> {
        self.period_ms
    }

    /// Every period programmed through [`TickTimer::start`], in order
    pub fn periods(&self) -> &[u32] {
        &self.periods
    }

    /// Ticks delivered so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Number of times the timer was deactivated
    pub fn stops(&self) -> u32 {
        self.stops
    }
}

impl TickTimer for ManualTicker {
    fn start(&mut self, period_ms: u32) {
        self.period_ms = Some(period_ms);
        let _ = self.periods.push(period_ms);
    }

    fn stop(&mut self) {
        self.period_ms = None;
        self.stops += 1;
    }

    fn is_running(&self) -> bool {
        self.period_ms.is_some()
    }

    fn wait_tick(&mut self) {
        if self.period_ms.is_some() {
            self.ticks += 1;
        }
    }
}
