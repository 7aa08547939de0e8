//! Blocking UART link for RP2040
//!
//! Wraps an embassy-rp UART in blocking mode. The handshake protocol
//! exchanges one byte at a time and waits for each reply, so there is
//! nothing to gain from DMA or interrupt-driven buffering here.

use embassy_rp::uart::{self as rp_uart, Blocking, Error as RpUartError, Uart};
use latchkey_hal::uart::{DataBits, Parity, StopBits, UartConfig, UartRx, UartTx};

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Break condition on the line
    Break,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Other error
    Other,
}

impl From<RpUartError> for UartBusError {
    fn from(e: RpUartError) -> Self {
        match e {
            RpUartError::Framing => UartBusError::Framing,
            RpUartError::Break => UartBusError::Break,
            RpUartError::Overrun => UartBusError::Overrun,
            RpUartError::Parity => UartBusError::Parity,
            _ => UartBusError::Other,
        }
    }
}

/// Translate link settings into an embassy-rp UART configuration
///
/// Returns `None` for 9-bit frames, which the RP2040 UART cannot produce.
pub fn rp_config(config: &UartConfig) -> Option<rp_uart::Config> {
    let mut rp = rp_uart::Config::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        DataBits::Seven => rp_uart::DataBits::DataBits7,
        DataBits::Eight => rp_uart::DataBits::DataBits8,
        DataBits::Nine => return None,
    };
    rp.parity = match config.parity {
        Parity::None => rp_uart::Parity::ParityNone,
        Parity::Even => rp_uart::Parity::ParityEven,
        Parity::Odd => rp_uart::Parity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        StopBits::One => rp_uart::StopBits::STOP1,
        StopBits::Two => rp_uart::StopBits::STOP2,
    };
    Some(rp)
}

/// Inter-controller link on an RP2040 UART
pub struct LinkUart<'d> {
    uart: Uart<'d, Blocking>,
}

impl<'d> LinkUart<'d> {
    /// Wrap a UART configured in blocking mode
    pub fn new(uart: Uart<'d, Blocking>) -> Self {
        Self { uart }
    }
}

impl UartTx for LinkUart<'_> {
    type Error = UartBusError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.uart.blocking_write(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.uart.blocking_flush()?;
        Ok(())
    }
}

// Every receive error the peripheral reports spoils a single byte, so the
// default line-noise classification holds.
impl UartRx for LinkUart<'_> {
    type Error = UartBusError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.uart.blocking_read(buf)?;
        Ok(buf.len())
    }
}
