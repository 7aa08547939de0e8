//! Link endpoints for both controllers
//!
//! Each round has a requesting side and an answering side. The requester
//! sends its ask token, waits for the answerer's ready token and then sends
//! one byte. The answerer waits for the ask token, replies ready and then
//! reads that byte. Anything else seen while waiting for a token is a stray
//! byte and is discarded.
//!
//! A read that fails with line noise (framing, parity, overrun) counts as a
//! garbled byte rather than ending the round. While waiting for a token it
//! is a stray; in place of a payload it becomes [`GARBLED_PAYLOAD`], so
//! both sides still finish the round and stay in step.

use latchkey_hal::Uart;

use crate::state::AppState;
use crate::token::Token;

/// Payload reported when the payload byte itself was lost to line noise
///
/// Not a digit, a menu key or a state code.
pub const GARBLED_PAYLOAD: u8 = 0xFF;

/// How long a side keeps waiting for an expected token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitPolicy {
    /// Discard stray bytes forever; a silent peer stalls this side
    #[default]
    Forever,
    /// Fail with [`LinkError::Desync`] after more than `max_stray` stray bytes
    Bounded { max_stray: u16 },
}

/// Errors that can occur on the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The UART failed, or line noise exceeded a bounded wait
    Serial,
    /// Too many unexpected bytes while waiting for a token
    Desync { expected: Token, received: u8 },
    /// The announced state code is not a known state
    UnknownState(u8),
}

/// Byte-level half of an endpoint shared by both sides
#[derive(Debug)]
struct Wire<U> {
    uart: U,
    policy: WaitPolicy,
}

impl<U: Uart> Wire<U> {
    fn send(&mut self, byte: u8) -> Result<(), LinkError> {
        self.uart.write_byte(byte).map_err(|_| LinkError::Serial)
    }

    /// Read one byte; `None` when line noise spoiled it
    fn receive(&mut self) -> Result<Option<u8>, LinkError> {
        match self.uart.read_byte() {
            Ok(byte) => Ok(Some(byte)),
            Err(e) if self.uart.is_line_noise(&e) => Ok(None),
            Err(_) => Err(LinkError::Serial),
        }
    }

    fn await_token(&mut self, token: Token) -> Result<(), LinkError> {
        let mut stray: u16 = 0;
        loop {
            let received = self.receive()?;
            if received == Some(token.as_u8()) {
                return Ok(());
            }

            if let WaitPolicy::Bounded { max_stray } = self.policy {
                stray = stray.saturating_add(1);
                if stray > max_stray {
                    return Err(match received {
                        Some(byte) => LinkError::Desync {
                            expected: token,
                            received: byte,
                        },
                        None => LinkError::Serial,
                    });
                }
            }
        }
    }

    /// Requesting side of a round
    fn offer(&mut self, ask: Token, ready: Token, payload: u8) -> Result<(), LinkError> {
        self.send(ask.as_u8())?;
        self.await_token(ready)?;
        self.send(payload)
    }

    /// Answering side of a round
    fn accept(&mut self, ask: Token, ready: Token) -> Result<u8, LinkError> {
        self.await_token(ask)?;
        self.send(ready.as_u8())?;
        Ok(self.receive()?.unwrap_or(GARBLED_PAYLOAD))
    }
}

/// Control-side endpoint
///
/// Announces the canonical state and receives payload bytes from the panel.
#[derive(Debug)]
pub struct ControlLink<U> {
    wire: Wire<U>,
}

impl<U: Uart> ControlLink<U> {
    /// Create an endpoint that waits forever for each token
    pub fn new(uart: U) -> Self {
        Self::with_policy(uart, WaitPolicy::Forever)
    }

    /// Create an endpoint with an explicit wait policy
    pub fn with_policy(uart: U, policy: WaitPolicy) -> Self {
        Self {
            wire: Wire { uart, policy },
        }
    }

    /// Announce round: tell the panel which state control is in
    pub fn announce(&mut self, state: AppState) -> Result<(), LinkError> {
        self.wire.offer(
            Token::AskFromControl,
            Token::ReadyFromInterface,
            state.as_u8(),
        )
    }

    /// Data-exchange round: receive one byte sent by the panel
    pub fn receive_payload(&mut self) -> Result<u8, LinkError> {
        self.wire
            .accept(Token::AskFromInterface, Token::ReadyFromControl)
    }

    /// Access the underlying UART
    pub fn uart(&self) -> &U {
        &self.wire.uart
    }

    /// Release the underlying UART
    pub fn into_inner(self) -> U {
        self.wire.uart
    }
}

/// Panel-side endpoint
///
/// Learns the canonical state from announcements and sends payload bytes.
#[derive(Debug)]
pub struct InterfaceLink<U> {
    wire: Wire<U>,
}

impl<U: Uart> InterfaceLink<U> {
    /// Create an endpoint that waits forever for each token
    pub fn new(uart: U) -> Self {
        Self::with_policy(uart, WaitPolicy::Forever)
    }

    /// Create an endpoint with an explicit wait policy
    pub fn with_policy(uart: U, policy: WaitPolicy) -> Self {
        Self {
            wire: Wire { uart, policy },
        }
    }

    /// Answer an announce round and decode the announced state
    pub fn await_announcement(&mut self) -> Result<AppState, LinkError> {
        let code = self
            .wire
            .accept(Token::AskFromControl, Token::ReadyFromInterface)?;
        AppState::from_u8(code).ok_or(LinkError::UnknownState(code))
    }

    /// Data-exchange round: send one byte to control
    pub fn send_payload(&mut self, byte: u8) -> Result<(), LinkError> {
        self.wire
            .offer(Token::AskFromInterface, Token::ReadyFromControl, byte)
    }

    /// Access the underlying UART
    pub fn uart(&self) -> &U {
        &self.wire.uart
    }

    /// Release the underlying UART
    pub fn into_inner(self) -> U {
        self.wire.uart
    }
}
