//! Type-safe command builders and response parsers
//!
//! Backends describe each wire command as a type implementing [`HidCommand`]
//! and each reply as a type implementing [`HidResponse`]. [`TransportExt`]
//! then drives one request/response exchange over any [`Transport`].

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;
use crate::protocol;
use crate::Transport;

// =============================================================================
// Core Traits
// =============================================================================

/// A command that can be serialized to a feature report
pub trait HidCommand {
    /// Command byte
    const CMD: u8;

    /// Serialize to bytes (excluding report ID, command byte and length)
    fn to_data(&self) -> Vec<u8>;
}

/// A response that can be parsed from a validated payload
pub trait HidResponse: Sized {
    /// Minimum payload length required
    const MIN_LEN: usize;

    /// Parse from payload bytes (framing already stripped)
    fn from_data(data: &[u8]) -> Result<Self, ParseError>;

    /// Parse with length validation
    fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < Self::MIN_LEN {
            return Err(ParseError::TooShort {
                expected: Self::MIN_LEN,
                got: data.len(),
            });
        }
        Self::from_data(data)
    }
}

/// Parse error for responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    TooShort { expected: usize, got: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { expected, got } => {
                write!(
                    f,
                    "Response too short: expected {} bytes, got {}",
                    expected, got
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for TransportError {
    fn from(e: ParseError) -> Self {
        TransportError::Malformed(e.to_string())
    }
}

/// Payload-less reply, used for commands that only acknowledge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack;

impl HidResponse for Ack {
    const MIN_LEN: usize = 0;

    fn from_data(_data: &[u8]) -> Result<Self, ParseError> {
        Ok(Ack)
    }
}

// =============================================================================
// Exchange helpers
// =============================================================================

/// Request/response exchange on top of raw report I/O
///
/// Every call is exactly one write and one read. Nothing is retried: a
/// failure is returned to the caller immediately.
pub trait TransportExt: Transport {
    /// Send a command and require an acknowledgement
    fn send<C: HidCommand>(&self, cmd: &C) -> Result<(), TransportError> {
        self.query::<C, Ack>(cmd).map(|_| ())
    }

    /// Send a command and parse its typed response
    fn query<C: HidCommand, R: HidResponse>(&self, cmd: &C) -> Result<R, TransportError> {
        let payload = self.exchange(C::CMD, &cmd.to_data())?;
        Ok(R::parse(&payload)?)
    }

    /// Send raw command bytes and return the validated response payload
    fn exchange(&self, cmd: u8, data: &[u8]) -> Result<Vec<u8>, TransportError> {
        let buf = protocol::build_command(cmd, data);
        debug!("Sending command 0x{:02X}: {:02X?}", cmd, &buf[..3 + data.len().min(8)]);
        self.send_report(&buf)?;

        let delay = self.command_delay_ms();
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }

        let resp = self.read_report(protocol::REPORT_ID)?;
        let payload = protocol::parse_response(cmd, &resp)?;
        debug!("Got response for 0x{:02X}: {:02X?}", cmd, payload);
        Ok(payload)
    }
}

impl<T: Transport + ?Sized> TransportExt for T {}
