//! Feature-report framing shared by all Razer mouse families
//!
//! Request (host → device), one feature report:
//!
//! ```text
//! [report_id=0] [cmd] [len] [payload ...] [0-padding] [xor]
//! ```
//!
//! Response (device → host):
//!
//! ```text
//! [report_id=0] [cmd echo] [status] [len] [payload ...] [0-padding] [xor]
//! ```
//!
//! `xor` is the XOR of every byte between the report ID and the checksum
//! itself. Command bytes are family-specific and live with each backend.

use crate::error::TransportError;

/// Feature report size including the report ID byte
pub const REPORT_SIZE: usize = 33;

/// Report ID used for configuration reports
pub const REPORT_ID: u8 = 0x00;

/// Largest payload a request can carry
pub const MAX_REQUEST_PAYLOAD: usize = REPORT_SIZE - 4;

/// Largest payload a response can carry
pub const MAX_RESPONSE_PAYLOAD: usize = REPORT_SIZE - 5;

/// Response status byte values
pub mod status {
    pub const BUSY: u8 = 0x01;
    pub const OK: u8 = 0x02;
    pub const FAILURE: u8 = 0x03;
    pub const TIMEOUT: u8 = 0x04;
    pub const UNSUPPORTED: u8 = 0x05;
}

/// Timing defaults
pub mod timing {
    /// Pause between writing a request and reading its response
    pub const DEFAULT_COMMAND_DELAY_MS: u64 = 15;
}

/// XOR checksum over a report body (report ID and checksum byte excluded)
pub fn calculate_checksum(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Build a request buffer
///
/// Payloads longer than [`MAX_REQUEST_PAYLOAD`] are truncated.
pub fn build_command(cmd: u8, data: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; REPORT_SIZE];
    buf[0] = REPORT_ID;
    buf[1] = cmd;
    let len = std::cmp::min(data.len(), MAX_REQUEST_PAYLOAD);
    buf[2] = len as u8;
    buf[3..3 + len].copy_from_slice(&data[..len]);
    buf[REPORT_SIZE - 1] = calculate_checksum(&buf[1..REPORT_SIZE - 1]);
    buf
}

/// Build a response buffer (the device side of the framing)
pub fn build_response(cmd: u8, status: u8, data: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; REPORT_SIZE];
    buf[0] = REPORT_ID;
    buf[1] = cmd;
    buf[2] = status;
    let len = std::cmp::min(data.len(), MAX_RESPONSE_PAYLOAD);
    buf[3] = len as u8;
    buf[4..4 + len].copy_from_slice(&data[..len]);
    buf[REPORT_SIZE - 1] = calculate_checksum(&buf[1..REPORT_SIZE - 1]);
    buf
}

/// A decoded request as seen by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub cmd: u8,
    pub data: Vec<u8>,
}

/// Decode a request buffer (used by device simulators)
pub fn parse_request(buf: &[u8]) -> Result<Request, TransportError> {
    if buf.len() < REPORT_SIZE {
        return Err(TransportError::Malformed(format!(
            "request too short: {} bytes",
            buf.len()
        )));
    }
    if calculate_checksum(&buf[1..REPORT_SIZE - 1]) != buf[REPORT_SIZE - 1] {
        return Err(TransportError::ChecksumError);
    }
    let len = buf[2] as usize;
    if len > MAX_REQUEST_PAYLOAD {
        return Err(TransportError::Malformed(format!(
            "request length {} exceeds {}",
            len, MAX_REQUEST_PAYLOAD
        )));
    }
    Ok(Request {
        cmd: buf[1],
        data: buf[3..3 + len].to_vec(),
    })
}

/// Validate a response buffer and extract its payload
pub fn parse_response(expected_cmd: u8, buf: &[u8]) -> Result<Vec<u8>, TransportError> {
    if buf.len() < REPORT_SIZE {
        return Err(TransportError::Malformed(format!(
            "response too short: {} bytes",
            buf.len()
        )));
    }
    if calculate_checksum(&buf[1..REPORT_SIZE - 1]) != buf[REPORT_SIZE - 1] {
        return Err(TransportError::ChecksumError);
    }
    if buf[1] != expected_cmd {
        return Err(TransportError::InvalidResponse {
            expected: expected_cmd,
            actual: buf[1],
        });
    }
    match buf[2] {
        status::OK => {}
        status::BUSY => return Err(TransportError::Busy),
        status::TIMEOUT => return Err(TransportError::Timeout),
        other => {
            return Err(TransportError::CommandFailed {
                cmd: expected_cmd,
                status: other,
            })
        }
    }
    let len = buf[3] as usize;
    if len > MAX_RESPONSE_PAYLOAD {
        return Err(TransportError::Malformed(format!(
            "response length {} exceeds {}",
            len, MAX_RESPONSE_PAYLOAD
        )));
    }
    Ok(buf[4..4 + len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command_layout() {
        let buf = build_command(0x82, &[0x01, 0x02]);
        assert_eq!(buf.len(), REPORT_SIZE);
        assert_eq!(buf[0], REPORT_ID);
        assert_eq!(buf[1], 0x82);
        assert_eq!(buf[2], 2);
        assert_eq!(&buf[3..5], &[0x01, 0x02]);
        assert_eq!(buf[REPORT_SIZE - 1], 0x82 ^ 2 ^ 0x01 ^ 0x02);
    }

    #[test]
    fn test_build_command_truncates_payload() {
        let data = [0xAAu8; 64];
        let buf = build_command(0x01, &data);
        assert_eq!(buf[2] as usize, MAX_REQUEST_PAYLOAD);
        assert_eq!(parse_request(&buf).unwrap().data.len(), MAX_REQUEST_PAYLOAD);
    }

    #[test]
    fn test_parse_response_ok() {
        let buf = build_response(0x81, status::OK, &[0x01, 0x19]);
        assert_eq!(parse_response(0x81, &buf).unwrap(), vec![0x01, 0x19]);
    }

    #[test]
    fn test_parse_response_echo_mismatch() {
        let buf = build_response(0x82, status::OK, &[]);
        assert!(matches!(
            parse_response(0x81, &buf),
            Err(TransportError::InvalidResponse {
                expected: 0x81,
                actual: 0x82
            })
        ));
    }

    #[test]
    fn test_parse_response_bad_checksum() {
        let mut buf = build_response(0x81, status::OK, &[0x01]);
        buf[REPORT_SIZE - 1] ^= 0xFF;
        assert!(matches!(
            parse_response(0x81, &buf),
            Err(TransportError::ChecksumError)
        ));
    }

    #[test]
    fn test_parse_response_status_mapping() {
        let busy = build_response(0x02, status::BUSY, &[]);
        assert!(matches!(parse_response(0x02, &busy), Err(TransportError::Busy)));

        let failed = build_response(0x02, status::UNSUPPORTED, &[]);
        assert!(matches!(
            parse_response(0x02, &failed),
            Err(TransportError::CommandFailed {
                cmd: 0x02,
                status: status::UNSUPPORTED
            })
        ));
    }

    #[test]
    fn test_parse_response_too_short() {
        assert!(matches!(
            parse_response(0x81, &[0, 0x81, status::OK]),
            Err(TransportError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_response_oversized_length() {
        let mut buf = build_response(0x81, status::OK, &[]);
        buf[3] = 0xFF;
        buf[REPORT_SIZE - 1] = calculate_checksum(&buf[1..REPORT_SIZE - 1]);
        assert!(matches!(
            parse_response(0x81, &buf),
            Err(TransportError::Malformed(_))
        ));
    }
}
