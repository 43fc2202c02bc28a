//! The pre-shared-key handshake every connection performs before any operation is
//! dispatched: the client presents a key immediately after connecting, and the server
//! closes the connection without processing anything further if it doesn't match.

use std::io::{Read, Write};

use crate::rpc::frame::{read_frame, write_frame};

/// Sent by the client immediately after connecting, before the first `Operation`.
pub fn send_auth<W: Write>(w: &mut W, auth_key: &str) -> std::io::Result<()> {
    write_frame(w, auth_key.as_bytes())
}

/// Read and constant-time-compare the client's auth frame against the configured key.
/// Returns `true` iff the connection may proceed to serve operations.
pub fn check_auth<R: Read>(r: &mut R, expected_key: &str) -> std::io::Result<bool> {
    let presented = read_frame(r)?;
    Ok(constant_time_eq(&presented, expected_key.as_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::constant_time_eq;

    #[test]
    fn equal_keys_match() {
        assert!(constant_time_eq(b"peekaboo", b"peekaboo"));
    }

    #[test]
    fn different_length_rejected() {
        assert!(!constant_time_eq(b"short", b"longer-key"));
    }

    #[test]
    fn same_length_mismatch_rejected() {
        assert!(!constant_time_eq(b"peekaboo", b"peekabo0"));
    }
}
