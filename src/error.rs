//! The structured error type that rides across the RPC boundary.
//!
//! Nothing in this crate panics or returns a raw string to describe a failure an RPC
//! caller needs to react to; every fallible operation resolves to `Result<_, RpcError>`,
//! and `RpcError` itself is `Serialize`/`Deserialize` so a server can hand one back to a
//! client inside a [`crate::rpc::Response`] instead of dropping the connection.

use std::io;

use serde::{Deserialize, Serialize};

/// Errors that can cross the RPC boundary, or occur while driving an RPC call.
#[derive(Debug, Serialize, Deserialize, thiserror::Error)]
pub enum RpcError {
    /// The peer was unreachable, the connection dropped mid-request, or the call timed
    /// out. Callers treat this as "no response" for quorum-counting purposes; it is not
    /// swallowed, just reclassified at the call site.
    #[error("transport error: {0}")]
    Transport(String),

    /// The pre-shared authentication key presented at connection setup did not match.
    #[error("authentication rejected")]
    AuthRejected,

    /// A durable write (replica file, account file) failed, including a failed fsync.
    /// Treated as fatal to the current operation: the handler surfaces this instead of
    /// reporting success, and does not mutate in-memory state beyond what was durably
    /// written.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The request could not be decoded, or named an operation the receiving role does
    /// not serve (e.g. a 2PC operation sent to a Paxos node).
    #[error("malformed or unsupported request: {0}")]
    BadRequest(String),
}

impl From<io::Error> for RpcError {
    fn from(e: io::Error) -> Self {
        RpcError::Transport(e.to_string())
    }
}

impl RpcError {
    pub fn persistence(e: io::Error) -> Self {
        RpcError::Persistence(e.to_string())
    }
}

pub type RpcResult<T> = Result<T, RpcError>;
