//! Blocking RPC client: connect, present the auth key, send one [`Operation`], read back
//! one [`RpcReply`]. Opens a fresh connection per call and applies a read/write timeout
//! so one unresponsive peer cannot stall a caller past a bounded duration.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::RpcError;
use crate::rpc::auth::send_auth;
use crate::rpc::frame::{read_frame, write_frame};
use crate::rpc::types::{Operation, RpcReply};

/// Performs one request/response round trip against `addr`, closing the connection
/// afterwards. A single unresponsive peer is bounded by `timeout` rather than stalling
/// the caller indefinitely.
pub fn call(
    addr: SocketAddr,
    auth_key: &str,
    timeout: Duration,
    op: &Operation,
) -> RpcReply {
    let mut stream = TcpStream::connect_timeout(&addr, timeout).map_err(RpcError::from)?;
    stream.set_read_timeout(Some(timeout)).map_err(RpcError::from)?;
    stream.set_write_timeout(Some(timeout)).map_err(RpcError::from)?;

    send_auth(&mut stream, auth_key).map_err(RpcError::from)?;

    let encoded = bincode::serialize(op).map_err(|e| RpcError::BadRequest(e.to_string()))?;
    write_frame(&mut stream, &encoded).map_err(RpcError::from)?;

    let response_bytes = read_frame(&mut stream).map_err(RpcError::from)?;
    bincode::deserialize::<RpcReply>(&response_bytes)
        .map_err(|e| RpcError::BadRequest(e.to_string()))?
}
