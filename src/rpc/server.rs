//! Listener thread + one worker thread per connection, matching the fixed `Operation`
//! enum to a handler closure.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use log::{info, warn};

use crate::rpc::auth::check_auth;
use crate::rpc::frame::{read_frame, write_frame};
use crate::rpc::types::{Operation, RpcReply};

/// A running RPC server. Construct with [`RpcServer::bind`], then either [`RpcServer::run`]
/// (blocks forever on the accept loop) or [`RpcServer::serve_background`] (spawns the
/// accept loop on its own thread and returns immediately, for tests and demos that need
/// to keep driving the calling thread).
pub struct RpcServer<H> {
    listener: TcpListener,
    auth_key: String,
    handler: Arc<H>,
}

impl<H> RpcServer<H>
where
    H: Fn(Operation) -> RpcReply + Send + Sync + 'static,
{
    pub fn bind(addr: SocketAddr, auth_key: String, handler: H) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(RpcServer {
            listener,
            auth_key,
            handler: Arc::new(handler),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop on the current thread, forever. Servers run until killed;
    /// no graceful shutdown protocol is implemented.
    pub fn run(self) -> ! {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let handler = Arc::clone(&self.handler);
                    let auth_key = self.auth_key.clone();
                    thread::spawn(move || handle_connection(stream, &auth_key, &handler));
                }
                Err(e) => warn!("failed to accept connection: {}", e),
            }
        }
        unreachable!("TcpListener::incoming() never yields None");
    }

    /// Spawns the accept loop on a background thread and returns immediately. Used by
    /// tests and demos that need to keep the calling thread free to issue client calls
    /// against the server they just started.
    pub fn serve_background(self) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            for stream in self.listener.incoming() {
                match stream {
                    Ok(stream) => {
                        let handler = Arc::clone(&self.handler);
                        let auth_key = self.auth_key.clone();
                        thread::spawn(move || handle_connection(stream, &auth_key, &handler));
                    }
                    Err(e) => warn!("failed to accept connection: {}", e),
                }
            }
        })
    }
}

fn handle_connection<H>(mut stream: TcpStream, auth_key: &str, handler: &H)
where
    H: Fn(Operation) -> RpcReply,
{
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());

    match check_auth(&mut stream, auth_key) {
        Ok(true) => {}
        Ok(false) => {
            warn!("[rpc] rejected connection from {}: bad auth key", peer);
            return;
        }
        Err(e) => {
            warn!("[rpc] failed to read auth frame from {}: {}", peer, e);
            return;
        }
    }

    loop {
        let request_bytes = match read_frame(&mut stream) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => {
                info!("[rpc] connection from {} closed: {}", peer, e);
                break;
            }
        };

        let reply: RpcReply = match bincode::deserialize::<Operation>(&request_bytes) {
            Ok(op) => handler(op),
            Err(e) => Err(crate::error::RpcError::BadRequest(e.to_string())),
        };

        let encoded = match bincode::serialize(&reply) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("[rpc] failed to encode response for {}: {}", peer, e);
                break;
            }
        };

        if let Err(e) = write_frame(&mut stream, &encoded) {
            info!("[rpc] failed to write response to {}: {}", peer, e);
            break;
        }
    }
}
