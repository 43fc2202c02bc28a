//! The authenticated, length-framed TCP RPC substrate both cores sit on top of.

mod auth;
mod frame;

pub mod client;
pub mod server;
pub mod types;

pub use server::RpcServer;
pub use types::{Operation, Response, RpcReply};
