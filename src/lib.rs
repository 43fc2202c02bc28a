//! A small distributed coordination toolkit implementing two textbook protocols over a
//! fixed cluster of networked nodes: single-decree Paxos for choosing one value across a
//! replicated 3-node ensemble, and Two-Phase Commit for an atomic transfer/bonus across a
//! coordinator and two account-owning resource managers. Both cores sit on the same
//! authenticated, length-framed TCP RPC substrate (`rpc`) and the same per-node durability
//! discipline (`persistence`).

pub mod config;
pub mod error;
pub mod paxos;
pub mod persistence;
pub mod rpc;
pub mod twopc;
pub mod txlog;
