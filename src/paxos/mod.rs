//! Single-decree Paxos: the acceptor, proposer and the symmetric node that wires both
//! (plus the learner, which is just `Acceptor::get_value`) onto one RPC listener.

pub mod acceptor;
pub mod node;
pub mod proposer;
pub mod types;

pub use node::PaxosNode;
