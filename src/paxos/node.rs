//! `PaxosNode`: one symmetric node playing all three Paxos roles (acceptor, proposer,
//! learner) behind one RPC listener. Any node may act as proposer, acceptor, or learner;
//! a single struct owns one `Acceptor` and exposes all three roles' RPCs on one listener.

use std::thread::JoinHandle;

use crate::config::PaxosNodeConfig;
use crate::error::RpcResult;
use crate::paxos::acceptor::Acceptor;
use crate::paxos::proposer;
use crate::rpc::types::{Operation, Response, RpcReply};
use crate::rpc::RpcServer;

pub struct PaxosNode {
    config: PaxosNodeConfig,
    acceptor: Acceptor,
}

impl PaxosNode {
    pub fn start(config: PaxosNodeConfig) -> RpcResult<Self> {
        let acceptor = Acceptor::load(config.replica_file.clone())?;
        Ok(PaxosNode { config, acceptor })
    }

    fn dispatch(&self, op: Operation) -> RpcReply {
        match op {
            Operation::Prepare { n } => self.acceptor.prepare(n),
            Operation::Accept { n, value } => self.acceptor.accept(n, value),
            Operation::SubmitValue { value } => Ok(Response::SubmitValueResult(
                proposer::submit_value(&self.acceptor, &self.config, value),
            )),
            Operation::GetValue => Ok(Response::Value(self.acceptor.get_value())),
            other => Err(crate::error::RpcError::BadRequest(format!(
                "operation {:?} is not served by a Paxos node",
                other
            ))),
        }
    }

    /// Binds the listener and serves forever on the calling thread.
    pub fn bind_and_run(self) -> std::io::Result<()> {
        let addr = self.config.listen_addr;
        let auth_key = self.config.auth_key.clone();
        let node = std::sync::Arc::new(self);
        let server = RpcServer::bind(addr, auth_key, move |op| node.dispatch(op))?;
        server.run()
    }

    /// Binds the listener and serves in the background, returning the server's bound
    /// address and a join handle. Used by tests and demos that drive the node from the
    /// same process.
    pub fn bind_background(
        self,
    ) -> std::io::Result<(std::net::SocketAddr, JoinHandle<()>)> {
        let addr = self.config.listen_addr;
        let auth_key = self.config.auth_key.clone();
        let node = std::sync::Arc::new(self);
        let server = RpcServer::bind(addr, auth_key, move |op| node.dispatch(op))?;
        let bound_addr = server.local_addr()?;
        Ok((bound_addr, server.serve_background()))
    }
}
