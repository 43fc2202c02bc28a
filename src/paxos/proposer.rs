//! The Paxos proposer: stateless between calls, driven by a client `SubmitValue`.
//!
//! Generates a proposal number, fans out `prepare(n)` to self and every peer, counts
//! promises against a majority, carries forward the highest-numbered already-accepted
//! value if any peer reports one, fans out `accept(n, v)`, and counts accepts against
//! the same majority.

use std::time::Duration;

use log::info;

use crate::config::PaxosNodeConfig;
use crate::error::RpcResult;
use crate::paxos::acceptor::Acceptor;
use crate::paxos::types::{ProposalNumber, Value};
use crate::rpc::types::{Operation, Response};

/// Runs one attempt of single-decree Paxos to choose a value, starting from
/// `value_client`. Returns a human-readable diagnostic string; this core never retries
/// a failed round automatically.
pub fn submit_value(acceptor: &Acceptor, config: &PaxosNodeConfig, value_client: Value) -> String {
    let n = match acceptor.next_proposal_number(config.node_id) {
        Ok(n) => n,
        Err(e) => return format!("SubmitValue FAILED: could not generate a proposal number: {e}"),
    };

    let timeout = Duration::from_millis(config.peer_timeout_ms);
    let peers = config.peer_addrs();

    // Phase 1: prepare(n) against self and every peer. RPC errors and timeouts count
    // as no response.
    let mut promises = 0usize;
    let mut highest_acc: Option<(ProposalNumber, Value)> = None;

    match acceptor.prepare(n) {
        Ok(Response::Promise {
            accepted_n,
            accepted_value,
        }) => {
            promises += 1;
            note_promise(&mut highest_acc, accepted_n, accepted_value);
        }
        Ok(Response::Reject { .. }) => {}
        Ok(other) => info!("[paxos] unexpected response to local prepare: {:?}", other),
        Err(e) => info!("[paxos] local prepare failed: {}", e),
    }

    for addr in &peers {
        match call_peer(*addr, config, timeout, Operation::Prepare { n }) {
            Some(Response::Promise {
                accepted_n,
                accepted_value,
            }) => {
                promises += 1;
                note_promise(&mut highest_acc, accepted_n, accepted_value);
            }
            Some(Response::Reject { .. }) | None => {}
            Some(other) => info!("[paxos] unexpected response to prepare from {}: {:?}", addr, other),
        }
    }

    let majority = config.majority();
    if promises < majority {
        return format!(
            "Proposal Num: {n}, SubmitValue FAILED in Phase 1 (only {promises} of {majority} needed promises)."
        );
    }

    // Carry-forward rule: if any promise carried an already-accepted value, the
    // proposer must use the one with the highest accepted_n, not its own.
    let v = match highest_acc {
        Some((_, v)) => v,
        None => value_client,
    };

    // Phase 2: accept(n, v) against self and every peer.
    let mut accepts = 0usize;

    match acceptor.accept(n, v.clone()) {
        Ok(Response::Accepted { .. }) => accepts += 1,
        Ok(Response::Reject { .. }) => {}
        Ok(other) => info!("[paxos] unexpected response to local accept: {:?}", other),
        Err(e) => info!("[paxos] local accept failed: {}", e),
    }

    for addr in &peers {
        match call_peer(
            *addr,
            config,
            timeout,
            Operation::Accept {
                n,
                value: v.clone(),
            },
        ) {
            Some(Response::Accepted { .. }) => accepts += 1,
            Some(Response::Reject { .. }) | None => {}
            Some(other) => info!("[paxos] unexpected response to accept from {}: {:?}", addr, other),
        }
    }

    if accepts >= majority {
        format!("Proposal Num: {n}, SubmitValue SUCCEEDED. Chosen value = {v}")
    } else {
        format!(
            "Proposal Num: {n}, SubmitValue FAILED in Phase 2 (only {accepts} of {majority} needed accepts)."
        )
    }
}

fn note_promise(
    highest_acc: &mut Option<(ProposalNumber, Value)>,
    accepted_n: Option<ProposalNumber>,
    accepted_value: Option<Value>,
) {
    if let (Some(acc_n), Some(acc_v)) = (accepted_n, accepted_value) {
        let replace = match highest_acc {
            Some((current_n, _)) => acc_n > *current_n,
            None => true,
        };
        if replace {
            *highest_acc = Some((acc_n, acc_v));
        }
    }
}

fn call_peer(
    addr: std::net::SocketAddr,
    config: &PaxosNodeConfig,
    timeout: Duration,
    op: Operation,
) -> Option<Response> {
    match rpc_call(addr, config, timeout, op) {
        Ok(resp) => Some(resp),
        Err(e) => {
            info!("[paxos] peer {} unreachable or errored: {}", addr, e);
            None
        }
    }
}

fn rpc_call(
    addr: std::net::SocketAddr,
    config: &PaxosNodeConfig,
    timeout: Duration,
    op: Operation,
) -> RpcResult<Response> {
    crate::rpc::client::call(addr, &config.auth_key, timeout, &op)
}
