//! The Paxos acceptor: the only stateful half of a node, serialized behind a `Mutex`.
//!
//! Owns the acceptor's durable state as a struct rather than module-level globals, with
//! `prepare` and `accept` as methods on it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::RpcResult;
use crate::paxos::types::{ProposalNumber, Value};
use crate::persistence::{self, AcceptorRecord};
use crate::rpc::types::Response;

pub struct Acceptor {
    state: Mutex<AcceptorRecord>,
    proposal_counter: AtomicU64,
    replica_file: PathBuf,
}

impl Acceptor {
    /// Loads the acceptor's durable state from `replica_file`, or starts empty if it
    /// does not exist yet (mirrors `get_value`'s "empty file = no value").
    pub fn load(replica_file: PathBuf) -> RpcResult<Self> {
        let record = persistence::load_acceptor_record(&replica_file)?;
        let counter = record.proposal_counter;
        Ok(Acceptor {
            state: Mutex::new(record),
            proposal_counter: AtomicU64::new(counter),
            replica_file,
        })
    }

    /// Phase 1: `prepare(n) → Promise(accepted_n, accepted_value) | Reject(promised_n)`.
    pub fn prepare(&self, n: ProposalNumber) -> RpcResult<Response> {
        let mut state = self.state.lock().unwrap();
        if state.promised_n.is_none() || n > state.promised_n.unwrap() {
            state.promised_n = Some(n);
            persistence::store_acceptor_record(&self.replica_file, &state)?;
            Ok(Response::Promise {
                accepted_n: state.accepted_n,
                accepted_value: state.accepted_value.clone(),
            })
        } else {
            Ok(Response::Reject {
                promised_n: state.promised_n,
            })
        }
    }

    /// Phase 2: `accept(n, v) → Accepted(n) | Reject(promised_n)`. Note `n >= promised_n`,
    /// not strict `>`: a proposer that just won a promise at `n` must still be able to
    /// complete phase 2 even though that promise raised `promised_n` to `n`.
    pub fn accept(&self, n: ProposalNumber, value: Value) -> RpcResult<Response> {
        let mut state = self.state.lock().unwrap();
        if state.promised_n.is_none() || n >= state.promised_n.unwrap() {
            state.promised_n = Some(n);
            state.accepted_n = Some(n);
            state.accepted_value = Some(value);
            persistence::store_acceptor_record(&self.replica_file, &state)?;
            Ok(Response::Accepted { n })
        } else {
            Ok(Response::Reject {
                promised_n: state.promised_n,
            })
        }
    }

    pub fn get_value(&self) -> Option<Value> {
        self.state.lock().unwrap().accepted_value.clone()
    }

    /// Generates a fresh, cluster-unique proposal number and persists the new counter
    /// value so a restarted proposer never regenerates a number it already used. The
    /// increment itself is a single atomic fetch-add, so overlapping `SubmitValue` calls
    /// on the same node never observe the same counter value.
    pub fn next_proposal_number(&self, node_id: usize) -> RpcResult<ProposalNumber> {
        let counter = self.proposal_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock().unwrap();
        state.proposal_counter = counter;
        persistence::store_acceptor_record(&self.replica_file, &state)?;
        Ok(ProposalNumber::new(counter, node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acceptor() -> (tempfile::TempDir, Acceptor) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replica");
        let acceptor = Acceptor::load(path).unwrap();
        (dir, acceptor)
    }

    #[test]
    fn first_prepare_is_always_promised() {
        let (_dir, a) = acceptor();
        let n = ProposalNumber::new(1, 1);
        match a.prepare(n).unwrap() {
            Response::Promise {
                accepted_n,
                accepted_value,
            } => {
                assert_eq!(accepted_n, None);
                assert_eq!(accepted_value, None);
            }
            other => panic!("expected Promise, got {:?}", other),
        }
    }

    #[test]
    fn prepare_with_lower_n_is_rejected() {
        let (_dir, a) = acceptor();
        a.prepare(ProposalNumber::new(5, 1)).unwrap();
        match a.prepare(ProposalNumber::new(1, 2)).unwrap() {
            Response::Reject { promised_n } => {
                assert_eq!(promised_n, Some(ProposalNumber::new(5, 1)))
            }
            other => panic!("expected Reject, got {:?}", other),
        }
    }

    #[test]
    fn accept_allows_equal_to_promised() {
        let (_dir, a) = acceptor();
        let n = ProposalNumber::new(3, 1);
        a.prepare(n).unwrap();
        match a.accept(n, "v".to_string()).unwrap() {
            Response::Accepted { n: accepted } => assert_eq!(accepted, n),
            other => panic!("expected Accepted, got {:?}", other),
        }
        assert_eq!(a.get_value(), Some("v".to_string()));
    }

    #[test]
    fn accept_below_promised_is_rejected() {
        let (_dir, a) = acceptor();
        a.prepare(ProposalNumber::new(5, 1)).unwrap();
        match a.accept(ProposalNumber::new(1, 2), "v".to_string()).unwrap() {
            Response::Reject { .. } => {}
            other => panic!("expected Reject, got {:?}", other),
        }
        assert_eq!(a.get_value(), None);
    }

    #[test]
    fn proposal_numbers_are_strictly_increasing_and_unique_per_node() {
        let (_dir, a) = acceptor();
        let n1 = a.next_proposal_number(1).unwrap();
        let n2 = a.next_proposal_number(1).unwrap();
        assert!(n2 > n1);
    }
}
