//! The 2PC coordinator: client-facing scenario operations plus the generic
//! prepare -> decide -> commit/abort driver.
//!
//! An RPC error or unexpected response while requesting a vote counts as a NO; an RPC
//! error while sending the final commit/abort is logged but never changes the decision
//! already reached.

use std::net::SocketAddr;
use std::time::Duration;

use crate::config::TwoPcCoordinatorConfig;
use crate::error::{RpcError, RpcResult};
use crate::rpc::types::{Operation, Response, RpcReply};
use crate::twopc::types::{CommitOutcome, Decision, TxId, TxType, Vote};
use crate::txlog::TxLog;

pub struct Coordinator {
    participant_a: SocketAddr,
    participant_b: SocketAddr,
    auth_key: String,
    timeout: Duration,
    log: TxLog,
}

impl Coordinator {
    pub fn load(config: &TwoPcCoordinatorConfig) -> RpcResult<Self> {
        let log = TxLog::open(&config.log_file, "COORD").map_err(crate::error::RpcError::persistence)?;
        log.append("coordinator initialized");
        Ok(Coordinator {
            participant_a: config.participant_a,
            participant_b: config.participant_b,
            auth_key: config.auth_key.clone(),
            timeout: Duration::from_millis(config.peer_timeout_ms),
            log,
        })
    }

    pub fn initialize_balances(&self, a: i64, b: i64) -> Response {
        self.log
            .append(&format!("initializing balances: A={a}, B={b}"));
        let _ = self.call(self.participant_a, Operation::SetBalance { value: a });
        let _ = self.call(self.participant_b, Operation::SetBalance { value: b });
        Response::Ack
    }

    pub fn run_transfer_100(&self) -> bool {
        self.log.append("client requested: run_transfer_100");
        self.two_phase_commit(TxType::Transfer100) == Decision::Commit
    }

    pub fn run_bonus_20_percent(&self) -> bool {
        self.log.append("client requested: run_bonus_20_percent");
        let a_balance = match self.call(self.participant_a, Operation::GetBalance) {
            Ok(Response::Balance(b)) => b,
            Ok(other) => {
                self.log
                    .append(&format!("unexpected response reading A's balance: {:?}", other));
                return false;
            }
            Err(e) => {
                self.log
                    .append(&format!("failed to read A's balance: {e}"));
                return false;
            }
        };

        let bonus = (a_balance as f64 * 0.2) as i64;
        self.log
            .append(&format!("A balance={a_balance}, bonus=0.2*A => {bonus}"));
        self.two_phase_commit(TxType::Bonus { bonus }) == Decision::Commit
    }

    pub fn get_balances(&self) -> Response {
        let a = match self.call(self.participant_a, Operation::GetBalance) {
            Ok(Response::Balance(b)) => b,
            _ => 0,
        };
        let b = match self.call(self.participant_b, Operation::GetBalance) {
            Ok(Response::Balance(b)) => b,
            _ => 0,
        };
        Response::Balances { a, b }
    }

    /// Drives one complete 2PC instance: fresh tid, prepare against both participants,
    /// commit or abort both depending on the votes, return the decision.
    fn two_phase_commit(&self, tx_type: TxType) -> Decision {
        let tid = TxId::new();
        self.log
            .append(&format!("starting 2PC tid={tid}, type={tx_type}"));

        let vote_a = self.request_vote(self.participant_a, tid, tx_type, "A");
        let vote_b = self.request_vote(self.participant_b, tid, tx_type, "B");

        let decision = if vote_a == Vote::Yes && vote_b == Vote::Yes {
            Decision::Commit
        } else {
            Decision::Abort
        };
        self.log.append(&format!("decision for tid={tid}: {:?}", decision));

        let op = match decision {
            Decision::Commit => Operation::CommitTx { tid },
            Decision::Abort => Operation::AbortTx { tid },
        };
        self.finish(self.participant_a, tid, op.clone(), "A");
        self.finish(self.participant_b, tid, op, "B");

        self.log.append(&format!("transaction {tid} {:?}", decision));
        decision
    }

    fn request_vote(&self, addr: SocketAddr, tid: TxId, tx_type: TxType, tag: &str) -> Vote {
        match self.call(addr, Operation::PrepareTx { tid, tx_type }) {
            Ok(Response::Vote(v)) => {
                self.log.append(&format!("vote from {tag}: {:?}", v));
                v
            }
            Ok(other) => {
                self.log
                    .append(&format!("unexpected prepare response from {tag}: {:?}", other));
                Vote::No
            }
            Err(e) => {
                self.log
                    .append(&format!("exception contacting participant {tag} during prepare: {e}"));
                Vote::No
            }
        }
    }

    /// Sends the commit/abort decision to one participant. An error here is logged but
    /// never changes the decision already reached.
    fn finish(&self, addr: SocketAddr, tid: TxId, op: Operation, tag: &str) {
        match self.call(addr, op) {
            Ok(Response::CommitResult(CommitOutcome::Applied)) | Ok(Response::Ack) => {}
            Ok(Response::CommitResult(CommitOutcome::Ignored)) => {
                self.log.append(&format!(
                    "{tag} had no prepared state for tid={tid} (commit/abort out of sync)"
                ));
            }
            Ok(other) => {
                self.log
                    .append(&format!("unexpected response from {tag} for tid={tid}: {:?}", other));
            }
            Err(e) => {
                self.log
                    .append(&format!("error sending decision to {tag} for tid={tid}: {e}"));
            }
        }
    }

    fn call(&self, addr: SocketAddr, op: Operation) -> RpcResult<Response> {
        crate::rpc::client::call(addr, &self.auth_key, self.timeout, &op)
    }

    /// Routes the fixed `Operation` set this role serves.
    pub fn dispatch(&self, op: Operation) -> RpcReply {
        match op {
            Operation::InitializeBalances { a, b } => Ok(self.initialize_balances(a, b)),
            Operation::RunTransfer100 => Ok(Response::Decision(self.run_transfer_100())),
            Operation::RunBonus20Percent => Ok(Response::Decision(self.run_bonus_20_percent())),
            Operation::GetBalances => Ok(self.get_balances()),
            other => Err(RpcError::BadRequest(format!(
                "operation {:?} is not served by the 2PC coordinator",
                other
            ))),
        }
    }
}
