//! The fixed, typed set of RPC operations and responses shared by both cores. A closed
//! enum matched with `match` means an unhandled operation is a compile error, not a
//! runtime lookup failure, and a client can never probe for an arbitrary method name.

use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::paxos::types::{ProposalNumber, Value};
use crate::twopc::types::{CommitOutcome, TxId, TxType, Vote};

/// Every request a Paxos node or a 2PC participant/coordinator can receive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    // --- Paxos acceptor ---
    Prepare { n: ProposalNumber },
    Accept { n: ProposalNumber, value: Value },

    // --- Paxos proposer / learner, client-facing ---
    SubmitValue { value: Value },
    GetValue,

    // --- 2PC participant ---
    PrepareTx { tid: TxId, tx_type: TxType },
    CommitTx { tid: TxId },
    AbortTx { tid: TxId },
    GetBalance,
    SetBalance { value: i64 },

    // --- 2PC coordinator, client-facing ---
    InitializeBalances { a: i64, b: i64 },
    RunTransfer100,
    RunBonus20Percent,
    GetBalances,
}

/// Every successful response. Errors are carried as `Err(RpcError)` one level up (see
/// [`RpcReply`]), never folded into this enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    Promise {
        accepted_n: Option<ProposalNumber>,
        accepted_value: Option<Value>,
    },
    Reject {
        promised_n: Option<ProposalNumber>,
    },
    Accepted {
        n: ProposalNumber,
    },
    /// A human-readable diagnostic describing which phase succeeded or failed and with
    /// how many responses.
    SubmitValueResult(String),
    Value(Option<Value>),
    Vote(Vote),
    CommitResult(CommitOutcome),
    Ack,
    Balance(i64),
    Balances { a: i64, b: i64 },
    Decision(bool),
}

/// The full wire envelope: every RPC reply is a `Result`, never a bare value and never a
/// panic across the connection.
pub type RpcReply = Result<Response, RpcError>;
