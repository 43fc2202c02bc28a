//! Shared vocabulary for the 2PC core: transaction ids, transaction types, votes and
//! commit outcomes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cluster-unique identifier the coordinator binds to one 2PC instance for its whole
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub Uuid);

impl TxId {
    pub fn new() -> Self {
        TxId(Uuid::new_v4())
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two transaction shapes the participants understand. Since this is a closed enum
/// rather than a name string, an unrecognized type never reaches `Participant::prepare`
/// at all: bincode rejects an unknown variant at decode time, before the RPC handler
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxType {
    /// Transfer 100 from A to B, no parameters.
    Transfer100,
    /// Add `bonus` to both A and B.
    Bonus { bonus: i64 },
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxType::Transfer100 => write!(f, "T1_TRANSFER_100"),
            TxType::Bonus { bonus } => write!(f, "T2_BONUS(bonus={})", bonus),
        }
    }
}

/// A participant's vote in the prepare phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Yes,
    No,
}

/// The coordinator's final decision for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Commit,
    Abort,
}

/// The result of a `commit(tid)` call against a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitOutcome {
    /// The prepared entry was found and applied.
    Applied,
    /// No prepared state existed for this tid: coordinator and participant are out of
    /// sync. Logged, not treated as an error.
    Ignored,
}
