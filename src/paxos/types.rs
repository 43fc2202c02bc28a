//! Proposal numbers and the in-memory shape of acceptor state.

use serde::{Deserialize, Serialize};

/// The multiplier `K` in `proposal_counter * K + node_id`. Must exceed the number of
/// nodes in the cluster so distinct nodes never collide at the same counter value.
pub const PROPOSAL_NUMBER_BASE: u64 = 10;

/// A totally-ordered, cluster-unique proposal number, constructed as
/// `counter * PROPOSAL_NUMBER_BASE + node_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalNumber(pub u64);

impl ProposalNumber {
    pub fn new(counter: u64, node_id: usize) -> Self {
        ProposalNumber(counter * PROPOSAL_NUMBER_BASE + node_id as u64)
    }
}

impl std::fmt::Display for ProposalNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The value type a client may submit to Paxos, narrowed to a UTF-8 string, which is
/// all any demo or test scenario needs and keeps the wire format and the replica file
/// free of an open-ended generic parameter.
pub type Value = String;
