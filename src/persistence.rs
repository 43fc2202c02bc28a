//! Durable on-disk state for both cores. Every component of acceptor state is persisted
//! together, not just the accepted value, and every write is followed by an explicit
//! `fsync` before the caller is told the write succeeded.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::paxos::types::ProposalNumber;
use crate::twopc::types::{TxId, TxType};

/// The full durable record of one Paxos acceptor's state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcceptorRecord {
    pub promised_n: Option<ProposalNumber>,
    pub accepted_n: Option<ProposalNumber>,
    pub accepted_value: Option<String>,
    pub proposal_counter: u64,
}

/// Reads the replica file, or `AcceptorRecord::default()` if it does not exist yet
/// (an empty or missing file means no value).
pub fn load_acceptor_record(path: &Path) -> Result<AcceptorRecord, RpcError> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(AcceptorRecord::default()),
        Ok(bytes) => bincode::deserialize(&bytes).map_err(|e| RpcError::Persistence(e.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AcceptorRecord::default()),
        Err(e) => Err(RpcError::persistence(e)),
    }
}

/// Writes the replica file and `fsync`s it before returning: after a successful `accept`
/// returns, the new state must survive a crash.
pub fn store_acceptor_record(path: &Path, record: &AcceptorRecord) -> Result<(), RpcError> {
    let encoded = bincode::serialize(record).map_err(|e| RpcError::Persistence(e.to_string()))?;
    write_and_fsync(path, &encoded)
}

/// One participant's durable state: the committed balance and the table of tentative,
/// prepared-but-uncommitted balances.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRecord {
    pub balance: i64,
    pub prepared: Vec<(TxId, TxType, i64)>,
}

pub fn load_account_record(path: &Path) -> Result<AccountRecord, RpcError> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(AccountRecord::default()),
        Ok(bytes) => bincode::deserialize(&bytes).map_err(|e| RpcError::Persistence(e.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AccountRecord::default()),
        Err(e) => Err(RpcError::persistence(e)),
    }
}

/// Writes the account file and `fsync`s it before returning. Called both on `commit`
/// (new balance, prepared entry removed) and on `prepare` (balance unchanged, prepared
/// entry added); the latter is what makes prepared state durable across a crash.
pub fn store_account_record(path: &Path, record: &AccountRecord) -> Result<(), RpcError> {
    let encoded = bincode::serialize(record).map_err(|e| RpcError::Persistence(e.to_string()))?;
    write_and_fsync(path, &encoded)
}

fn write_and_fsync(path: &Path, bytes: &[u8]) -> Result<(), RpcError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(RpcError::persistence)?;
        }
    }
    let tmp_path = path.with_extension("tmp");
    let mut f = File::create(&tmp_path).map_err(RpcError::persistence)?;
    f.write_all(bytes).map_err(RpcError::persistence)?;
    f.sync_all().map_err(RpcError::persistence)?;
    drop(f);
    fs::rename(&tmp_path, path).map_err(RpcError::persistence)?;
    Ok(())
}
