//! The 2PC participant (resource manager): owns one account's balance, votes in the
//! prepare phase, and applies or discards its tentative value on commit/abort.
//!
//! `prepare` persists the tentative balance (account file, `fsync`'d) before returning
//! YES, so a crash between voting YES and committing never loses the prepared entry.

use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::config::TwoPcParticipantConfig;
use crate::error::{RpcError, RpcResult};
use crate::persistence::{self, AccountRecord};
use crate::rpc::types::{Operation, Response, RpcReply};
use crate::twopc::types::{CommitOutcome, TxId, TxType, Vote};
use crate::txlog::TxLog;

pub struct Participant {
    account_name: String,
    account_file: PathBuf,
    state: Mutex<AccountRecord>,
    log: TxLog,
    crash_before_vote: bool,
    crash_after_vote: bool,
}

impl Participant {
    /// Loads the account's durable state (balance and any prepared-but-uncommitted
    /// entries that survived a restart) and opens the participant's log file.
    pub fn load(config: &TwoPcParticipantConfig) -> RpcResult<Self> {
        let record = persistence::load_account_record(&config.account_file)?;
        let log = TxLog::open(&config.log_file, log_tag(&config.account_name))
            .map_err(crate::error::RpcError::persistence)?;
        log.append(&format!(
            "participant for account {} initialized, balance={}, {} prepared entries reloaded",
            config.account_name,
            record.balance,
            record.prepared.len()
        ));
        Ok(Participant {
            account_name: config.account_name.clone(),
            account_file: config.account_file.clone(),
            state: Mutex::new(record),
            log,
            crash_before_vote: config.crash_before_vote,
            crash_after_vote: config.crash_after_vote,
        })
    }

    /// `prepare(tid, type) → YES|NO`. The tentative balance is durable before this
    /// returns YES, never before.
    pub fn prepare(&self, tid: TxId, tx_type: TxType) -> RpcResult<Response> {
        let mut state = self.state.lock().unwrap();
        self.log
            .append(&format!("PREPARE received: tid={tid}, type={tx_type}"));

        if self.crash_before_vote {
            self.log
                .append("simulating crash BEFORE vote (blocking indefinitely)...");
            sleep_forever();
        }

        let tentative = match (tx_type, self.account_name.as_str()) {
            (TxType::Transfer100, "A") => {
                if state.balance < 100 {
                    self.log
                        .append(&format!("VOTE NO (insufficient funds: {})", state.balance));
                    return Ok(Response::Vote(Vote::No));
                }
                state.balance - 100
            }
            (TxType::Transfer100, _) => state.balance + 100,
            (TxType::Bonus { bonus }, _) => state.balance + bonus,
        };

        state.prepared.push((tid, tx_type, tentative));
        persistence::store_account_record(&self.account_file, &state)?;
        self.log.append(&format!(
            "VOTE YES, prepared tentative balance={tentative} for tid={tid}"
        ));

        if self.crash_after_vote {
            self.log
                .append("simulating crash AFTER vote (blocking indefinitely)...");
            sleep_forever();
        }

        Ok(Response::Vote(Vote::Yes))
    }

    /// `commit(tid) → Applied|Ignored`.
    pub fn commit(&self, tid: TxId) -> RpcResult<Response> {
        let mut state = self.state.lock().unwrap();
        self.log.append(&format!("COMMIT received for tid={tid}"));

        let position = state.prepared.iter().position(|(t, _, _)| *t == tid);
        let outcome = match position {
            Some(idx) => {
                let (_, _, tentative) = state.prepared.remove(idx);
                state.balance = tentative;
                persistence::store_account_record(&self.account_file, &state)?;
                self.log
                    .append(&format!("commit applied, new balance={tentative}"));
                CommitOutcome::Applied
            }
            None => {
                self.log
                    .append(&format!("no prepared state for tid={tid}, ignoring"));
                CommitOutcome::Ignored
            }
        };
        Ok(Response::CommitResult(outcome))
    }

    /// `abort(tid) → ok`, discarding any prepared entry for `tid`.
    pub fn abort(&self, tid: TxId) -> RpcResult<Response> {
        let mut state = self.state.lock().unwrap();
        self.log.append(&format!("ABORT received for tid={tid}"));

        let position = state.prepared.iter().position(|(t, _, _)| *t == tid);
        if let Some(idx) = position {
            state.prepared.remove(idx);
            persistence::store_account_record(&self.account_file, &state)?;
            self.log.append("prepared state discarded");
        } else {
            self.log.append("no prepared state to discard");
        }
        Ok(Response::Ack)
    }

    pub fn get_balance(&self) -> RpcResult<Response> {
        let state = self.state.lock().unwrap();
        self.log.append(&format!("get_balance -> {}", state.balance));
        Ok(Response::Balance(state.balance))
    }

    pub fn set_balance(&self, value: i64) -> RpcResult<Response> {
        let mut state = self.state.lock().unwrap();
        state.balance = value;
        state.prepared.clear();
        persistence::store_account_record(&self.account_file, &state)?;
        self.log.append(&format!("set_balance({value})"));
        Ok(Response::Ack)
    }

    /// Routes the fixed `Operation` set this role serves; anything else is a
    /// `BadRequest`.
    pub fn dispatch(&self, op: Operation) -> RpcReply {
        match op {
            Operation::PrepareTx { tid, tx_type } => self.prepare(tid, tx_type),
            Operation::CommitTx { tid } => self.commit(tid),
            Operation::AbortTx { tid } => self.abort(tid),
            Operation::GetBalance => self.get_balance(),
            Operation::SetBalance { value } => self.set_balance(value),
            other => Err(RpcError::BadRequest(format!(
                "operation {:?} is not served by a 2PC participant",
                other
            ))),
        }
    }
}

/// `TxLog` wants a `&'static str` tag; the account name is only ever `"A"` or `"B"` in
/// practice, so this maps to one of two static strings rather than threading an owned
/// `String` through the log writer.
fn log_tag(account_name: &str) -> &'static str {
    match account_name {
        "A" => "A",
        "B" => "B",
        _ => "PARTICIPANT",
    }
}

fn sleep_forever() -> ! {
    loop {
        thread::sleep(Duration::from_secs(1000));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(account_name: &str) -> (tempfile::TempDir, Participant) {
        let dir = tempfile::tempdir().unwrap();
        let config = TwoPcParticipantConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            account_name: account_name.to_string(),
            account_file: dir.path().join("account"),
            log_file: dir.path().join("log.txt"),
            auth_key: "k".to_string(),
            crash_before_vote: false,
            crash_after_vote: false,
        };
        let p = Participant::load(&config).unwrap();
        (dir, p)
    }

    #[test]
    fn transfer_100_rejected_on_insufficient_funds() {
        let (_dir, p) = participant("A");
        p.set_balance(50).unwrap();
        let tid = TxId::new();
        match p.prepare(tid, TxType::Transfer100).unwrap() {
            Response::Vote(Vote::No) => {}
            other => panic!("expected Vote(No), got {:?}", other),
        }
    }

    #[test]
    fn transfer_100_on_a_prepares_and_commits_a_debit() {
        let (_dir, p) = participant("A");
        p.set_balance(200).unwrap();
        let tid = TxId::new();
        match p.prepare(tid, TxType::Transfer100).unwrap() {
            Response::Vote(Vote::Yes) => {}
            other => panic!("expected Vote(Yes), got {:?}", other),
        }
        match p.commit(tid).unwrap() {
            Response::CommitResult(CommitOutcome::Applied) => {}
            other => panic!("expected Applied, got {:?}", other),
        }
        match p.get_balance().unwrap() {
            Response::Balance(b) => assert_eq!(b, 100),
            other => panic!("expected Balance, got {:?}", other),
        }
    }

    #[test]
    fn transfer_100_on_b_prepares_a_credit() {
        let (_dir, p) = participant("B");
        p.set_balance(300).unwrap();
        let tid = TxId::new();
        p.prepare(tid, TxType::Transfer100).unwrap();
        p.commit(tid).unwrap();
        match p.get_balance().unwrap() {
            Response::Balance(b) => assert_eq!(b, 400),
            other => panic!("expected Balance, got {:?}", other),
        }
    }

    #[test]
    fn abort_discards_prepared_state_without_touching_balance() {
        let (_dir, p) = participant("A");
        p.set_balance(200).unwrap();
        let tid = TxId::new();
        p.prepare(tid, TxType::Transfer100).unwrap();
        p.abort(tid).unwrap();
        match p.commit(tid).unwrap() {
            Response::CommitResult(CommitOutcome::Ignored) => {}
            other => panic!("expected Ignored, got {:?}", other),
        }
        match p.get_balance().unwrap() {
            Response::Balance(b) => assert_eq!(b, 200),
            other => panic!("expected Balance, got {:?}", other),
        }
    }

    #[test]
    fn commit_of_unknown_tid_is_ignored() {
        let (_dir, p) = participant("A");
        match p.commit(TxId::new()).unwrap() {
            Response::CommitResult(CommitOutcome::Ignored) => {}
            other => panic!("expected Ignored, got {:?}", other),
        }
    }

    #[test]
    fn bonus_adds_to_either_account() {
        let (_dir, p) = participant("A");
        p.set_balance(100).unwrap();
        let tid = TxId::new();
        p.prepare(tid, TxType::Bonus { bonus: 20 }).unwrap();
        p.commit(tid).unwrap();
        match p.get_balance().unwrap() {
            Response::Balance(b) => assert_eq!(b, 120),
            other => panic!("expected Balance, got {:?}", other),
        }
    }

    #[test]
    fn prepared_state_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config = TwoPcParticipantConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            account_name: "A".to_string(),
            account_file: dir.path().join("account"),
            log_file: dir.path().join("log.txt"),
            auth_key: "k".to_string(),
            crash_before_vote: false,
            crash_after_vote: false,
        };
        let tid = TxId::new();
        {
            let p = Participant::load(&config).unwrap();
            p.set_balance(200).unwrap();
            p.prepare(tid, TxType::Transfer100).unwrap();
        }
        let reloaded = Participant::load(&config).unwrap();
        match reloaded.commit(tid).unwrap() {
            Response::CommitResult(CommitOutcome::Applied) => {}
            other => panic!("expected Applied after reload, got {:?}", other),
        }
        match reloaded.get_balance().unwrap() {
            Response::Balance(b) => assert_eq!(b, 100),
            other => panic!("expected Balance, got {:?}", other),
        }
    }
}
