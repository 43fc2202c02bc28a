//! Append-only, newline-delimited, timestamped event log shared by the 2PC coordinator
//! and both participants.
//!
//! This is the durable protocol record of coordinator/participant decisions, kept
//! deliberately separate from the `log` crate facade used for operator-facing
//! diagnostics (see each component's `info!`/`warn!` calls): one is for a human tailing
//! stderr, the other is the on-disk history.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;

pub struct TxLog {
    tag: &'static str,
    file: Mutex<std::fs::File>,
}

impl TxLog {
    /// `tag` is the component tag written on every line, e.g. `"COORD"`, `"A"`, `"B"`.
    pub fn open(path: &Path, tag: &'static str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(TxLog {
            tag,
            file: Mutex::new(file),
        })
    }

    pub fn append(&self, msg: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] [{}] {}", timestamp, self.tag, msg);
        println!("{}", line);

        let mut file = self.file.lock().unwrap();
        if let Err(e) = writeln!(file, "{}", line) {
            log::warn!("failed to append to transaction log: {}", e);
        }
    }
}
