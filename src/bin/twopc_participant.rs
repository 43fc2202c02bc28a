//! Starts one 2PC participant (resource manager for a single account).
//!
//!     RUST_LOG=info twopc_participant <config-file>

use std::env;
use std::process;
use std::sync::Arc;

use log::{error, info};

use paxos2pc::config::load_participant_config;
use paxos2pc::rpc::RpcServer;
use paxos2pc::twopc::Participant;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: twopc_participant <config-file>");
        process::exit(1);
    }

    let config = match load_participant_config(&args[1]) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load config {}: {}", args[1], e);
            process::exit(1);
        }
    };

    let listen_addr = config.listen_addr;
    let auth_key = config.auth_key.clone();
    let account_name = config.account_name.clone();

    let participant = match Participant::load(&config) {
        Ok(p) => p,
        Err(e) => {
            error!("failed to start participant: {}", e);
            process::exit(1);
        }
    };
    let participant = Arc::new(participant);

    info!(
        "starting 2PC participant for account {} on {}",
        account_name, listen_addr
    );

    let server = match RpcServer::bind(listen_addr, auth_key, move |op| participant.dispatch(op)) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to bind {}: {}", listen_addr, e);
            process::exit(1);
        }
    };
    server.run();
}
