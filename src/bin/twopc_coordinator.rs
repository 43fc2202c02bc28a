//! Starts the 2PC coordinator.
//!
//!     RUST_LOG=info twopc_coordinator <config-file>

use std::env;
use std::process;
use std::sync::Arc;

use log::{error, info};

use paxos2pc::config::load_coordinator_config;
use paxos2pc::rpc::RpcServer;
use paxos2pc::twopc::Coordinator;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: twopc_coordinator <config-file>");
        process::exit(1);
    }

    let config = match load_coordinator_config(&args[1]) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load config {}: {}", args[1], e);
            process::exit(1);
        }
    };

    let listen_addr = config.listen_addr;
    let auth_key = config.auth_key.clone();

    let coordinator = match Coordinator::load(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to start coordinator: {}", e);
            process::exit(1);
        }
    };
    let coordinator = Arc::new(coordinator);

    info!("starting 2PC coordinator on {}", listen_addr);

    let server = match RpcServer::bind(listen_addr, auth_key, move |op| coordinator.dispatch(op)) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to bind {}: {}", listen_addr, e);
            process::exit(1);
        }
    };
    server.run();
}
