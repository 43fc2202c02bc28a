//! Starts one Paxos node: acceptor, proposer and learner bound to one RPC listener.
//!
//!     RUST_LOG=info paxos_node <config-file>

use std::env;
use std::process;

use log::{error, info};

use paxos2pc::config::load_paxos_node_config;
use paxos2pc::paxos::PaxosNode;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: paxos_node <config-file>");
        process::exit(1);
    }

    let config = match load_paxos_node_config(&args[1]) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load config {}: {}", args[1], e);
            process::exit(1);
        }
    };

    info!(
        "starting Paxos node {} (index {}) on {}",
        config.node_id, config.node_index, config.listen_addr
    );

    let node = match PaxosNode::start(config) {
        Ok(n) => n,
        Err(e) => {
            error!("failed to start node: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = node.bind_and_run() {
        error!("RPC listener failed: {}", e);
        process::exit(1);
    }
}
