//! Drives the 2PC happy-path scenario against a running coordinator: initialize
//! balances, transfer 100, apply a 20% bonus, print the resulting balances. Narrowed to
//! this one fixed scenario; a general driver CLI is out of scope.
//!
//!     cargo run --example run_2pc_demo -- 127.0.0.1:8000 peekaboo 200 300

use std::env;
use std::time::Duration;

use paxos2pc::rpc::types::{Operation, Response};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("usage: run_2pc_demo <coordinator-addr> <auth-key> <initial-a> <initial-b>");
        std::process::exit(1);
    }

    let addr = args[1].parse().expect("invalid socket address");
    let auth_key = &args[2];
    let a: i64 = args[3].parse().expect("initial-a must be an integer");
    let b: i64 = args[4].parse().expect("initial-b must be an integer");
    let timeout = Duration::from_secs(5);

    call(addr, auth_key, timeout, Operation::InitializeBalances { a, b });

    let transfer_ok = matches!(
        call(addr, auth_key, timeout, Operation::RunTransfer100),
        Some(Response::Decision(true))
    );
    println!("run_transfer_100 -> {transfer_ok}");

    let bonus_ok = matches!(
        call(addr, auth_key, timeout, Operation::RunBonus20Percent),
        Some(Response::Decision(true))
    );
    println!("run_bonus_20_percent -> {bonus_ok}");

    match call(addr, auth_key, timeout, Operation::GetBalances) {
        Some(Response::Balances { a, b }) => println!("final balances: A={a}, B={b}"),
        other => println!("unexpected response: {:?}", other),
    }
}

fn call(
    addr: std::net::SocketAddr,
    auth_key: &str,
    timeout: Duration,
    op: Operation,
) -> Option<Response> {
    match paxos2pc::rpc::client::call(addr, auth_key, timeout, &op) {
        Ok(resp) => Some(resp),
        Err(e) => {
            eprintln!("RPC failed: {e}");
            None
        }
    }
}
