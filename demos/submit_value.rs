//! Submits one value to a running Paxos node and prints the diagnostic result. A single
//! fixed-argument call rather than an interactive read-eval loop; an interactive client
//! is out of scope.
//!
//!     cargo run --example submit_value -- 127.0.0.1:17000 peekaboo hello

use std::env;
use std::time::Duration;

use paxos2pc::rpc::types::{Operation, Response};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("usage: submit_value <node-addr> <auth-key> <value>");
        std::process::exit(1);
    }

    let addr = args[1].parse().expect("invalid socket address");
    let auth_key = &args[2];
    let value = args[3].clone();

    let response = paxos2pc::rpc::client::call(
        addr,
        auth_key,
        Duration::from_secs(5),
        &Operation::SubmitValue { value },
    );

    match response {
        Ok(Response::SubmitValueResult(diag)) => println!("{diag}"),
        Ok(other) => println!("unexpected response: {:?}", other),
        Err(e) => {
            eprintln!("SubmitValue failed: {e}");
            std::process::exit(1);
        }
    }
}
