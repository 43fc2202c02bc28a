//! Simulates a full 3-node Paxos cluster locally (on one machine) and submits one value:
//! three `PaxosNode`s, each its own acceptor+proposer+learner, spun up on their own
//! thread bound to an ephemeral loopback address, then driven by one client call.
//!
//!     RUST_LOG=info cargo run --example simulate

use std::net::SocketAddr;
use std::time::Duration;

use paxos2pc::config::PaxosNodeConfig;
use paxos2pc::paxos::PaxosNode;
use paxos2pc::rpc::types::{Operation, Response};

fn main() {
    env_logger::init();

    let dir = tempfile::tempdir().expect("failed to create scratch directory");
    let auth_key = "peekaboo".to_string();

    // Bind all three listeners up front so every node's `cluster` list can name real
    // addresses before any node starts serving.
    let listeners: Vec<_> = (0..3)
        .map(|_| std::net::TcpListener::bind("127.0.0.1:0").expect("failed to reserve a port"))
        .collect();
    let cluster: Vec<SocketAddr> = listeners
        .iter()
        .map(|l| l.local_addr().unwrap())
        .collect();
    drop(listeners); // release the ports; PaxosNode::bind_background rebinds them below

    let mut handles = Vec::new();
    for (index, addr) in cluster.iter().enumerate() {
        let config = PaxosNodeConfig {
            node_id: index + 1,
            node_index: index,
            cluster: cluster.clone(),
            auth_key: auth_key.clone(),
            listen_addr: *addr,
            replica_file: dir.path().join(format!("replica_{}", index + 1)),
            peer_timeout_ms: 500,
        };
        let node = PaxosNode::start(config).expect("failed to start node");
        let (bound, handle) = node.bind_background().expect("failed to bind node");
        println!("node {} listening on {}", index + 1, bound);
        handles.push(handle);
    }

    // Give the listeners a moment to come up before the first RPC.
    std::thread::sleep(Duration::from_millis(100));

    let response = paxos2pc::rpc::client::call(
        cluster[0],
        &auth_key,
        Duration::from_secs(2),
        &Operation::SubmitValue {
            value: "hello".to_string(),
        },
    );
    match response {
        Ok(Response::SubmitValueResult(diag)) => println!("{diag}"),
        Ok(other) => println!("unexpected response: {:?}", other),
        Err(e) => println!("SubmitValue call failed: {e}"),
    }

    for (index, addr) in cluster.iter().enumerate() {
        let value = paxos2pc::rpc::client::call(*addr, &auth_key, Duration::from_secs(2), &Operation::GetValue);
        match value {
            Ok(Response::Value(v)) => println!("node {} get_value -> {:?}", index + 1, v),
            Ok(other) => println!("node {} unexpected response: {:?}", index + 1, other),
            Err(e) => println!("node {} get_value failed: {e}", index + 1),
        }
    }
}
