//! End-to-end Paxos scenarios covering single-proposer agreement, concurrent proposers,
//! quorum with a peer down, and acceptor monotonicity.

mod common;

use std::time::Duration;

use paxos2pc::rpc::types::{Operation, Response};

use common::AUTH_KEY;

fn submit(addr: std::net::SocketAddr, value: &str) -> Response {
    paxos2pc::rpc::client::call(
        addr,
        AUTH_KEY,
        Duration::from_secs(2),
        &Operation::SubmitValue {
            value: value.to_string(),
        },
    )
    .expect("SubmitValue RPC failed")
}

fn get_value(addr: std::net::SocketAddr) -> Option<String> {
    match paxos2pc::rpc::client::call(addr, AUTH_KEY, Duration::from_secs(2), &Operation::GetValue)
        .expect("GetValue RPC failed")
    {
        Response::Value(v) => v,
        other => panic!("unexpected response: {:?}", other),
    }
}

/// S1: single proposer, all nodes up. Expect success and agreement across all three.
#[test]
fn s1_single_proposer_all_nodes_up() {
    let dir = tempfile::tempdir().unwrap();
    let cluster = common::start_paxos_cluster(&dir);

    match submit(cluster[0], "hello") {
        Response::SubmitValueResult(diag) => assert!(diag.contains("SUCCEEDED"), "{diag}"),
        other => panic!("unexpected response: {:?}", other),
    }

    for addr in &cluster {
        assert_eq!(get_value(*addr), Some("hello".to_string()));
    }
}

/// S2: two concurrent proposers on different nodes. Exactly one value wins cluster-wide;
/// both proposers report success.
#[test]
fn s2_two_concurrent_proposers_agree_on_one_value() {
    let dir = tempfile::tempdir().unwrap();
    let cluster = common::start_paxos_cluster(&dir);

    let addr_x = cluster[0];
    let addr_y = cluster[1];

    let t1 = std::thread::spawn(move || submit(addr_x, "X"));
    let t2 = std::thread::spawn(move || submit(addr_y, "Y"));

    let r1 = t1.join().unwrap();
    let r2 = t2.join().unwrap();

    for r in [&r1, &r2] {
        match r {
            Response::SubmitValueResult(diag) => assert!(diag.contains("SUCCEEDED"), "{diag}"),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    let values: Vec<_> = cluster.iter().map(|a| get_value(*a)).collect();
    assert!(values[0].is_some());
    assert!(values.windows(2).all(|w| w[0] == w[1]), "{:?}", values);
    let chosen = values[0].clone().unwrap();
    assert!(chosen == "X" || chosen == "Y", "{chosen}");
}

/// S3: one peer unreachable (node 3 never starts listening). A majority of 2-of-3 is
/// still enough to succeed, and the two reachable nodes agree.
#[test]
fn s3_one_peer_unreachable_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let cluster = common::start_paxos_cluster_with_down_nodes(&dir, &[2]);

    match submit(cluster[0], "quorum-is-enough") {
        Response::SubmitValueResult(diag) => assert!(diag.contains("SUCCEEDED"), "{diag}"),
        other => panic!("unexpected response: {:?}", other),
    }

    assert_eq!(get_value(cluster[0]), get_value(cluster[1]));
}

/// Acceptor monotonicity + reject semantics: a prepare with a lower proposal number than
/// one already promised is rejected, even after the acceptor has moved on.
#[test]
fn stale_prepare_is_rejected_after_a_higher_one_was_promised() {
    let dir = tempfile::tempdir().unwrap();
    let cluster = common::start_paxos_cluster(&dir);

    submit(cluster[0], "first"); // advances node 1's proposal_counter/promised_n well past 0

    let stale = paxos2pc::rpc::client::call(
        cluster[0],
        AUTH_KEY,
        Duration::from_secs(2),
        &Operation::Prepare {
            n: paxos2pc::paxos::types::ProposalNumber::new(0, 99),
        },
    )
    .unwrap();
    match stale {
        Response::Reject { .. } => {}
        other => panic!("expected Reject for a stale proposal number, got {:?}", other),
    }
}
