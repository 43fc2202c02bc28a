use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use paxos2pc::config::{PaxosNodeConfig, TwoPcCoordinatorConfig, TwoPcParticipantConfig};
use paxos2pc::paxos::PaxosNode;
use paxos2pc::twopc::{Coordinator, Participant};

pub const AUTH_KEY: &str = "peekaboo";

pub fn reserve_addrs(n: usize) -> Vec<SocketAddr> {
    (0..n)
        .map(|_| {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        })
        .collect()
}

/// Starts a 3-node Paxos cluster in-process, each acceptor's durable state under its own
/// temp-dir file. Returns the cluster addresses and a guard keeping the temp dir alive.
pub fn start_paxos_cluster(dir: &tempfile::TempDir) -> Vec<SocketAddr> {
    start_paxos_cluster_with_down_nodes(dir, &[])
}

/// Like [`start_paxos_cluster`], but the given node indices are left unbound: their
/// addresses are reserved (so every node's `cluster` list still names them) but no
/// `PaxosNode` ever listens there, simulating a down peer.
pub fn start_paxos_cluster_with_down_nodes(
    dir: &tempfile::TempDir,
    down_indices: &[usize],
) -> Vec<SocketAddr> {
    let cluster = reserve_addrs(3);
    for (index, addr) in cluster.iter().enumerate() {
        if down_indices.contains(&index) {
            continue;
        }
        let config = PaxosNodeConfig {
            node_id: index + 1,
            node_index: index,
            cluster: cluster.clone(),
            auth_key: AUTH_KEY.to_string(),
            listen_addr: *addr,
            replica_file: dir.path().join(format!("replica_{}", index + 1)),
            peer_timeout_ms: 500,
        };
        let node = PaxosNode::start(config).unwrap();
        node.bind_background().unwrap();
    }
    std::thread::sleep(Duration::from_millis(50));
    cluster
}

pub struct TwoPcCluster {
    pub coordinator: SocketAddr,
    pub participant_a: SocketAddr,
    pub participant_b: SocketAddr,
}

pub fn start_twopc_cluster(
    dir: &tempfile::TempDir,
    crash_before_vote_b: bool,
    crash_after_vote_b: bool,
) -> TwoPcCluster {
    let addrs = reserve_addrs(3);
    let coordinator_addr = addrs[0];
    let participant_a_addr = addrs[1];
    let participant_b_addr = addrs[2];

    let config_a = TwoPcParticipantConfig {
        listen_addr: participant_a_addr,
        account_name: "A".to_string(),
        account_file: dir.path().join("account_a"),
        log_file: dir.path().join("log_a.txt"),
        auth_key: AUTH_KEY.to_string(),
        crash_before_vote: false,
        crash_after_vote: false,
    };
    let config_b = TwoPcParticipantConfig {
        listen_addr: participant_b_addr,
        account_name: "B".to_string(),
        account_file: dir.path().join("account_b"),
        log_file: dir.path().join("log_b.txt"),
        auth_key: AUTH_KEY.to_string(),
        crash_before_vote: crash_before_vote_b,
        crash_after_vote: crash_after_vote_b,
    };

    let participant_a = Participant::load(&config_a).unwrap();
    bind_participant(participant_a, participant_a_addr);
    let participant_b = Participant::load(&config_b).unwrap();
    bind_participant(participant_b, participant_b_addr);

    let coordinator_config = TwoPcCoordinatorConfig {
        listen_addr: coordinator_addr,
        participant_a: participant_a_addr,
        participant_b: participant_b_addr,
        auth_key: AUTH_KEY.to_string(),
        log_file: dir.path().join("log_coord.txt"),
        peer_timeout_ms: 200,
    };
    let coordinator = Coordinator::load(&coordinator_config).unwrap();
    bind_coordinator(coordinator, coordinator_addr);

    std::thread::sleep(Duration::from_millis(50));

    TwoPcCluster {
        coordinator: coordinator_addr,
        participant_a: participant_a_addr,
        participant_b: participant_b_addr,
    }
}

fn bind_participant(participant: Participant, addr: SocketAddr) {
    let participant = std::sync::Arc::new(participant);
    let server =
        paxos2pc::rpc::RpcServer::bind(addr, AUTH_KEY.to_string(), move |op| participant.dispatch(op))
            .unwrap();
    server.serve_background();
}

fn bind_coordinator(coordinator: Coordinator, addr: SocketAddr) {
    let coordinator = std::sync::Arc::new(coordinator);
    let server =
        paxos2pc::rpc::RpcServer::bind(addr, AUTH_KEY.to_string(), move |op| coordinator.dispatch(op))
            .unwrap();
    server.serve_background();
}
