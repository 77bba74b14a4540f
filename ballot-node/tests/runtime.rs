use std::{fs, path::Path, time::Duration};

use ballot_common::Proposal;
use ballot_consensus::ProposerPhase;
use ballot_node::{build_runtime, NodeConfig};

fn config(dir: &Path, hosts: &str, name: &str, listen_addr: &str, port: u16) -> NodeConfig {
    let hosts_path = dir.join("hostsfile.txt");
    fs::write(&hosts_path, hosts).unwrap();
    NodeConfig {
        hosts_path,
        listen_addr: listen_addr.to_string(),
        port,
        startup_grace_secs: 0,
        value: Some('x'),
        name: Some(name.to_string()),
        ..NodeConfig::default()
    }
}

#[tokio::test]
async fn test_single_process_cluster_decides() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(
        dir.path(),
        "127.0.0.1:proposer1,acceptor1,learner1\n",
        "127.0.0.1",
        "127.0.0.1",
        0,
    );

    let runtime = build_runtime(&config).await.unwrap();
    let decided = runtime.proposal_driver(&config).run().await.unwrap();

    let expected = Proposal::new(1, 'x', "127.0.0.1");
    assert_eq!(decided, Some(expected.clone()));
    assert_eq!(runtime.engine.learned().await, vec![expected]);
    runtime.shutdown();
}

#[tokio::test]
async fn test_non_proposer_does_not_propose() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), "127.0.0.1:acceptor1\n", "127.0.0.1", "127.0.0.1", 0);

    let runtime = build_runtime(&config).await.unwrap();
    assert_eq!(runtime.proposal_driver(&config).run().await.unwrap(), None);
    runtime.shutdown();
}

#[tokio::test]
async fn test_proposer_without_value_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), "127.0.0.1:proposer1\n", "127.0.0.1", "127.0.0.1", 0);
    config.value = None;

    let runtime = build_runtime(&config).await.unwrap();
    assert!(runtime.proposal_driver(&config).run().await.is_err());
    runtime.shutdown();
}

#[tokio::test]
async fn test_missing_registry_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), "", "127.0.0.1", "127.0.0.1", 0);
    config.hosts_path = dir.path().join("absent.txt");

    assert!(build_runtime(&config).await.is_err());
}

#[tokio::test]
async fn test_round_over_tcp() {
    // Two loopback addresses share one port, as two hosts would.
    let probe = tokio::net::TcpListener::bind("127.0.0.2:0").await.unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);

    let hosts = "127.0.0.2:proposer1,learner1\n127.0.0.1:acceptor1\n";
    let proposer_dir = tempfile::tempdir().unwrap();
    let acceptor_dir = tempfile::tempdir().unwrap();
    let proposer_cfg = config(proposer_dir.path(), hosts, "127.0.0.2", "127.0.0.2", port);
    let acceptor_cfg = config(acceptor_dir.path(), hosts, "127.0.0.1", "127.0.0.1", port);

    let proposer = build_runtime(&proposer_cfg).await.unwrap();
    let acceptor = build_runtime(&acceptor_cfg).await.unwrap();

    let sent = proposer.proposal_driver(&proposer_cfg).run().await.unwrap().unwrap();
    assert_eq!(sent, Proposal::new(1, 'x', "127.0.0.2"));

    let learned = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let learned = proposer.engine.learned().await;
            if !learned.is_empty() {
                return learned;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("no decision over TCP");

    assert_eq!(learned, vec![sent.clone()]);
    assert_eq!(acceptor.engine.accepted().await, Some(sent));
    assert_eq!(proposer.engine.proposer_phase().await, Some(ProposerPhase::Decided));

    proposer.shutdown();
    acceptor.shutdown();
}
