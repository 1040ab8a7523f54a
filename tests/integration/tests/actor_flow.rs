//! Integration test: concurrent submitters funnel through one ledger event loop.

use std::sync::Arc;

use kanon_core::RegistryConfig;
use kanon_integration_tests::*;
use kanon_node::node::run_ledger;
use kanon_node::state::NodeState;
use kanon_node::Ledger;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_concurrent_submissions_are_serialized() {
    let dir = TempDir::new("kanon-http");
    let ledger = Ledger::open(dir.path(), RegistryConfig::default()).unwrap();
    let (command_tx, command_rx) = mpsc::channel(64);
    let ledger_task = tokio::spawn(run_ledger(ledger, command_rx));
    let state = Arc::new(NodeState::new(command_tx.clone()));

    let mut handles = Vec::new();
    for i in 0..20 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            let (reply, reply_rx) = tokio::sync::oneshot::channel();
            state
                .command_tx
                .send(kanon_node::NodeCommand::Execute {
                    caller: kanon_core::Caller::anonymous(),
                    call: register_did(&format!("did:example:{}", i)),
                    reply,
                })
                .await
                .unwrap();
            reply_rx.await.unwrap().unwrap().seq.unwrap()
        }));
    }

    let mut seqs = Vec::new();
    for handle in handles {
        seqs.push(handle.await.unwrap());
    }
    seqs.sort_unstable();
    assert_eq!(seqs, (1..=20).collect::<Vec<u64>>());

    drop(state);
    drop(command_tx);
    ledger_task.await.unwrap();
}
