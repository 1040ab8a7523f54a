//! The Kanon node orchestrator.
//!
//! Opens the ledger, spawns the HTTP API, and runs the single event loop
//! that owns all registry state.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::commands::NodeCommand;
use crate::config::KanonConfig;
use crate::ledger::Ledger;
use crate::state::NodeState;

/// A single Kanon node: one ledger, one writer.
pub struct KanonNode {
    config: KanonConfig,
    /// Present between `start` and `run`.
    ledger: Option<Ledger>,
    node_state: Option<Arc<NodeState>>,
    command_rx: Option<mpsc::Receiver<NodeCommand>>,
}

impl KanonNode {
    pub fn new(config: KanonConfig) -> Self {
        tracing::info!(
            reregistration = %config.registry.reregistration,
            authorization = %config.registry.authorization,
            "Kanon node created"
        );
        Self {
            config,
            ledger: None,
            node_state: None,
            command_rx: None,
        }
    }

    /// Open storage and start the HTTP API.
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("starting Kanon node");

        let ledger = Ledger::open(&self.config.storage.data_dir, self.config.registry)?;
        tracing::info!(path = %self.config.storage.data_dir.display(), "storage initialized");

        let (command_tx, command_rx) = mpsc::channel::<NodeCommand>(self.config.api.queue_capacity);
        let node_state = Arc::new(NodeState::new(command_tx));

        let api_addr: SocketAddr = self.config.api_addr().parse()?;
        let api_state = node_state.clone();
        tokio::spawn(async move {
            if let Err(e) = crate::api::start_api_server(api_addr, api_state).await {
                tracing::error!(error = %e, "HTTP API server error");
            }
        });

        self.ledger = Some(ledger);
        self.node_state = Some(node_state);
        self.command_rx = Some(command_rx);
        Ok(())
    }

    /// Run the ledger event loop until the command channel closes.
    pub async fn run(&mut self) -> Result<()> {
        let ledger = self
            .ledger
            .take()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;
        let command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;

        run_ledger(ledger, command_rx).await;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down Kanon node");

        self.node_state = None;
        self.command_rx = None;
        if let Some(ledger) = self.ledger.take() {
            drop(ledger);
            tracing::info!("storage closed");
        }

        tracing::info!("Kanon node shut down");
        Ok(())
    }

    pub fn config(&self) -> &KanonConfig {
        &self.config
    }
}

/// Serve commands one at a time against `ledger`.
///
/// Each call is executed and, if it writes, committed before the next
/// command is received.
pub async fn run_ledger(mut ledger: Ledger, mut command_rx: mpsc::Receiver<NodeCommand>) {
    tracing::info!(seq = ledger.head().seq, "entering ledger event loop");

    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            NodeCommand::Execute {
                caller,
                call,
                reply,
            } => {
                let result = ledger.submit(&caller, call);
                if reply.send(result).is_err() {
                    tracing::debug!("caller went away before the reply");
                }
            }
            NodeCommand::Status { reply } => {
                let _ = reply.send(ledger.status());
            }
        }
    }

    tracing::info!("command channel closed");
}
