//! `kanon status`: Query the status of a running Kanon node.

use clap::Args;
use serde::Deserialize;

use crate::client::NodeArgs;

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub node: NodeArgs,
}

#[derive(Deserialize)]
struct StatusResponse {
    version: String,
    uptime_secs: u64,
    journal_seq: u64,
    journal_hash: String,
    dids: usize,
    schemas: usize,
    cred_defs: usize,
    credentials: usize,
    revoked: usize,
    reregistration: String,
    authorization: String,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let status: StatusResponse = args.node.get(&["status"]).await?;
    println!("Node Status:");
    println!("  Version:        {}", status.version);
    println!("  Uptime:         {}s", status.uptime_secs);
    println!("  Journal:        seq {} ({})", status.journal_seq, status.journal_hash);
    println!("  DIDs:           {}", status.dids);
    println!("  Schemas:        {}", status.schemas);
    println!("  Cred defs:      {}", status.cred_defs);
    println!(
        "  Credentials:    {} ({} revoked)",
        status.credentials, status.revoked
    );
    println!("  Reregistration: {}", status.reregistration);
    println!("  Authorization:  {}", status.authorization);
    Ok(())
}
