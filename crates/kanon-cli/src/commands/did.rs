//! `kanon register-did` / `kanon get-did`.

use clap::Args;

use kanon_registry::{Call, DidView};

use crate::client::{print_receipt, NodeArgs};

#[derive(Args, Debug)]
pub struct RegisterDidArgs {
    /// The DID to register.
    pub did: String,

    /// DID document context.
    #[arg(long)]
    pub context: String,

    /// DID document metadata.
    #[arg(long)]
    pub metadata: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

impl RegisterDidArgs {
    pub fn to_call(&self) -> Call {
        Call::RegisterDid {
            did: self.did.clone(),
            context: self.context.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct GetDidArgs {
    /// The DID to look up.
    pub did: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

pub async fn register(args: &RegisterDidArgs) -> anyhow::Result<()> {
    let receipt = args.node.submit(&args.to_call()).await?;
    print_receipt(&receipt);
    Ok(())
}

pub async fn get(args: &GetDidArgs) -> anyhow::Result<()> {
    let DidView(context, metadata) = args.node.get(&["dids", &args.did]).await?;
    if context.is_empty() && metadata.is_empty() {
        println!("DID {} is not registered", args.did);
        return Ok(());
    }
    println!("DID:        {}", args.did);
    println!("  Context:  {}", context);
    println!("  Metadata: {}", metadata);
    Ok(())
}
