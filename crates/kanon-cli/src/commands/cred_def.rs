//! `kanon register-cred-def` / `kanon get-cred-def`.

use clap::Args;

use kanon_registry::{Call, CredDefView};

use crate::client::{print_receipt, NodeArgs};

#[derive(Args, Debug)]
pub struct RegisterCredDefArgs {
    /// Credential definition identifier.
    pub cred_def_id: String,

    /// Schema the definition is bound to.
    #[arg(short, long)]
    pub schema: String,

    /// Issuer address.
    #[arg(short, long)]
    pub issuer: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

#[derive(Args, Debug)]
pub struct GetCredDefArgs {
    /// Credential definition identifier.
    pub cred_def_id: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

pub async fn register(args: &RegisterCredDefArgs) -> anyhow::Result<()> {
    let call = Call::RegisterCredentialDefinition {
        cred_def_id: args.cred_def_id.clone(),
        schema_id: args.schema.clone(),
        issuer_address: args.issuer.clone(),
    };
    print_receipt(&args.node.submit(&call).await?);
    Ok(())
}

pub async fn get(args: &GetCredDefArgs) -> anyhow::Result<()> {
    let CredDefView(schema_id, issuer) = args.node.get(&["cred-defs", &args.cred_def_id]).await?;
    if schema_id.is_empty() {
        println!("Credential definition {} is not registered", args.cred_def_id);
        return Ok(());
    }
    println!("Credential definition: {}", args.cred_def_id);
    println!("  Schema: {}", schema_id);
    println!("  Issuer: {}", issuer);
    Ok(())
}
