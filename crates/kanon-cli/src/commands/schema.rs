//! `kanon register-schema`, `approve-issuer`, `remove-issuer`, `get-schema`.

use clap::Args;

use kanon_registry::{Call, SchemaView};

use crate::client::{print_receipt, NodeArgs};

#[derive(Args, Debug)]
pub struct RegisterSchemaArgs {
    /// Schema identifier.
    pub schema_id: String,

    /// Schema details.
    #[arg(short, long)]
    pub details: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

#[derive(Args, Debug)]
pub struct IssuerArgs {
    /// Schema identifier.
    pub schema_id: String,

    /// Issuer address (`0x` followed by 40 hex digits).
    pub issuer_address: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

#[derive(Args, Debug)]
pub struct GetSchemaArgs {
    /// Schema identifier.
    pub schema_id: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

pub async fn register(args: &RegisterSchemaArgs) -> anyhow::Result<()> {
    let call = Call::RegisterSchema {
        schema_id: args.schema_id.clone(),
        details: args.details.clone(),
    };
    print_receipt(&args.node.submit(&call).await?);
    Ok(())
}

pub async fn approve_issuer(args: &IssuerArgs) -> anyhow::Result<()> {
    let call = Call::AddApprovedIssuer {
        schema_id: args.schema_id.clone(),
        issuer_address: args.issuer_address.clone(),
    };
    print_receipt(&args.node.submit(&call).await?);
    Ok(())
}

pub async fn remove_issuer(args: &IssuerArgs) -> anyhow::Result<()> {
    let call = Call::RemoveApprovedIssuer {
        schema_id: args.schema_id.clone(),
        issuer_address: args.issuer_address.clone(),
    };
    print_receipt(&args.node.submit(&call).await?);
    Ok(())
}

pub async fn get(args: &GetSchemaArgs) -> anyhow::Result<()> {
    let SchemaView(details, issuers) = args.node.get(&["schemas", &args.schema_id]).await?;
    println!("Schema:    {}", args.schema_id);
    println!("  Details: {}", if details.is_empty() { "(none)" } else { details.as_str() });
    if issuers.is_empty() {
        println!("  Issuers: (none)");
    } else {
        for issuer in &issuers {
            println!("  Issuer:  {}", issuer);
        }
    }
    Ok(())
}
