//! `kanon issue`, `kanon revoke`, `kanon get-credential`.

use clap::Args;

use kanon_registry::{Call, CredentialView};

use crate::client::{print_receipt, NodeArgs};

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Credential identifier.
    pub cred_id: String,

    /// Credential definition the credential is issued under.
    #[arg(long = "cred-def")]
    pub cred_def_id: String,

    /// Issuer reference stored with the credential.
    #[arg(long)]
    pub issuer: String,

    /// Subject of the credential.
    #[arg(long)]
    pub subject: String,

    #[arg(long, default_value = "")]
    pub issuance_date: String,

    /// Stored only; the registry does not enforce expiry.
    #[arg(long, default_value = "")]
    pub expiry_date: String,

    #[arg(long, default_value = "")]
    pub metadata: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

impl IssueArgs {
    pub fn to_call(&self) -> Call {
        Call::IssueCredential {
            cred_id: self.cred_id.clone(),
            cred_def_id: self.cred_def_id.clone(),
            issuer: self.issuer.clone(),
            subject: self.subject.clone(),
            issuance_date: self.issuance_date.clone(),
            expiry_date: self.expiry_date.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Credential identifier.
    pub cred_id: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

#[derive(Args, Debug)]
pub struct GetCredentialArgs {
    /// Credential identifier.
    pub cred_id: String,

    #[command(flatten)]
    pub node: NodeArgs,
}

pub async fn issue(args: &IssueArgs) -> anyhow::Result<()> {
    print_receipt(&args.node.submit(&args.to_call()).await?);
    Ok(())
}

pub async fn revoke(args: &RevokeArgs) -> anyhow::Result<()> {
    let call = Call::RevokeCredential {
        cred_id: args.cred_id.clone(),
    };
    print_receipt(&args.node.submit(&call).await?);
    Ok(())
}

pub async fn get(args: &GetCredentialArgs) -> anyhow::Result<()> {
    let view: CredentialView = args.node.get(&["credentials", &args.cred_id]).await?;
    if view.cred_def_id.is_empty() {
        println!("Credential {} is not registered", args.cred_id);
        return Ok(());
    }
    println!("Credential: {}", args.cred_id);
    println!("  Definition: {}", view.cred_def_id);
    println!("  Issuer:     {}", view.issuer);
    println!("  Subject:    {}", view.subject);
    println!("  Issued:     {}", view.issuance_date);
    println!("  Expires:    {}", view.expiry_date);
    println!("  Metadata:   {}", view.metadata);
    println!(
        "  Status:     {}",
        if view.revoked { "revoked" } else { "active" }
    );
    Ok(())
}
