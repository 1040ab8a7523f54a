//! Kanon CLI: command-line client for a Kanon trust registry node.
//!
//! Subcommands: register-did, get-did, register-schema, approve-issuer,
//! remove-issuer, get-schema, register-cred-def, get-cred-def, issue,
//! revoke, get-credential, status.

mod client;
mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Kanon: trust registry for DIDs, schemas, credential definitions and revocation.
#[derive(Parser, Debug)]
#[command(name = "kanon", version, about, long_about = None)]
struct Cli {
    /// Log level for the client itself.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a DID with its context and metadata.
    RegisterDid(commands::did::RegisterDidArgs),
    /// Look up a DID.
    GetDid(commands::did::GetDidArgs),
    /// Register a credential schema.
    RegisterSchema(commands::schema::RegisterSchemaArgs),
    /// Approve an issuer address for a schema.
    ApproveIssuer(commands::schema::IssuerArgs),
    /// Withdraw an issuer's approval for a schema.
    RemoveIssuer(commands::schema::IssuerArgs),
    /// Look up a schema and its approved issuers.
    GetSchema(commands::schema::GetSchemaArgs),
    /// Bind an issuer to a schema as a credential definition.
    RegisterCredDef(commands::cred_def::RegisterCredDefArgs),
    /// Look up a credential definition.
    GetCredDef(commands::cred_def::GetCredDefArgs),
    /// Record an issued credential.
    Issue(commands::credential::IssueArgs),
    /// Revoke a credential.
    Revoke(commands::credential::RevokeArgs),
    /// Look up a credential and its revocation state.
    GetCredential(commands::credential::GetCredentialArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::RegisterDid(args) => commands::did::register(args).await,
        Commands::GetDid(args) => commands::did::get(args).await,
        Commands::RegisterSchema(args) => commands::schema::register(args).await,
        Commands::ApproveIssuer(args) => commands::schema::approve_issuer(args).await,
        Commands::RemoveIssuer(args) => commands::schema::remove_issuer(args).await,
        Commands::GetSchema(args) => commands::schema::get(args).await,
        Commands::RegisterCredDef(args) => commands::cred_def::register(args).await,
        Commands::GetCredDef(args) => commands::cred_def::get(args).await,
        Commands::Issue(args) => commands::credential::issue(args).await,
        Commands::Revoke(args) => commands::credential::revoke(args).await,
        Commands::GetCredential(args) => commands::credential::get(args).await,
        Commands::Status(args) => commands::status::run(args).await,
    }
}
