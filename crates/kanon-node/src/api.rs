//! HTTP API server for the Kanon node.
//!
//! Every request becomes a [`NodeCommand`] for the ledger event loop; the
//! handlers never touch registry state directly.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

use kanon_core::Caller;
use kanon_registry::{Call, Outcome};

use crate::commands::{CallFailure, CallReceipt, LedgerStatus, NodeCommand};
use crate::state::NodeState;

/// Header carrying the caller identity attested by the transport.
pub const CALLER_HEADER: &str = "x-kanon-caller";

type ApiError = (StatusCode, Json<CallFailure>);

// --- Response types ---

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub uptime_secs: u64,
    #[serde(flatten)]
    pub ledger: LedgerStatus,
}

/// HTTP status for a failed call, chosen by its error kind.
pub fn status_for_kind(kind: &str) -> StatusCode {
    match kind {
        "did_already_exists"
        | "schema_already_exists"
        | "cred_def_already_exists"
        | "credential_already_exists"
        | "credential_already_revoked" => StatusCode::CONFLICT,
        "schema_not_found" | "credential_definition_not_found" | "credential_not_found" => {
            StatusCode::NOT_FOUND
        }
        "issuer_not_approved" | "unauthorized_caller" => StatusCode::FORBIDDEN,
        "internal" => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn caller_from(headers: &HeaderMap) -> Caller {
    headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Caller::new)
        .unwrap_or_default()
}

fn unavailable(error: &str) -> ApiError {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(CallFailure::internal(error)),
    )
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_status(
    State(state): State<Arc<NodeState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    state
        .command_tx
        .send(NodeCommand::Status { reply: reply_tx })
        .await
        .map_err(|_| unavailable("ledger event loop not running"))?;
    let ledger = reply_rx
        .await
        .map_err(|_| unavailable("ledger dropped the reply channel"))?;

    Ok(Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        ledger,
    }))
}

async fn handle_call(
    State(state): State<Arc<NodeState>>,
    headers: HeaderMap,
    body: Result<Json<Call>, JsonRejection>,
) -> Result<Json<CallReceipt>, ApiError> {
    let Json(call) = body.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(CallFailure {
                kind: "invalid_call".into(),
                error: rejection.body_text(),
            }),
        )
    })?;
    execute(&state, caller_from(&headers), call).await.map(Json)
}

async fn handle_get_did(
    State(state): State<Arc<NodeState>>,
    Path(did): Path<String>,
) -> Result<Json<Outcome>, ApiError> {
    read(&state, Call::GetDid { did }).await
}

async fn handle_get_schema(
    State(state): State<Arc<NodeState>>,
    Path(schema_id): Path<String>,
) -> Result<Json<Outcome>, ApiError> {
    read(&state, Call::GetSchema { schema_id }).await
}

async fn handle_get_cred_def(
    State(state): State<Arc<NodeState>>,
    Path(cred_def_id): Path<String>,
) -> Result<Json<Outcome>, ApiError> {
    read(&state, Call::GetCredentialDefinition { cred_def_id }).await
}

async fn handle_get_credential(
    State(state): State<Arc<NodeState>>,
    Path(cred_id): Path<String>,
) -> Result<Json<Outcome>, ApiError> {
    read(&state, Call::GetCredential { cred_id }).await
}

async fn handle_credential_status(
    State(state): State<Arc<NodeState>>,
    Path(cred_id): Path<String>,
) -> Result<Json<Outcome>, ApiError> {
    read(&state, Call::CredentialStatus { cred_id }).await
}

async fn read(state: &Arc<NodeState>, call: Call) -> Result<Json<Outcome>, ApiError> {
    let receipt = execute(state, Caller::anonymous(), call).await?;
    Ok(Json(receipt.result))
}

/// Send a call to the ledger and await its reply.
async fn execute(
    state: &Arc<NodeState>,
    caller: Caller,
    call: Call,
) -> Result<CallReceipt, ApiError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    let cmd = NodeCommand::Execute {
        caller,
        call,
        reply: reply_tx,
    };

    state
        .command_tx
        .send(cmd)
        .await
        .map_err(|_| unavailable("ledger event loop not running"))?;

    match reply_rx.await {
        Ok(Ok(receipt)) => Ok(receipt),
        Ok(Err(failure)) => Err((status_for_kind(&failure.kind), Json(failure))),
        Err(_) => Err(unavailable("ledger dropped the reply channel")),
    }
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/calls", post(handle_call))
        .route("/api/v1/dids/{did}", get(handle_get_did))
        .route("/api/v1/schemas/{id}", get(handle_get_schema))
        .route("/api/v1/cred-defs/{id}", get(handle_get_cred_def))
        .route("/api/v1/credentials/{id}", get(handle_get_credential))
        .route(
            "/api/v1/credentials/{id}/status",
            get(handle_credential_status),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_api_server(
    listen_addr: SocketAddr,
    state: Arc<NodeState>,
) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
