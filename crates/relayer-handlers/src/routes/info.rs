use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use ethers::types::Address;
use ethers::utils::{format_units, to_checksum};
use serde::{Deserialize, Serialize};

use pothole_relayer_tx_relay::RelayOrchestrator;
use pothole_relayer_utils::HandlerError;

/// Query parameters of the nonce endpoint.
#[derive(Debug, Deserialize)]
pub struct NonceQuery {
    /// The signer address to read the forwarder nonce for.
    pub address: Option<String>,
}

/// Response of the nonce endpoint.
#[derive(Debug, Serialize)]
pub struct NonceResponse {
    /// The signer's current forwarder nonce, as a decimal string.
    pub nonce: String,
}

/// Handles a per-signer forwarder nonce request.
///
/// A pure pass-through of the gateway's nonce read, stringified and with no
/// transformation. Clients use it to build the nonce into the request they
/// are about to sign.
///
/// # Arguments
///
/// * `ctx` - The relay orchestrator held as shared state
/// * `query` - The `?address=<addr>` query parameter
pub async fn handle_relayer_nonce(
    State(ctx): State<Arc<RelayOrchestrator>>,
    Query(query): Query<NonceQuery>,
) -> Result<Json<NonceResponse>, HandlerError> {
    let address = query.address.ok_or(HandlerError(
        StatusCode::BAD_REQUEST,
        "Missing address parameter".to_string(),
    ))?;
    let address: Address = address.parse().map_err(|e| {
        tracing::debug!(error = %e, "unparseable nonce address");
        HandlerError(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get nonce".to_string(),
        )
    })?;
    let nonce = ctx.nonce_of(address).await.map_err(|e| {
        tracing::error!(error = %e, "failed to read forwarder nonce");
        HandlerError(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get nonce".to_string(),
        )
    })?;
    Ok(Json(NonceResponse {
        nonce: nonce.to_string(),
    }))
}

/// Response of the status endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayerStatusResponse {
    /// The relayer account address.
    pub relayer_address: String,
    /// The relayer account balance, formatted as `"<decimal> ETH"`.
    pub balance: String,
    /// The configured chain id.
    pub chain_id: u64,
    /// The configured forwarder contract address.
    pub forwarder_address: String,
    /// A static "active" marker.
    pub status: String,
}

/// Handles a relayer status request.
///
/// Returns a snapshot of the relayer identity and funds; only the balance
/// may legitimately differ between two consecutive calls.
///
/// # Arguments
///
/// * `ctx` - The relay orchestrator held as shared state
pub async fn handle_relayer_status(
    State(ctx): State<Arc<RelayOrchestrator>>,
) -> Result<Json<RelayerStatusResponse>, HandlerError> {
    let failed = |e: &dyn std::fmt::Display| {
        tracing::error!(error = %e, "failed to assemble relayer status");
        HandlerError(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get status".to_string(),
        )
    };
    let info = ctx.status().await.map_err(|e| failed(&e))?;
    let balance = format_units(info.balance, "ether")
        .map_err(|e| failed(&e))?;
    Ok(Json(RelayerStatusResponse {
        relayer_address: to_checksum(&info.relayer_address, None),
        balance: format!("{balance} ETH"),
        chain_id: info.chain_id,
        forwarder_address: to_checksum(&info.forwarder_address, None),
        status: "active".to_string(),
    }))
}
