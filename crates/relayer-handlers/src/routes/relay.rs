use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use pothole_relayer_handler_utils::ForwardRequest;
use pothole_relayer_tx_relay::RelayOrchestrator;

/// Request body of the relay endpoint.
#[derive(Debug, Deserialize)]
pub struct RelayTxPayload {
    /// The signed forward request to relay.
    #[serde(default)]
    pub request: Option<ForwardRequest>,
}

/// Response body when the meta-transaction was mined.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayTxSuccessResponse {
    /// Always `true`.
    pub success: bool,
    /// Hash of the mined forwarder transaction.
    pub tx_hash: String,
    /// Human-readable outcome.
    pub message: String,
}

/// Response body when nothing was submitted or confirmed on-chain.
#[derive(Debug, Serialize)]
pub struct RelayTxFailureResponse {
    /// Always `false`.
    pub success: bool,
    /// The rejection reason.
    pub error: String,
}

/// Response of the relay endpoint.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RelayTxResponse {
    /// The meta-transaction was mined.
    Success(RelayTxSuccessResponse),
    /// The request was rejected; nothing reached the chain.
    Failure(RelayTxFailureResponse),
}

fn failure(
    status: StatusCode,
    error: impl Into<String>,
) -> (StatusCode, Json<RelayTxResponse>) {
    (
        status,
        Json(RelayTxResponse::Failure(RelayTxFailureResponse {
            success: false,
            error: error.into(),
        })),
    )
}

/// Handles a meta-transaction relay request.
///
/// Returns a `RelayTxResponse` with the terminal state of the relay
/// pipeline; every policy rejection maps to a 400 with the reason in the
/// body.
///
/// # Arguments
///
/// * `ctx` - The relay orchestrator held as shared state
/// * `payload` - The `{ request: ForwardRequest }` JSON body
pub async fn handle_relay_tx(
    State(ctx): State<Arc<RelayOrchestrator>>,
    payload: Result<Json<RelayTxPayload>, JsonRejection>,
) -> (StatusCode, Json<RelayTxResponse>) {
    let request = match payload {
        Ok(Json(RelayTxPayload {
            request: Some(request),
        })) => request,
        Ok(Json(RelayTxPayload { request: None })) => {
            tracing::debug!("relay payload without a request object");
            return failure(StatusCode::BAD_REQUEST, "Invalid request format");
        }
        Err(rejection) => {
            tracing::debug!(%rejection, "undeserializable relay payload");
            return failure(StatusCode::BAD_REQUEST, "Invalid request format");
        }
    };
    tracing::debug!(?request, "Received relay request");

    match ctx.relay(request).await {
        Ok(tx_hash) => (
            StatusCode::OK,
            Json(RelayTxResponse::Success(RelayTxSuccessResponse {
                success: true,
                tx_hash: format!("{tx_hash:?}"),
                message: "Meta-transaction executed successfully".to_string(),
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "relay request rejected");
            failure(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}
