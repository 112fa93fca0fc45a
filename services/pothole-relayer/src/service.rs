// Copyright 2022 Webb Technologies Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Relayer Service Module
//!
//! Builds the chain gateway out of the validated configuration, wires the
//! relay orchestrator into the HTTP routes and serves them.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use pothole_relayer_context::RelayerContext;
use pothole_relayer_gateway::EvmGateway;
use pothole_relayer_handlers::routes::{
    handle_health, handle_relay_tx, handle_relayer_nonce,
    handle_relayer_status,
};
use pothole_relayer_tx_relay::RelayOrchestrator;

/// Sets up the HTTP server for the relayer, routing (endpoint queries /
/// requests mapped to handler code) so clients can interact with the
/// relayer. Serves until the process shuts down.
///
/// # Arguments
///
/// * `ctx` - RelayerContext that holds the validated configuration
pub async fn build_web_services(
    ctx: RelayerContext,
) -> pothole_relayer_utils::Result<()> {
    let provider = ctx.evm_provider()?;
    let wallet = ctx.evm_wallet()?;
    let forwarder_address = ctx
        .config
        .forwarder_address
        .ok_or(pothole_relayer_utils::Error::MissingForwarderAddress)?;
    let gateway = EvmGateway::new(
        provider,
        wallet,
        forwarder_address,
        ctx.config.gas_limit,
    );
    let orchestrator = Arc::new(RelayOrchestrator::new(Arc::new(gateway)));

    let cors = match ctx.config.allowed_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        // development only; postloading already warned about this
        None => CorsLayer::permissive(),
    };

    let api = Router::new()
        .route("/relay", post(handle_relay_tx))
        .route("/relay/nonce", get(handle_relayer_nonce))
        .route("/relay/status", get(handle_relayer_status))
        .with_state(orchestrator);

    let app = Router::new()
        .nest("/api", api)
        .route("/health", get(handle_health))
        .layer(cors);

    let socket_addr = SocketAddr::new([0, 0, 0, 0].into(), ctx.config.port);
    tracing::info!("Starting the relay server on {}", socket_addr);
    let mut shutdown_signal = ctx.shutdown_signal();
    axum::Server::bind(&socket_addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async move { shutdown_signal.recv().await })
        .await?;
    Ok(())
}
