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

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ethereum_types::H256;
use ethers::core::k256;

/// A module used for debugging relayer lifecycle and relay milestones.
pub mod probe;

/// Concrete client type the relayer signs and submits transactions with.
type SignerClient = ethers::middleware::SignerMiddleware<
    ethers::providers::Provider<ethers::providers::Http>,
    ethers::signers::Wallet<k256::ecdsa::SigningKey>,
>;

/// An enum of all possible errors that could be encountered during the
/// execution of the relayer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// JSON Error occurred.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Config loading error.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Error while parsing the config files.
    #[error("Config parse error: {}", _0)]
    ParseConfig(#[from] serde_path_to_error::Error<config::ConfigError>),
    /// Error while iterating over a glob pattern.
    #[error(transparent)]
    GlobPattern(#[from] glob::PatternError),
    /// Error from Glob Iterator.
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
    /// Error while parsing a URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// Error in the underlying Http server.
    #[error(transparent)]
    Hyper(#[from] hyper::Error),
    /// Invalid CORS origin header value.
    #[error(transparent)]
    InvalidHeaderValue(#[from] axum::http::header::InvalidHeaderValue),
    /// Elliptic Curve error.
    #[error(transparent)]
    EllipticCurve(#[from] k256::elliptic_curve::Error),
    /// Error in Http Provider (ethers client).
    #[error(transparent)]
    EthersProvider(#[from] ethers::providers::ProviderError),
    /// Smart contract call error.
    #[error(transparent)]
    EthersContractCallWithSigner(
        #[from] ethers::contract::ContractError<SignerClient>,
    ),
    /// Ethers currency conversion error.
    #[error(transparent)]
    Conversion(#[from] ethers::utils::ConversionError),
    /// Generic error.
    #[error("{}", _0)]
    Generic(&'static str),
    /// An error reported by the chain gateway.
    #[error("{}", _0)]
    Gateway(String),
    /// Missing required private-key in the config.
    #[error("Missing required private-key in the config")]
    MissingSecrets,
    /// Missing required forwarder contract address in the config.
    #[error("Missing required forwarder-address in the config")]
    MissingForwarderAddress,
    /// The submitted transaction never made it into a block.
    #[error("Transaction dropped from the mempool")]
    TxDropped,
    /// The forwarder's execute entry point reverted on-chain.
    #[error("Meta-transaction reverted on-chain: {:?}", tx_hash)]
    ExecutionReverted {
        /// Hash of the reverted transaction.
        tx_hash: H256,
    },
}

/// A type alias for the result used across the relayer crates.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for HandlerError {
    fn from(value: Error) -> Self {
        HandlerError(StatusCode::INTERNAL_SERVER_ERROR, value.to_string())
    }
}

/// Error type for HTTP handlers.
///
/// Renders as a JSON body of the form `{ "error": <message> }` with the given
/// status code, which is the failure shape of every read endpoint.
pub struct HandlerError(
    /// HTTP status code for response
    pub StatusCode,
    /// Response message
    pub String,
);

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.1 });
        (self.0, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_error_renders_json_error_body() {
        let response =
            HandlerError(StatusCode::BAD_REQUEST, "Missing address parameter".into())
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
