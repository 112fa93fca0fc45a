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

#![warn(missing_docs)]

//! # Relayer Configuration Module
//!
//! A module for configuring the relayer.
//!
//! ## Overview
//!
//! The configuration is read once at process start from TOML/JSON files in
//! the config directory, merged with `POTHOLE`-prefixed environment
//! variables. Secrets (the relayer private key, the RPC endpoint) may be
//! written as `$ENV_VAR` references that are resolved during
//! deserialization. Required values are validated eagerly by
//! [`RelayerConfig::verify`] before the HTTP listener binds; non-secret
//! values fall back to local development defaults.

/// CLI configuration
#[cfg(feature = "cli")]
pub mod cli;
/// Utils for processing configuration
pub mod utils;

use ethereum_types::Address;
use pothole_relayer_types::{private_key::PrivateKey, rpc_url::RpcUrl};
use serde::{Deserialize, Serialize};

/// The default port the relayer will listen on.
const fn default_port() -> u16 {
    3000
}
/// Chain id of a local development node.
const fn default_chain_id() -> u64 {
    31337
}
/// Fixed gas ceiling for the outer forwarder transaction.
///
/// This is deliberately a generous constant, independent of the inner-call
/// gas stipend carried by each forward request.
const fn default_gas_limit() -> u64 {
    500_000
}
/// RPC endpoint of a local development node.
fn default_http_endpoint() -> RpcUrl {
    url::Url::parse("http://localhost:8545")
        .expect("valid default rpc url")
        .into()
}

/// RelayerConfig is the configuration for the pothole relayer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RelayerConfig {
    /// HTTP server port number.
    ///
    /// default to 3000
    #[serde(default = "default_port", skip_serializing)]
    pub port: u16,
    /// Http(s) RPC endpoint of the chain node.
    #[serde(default = "default_http_endpoint", skip_serializing)]
    pub http_endpoint: RpcUrl,
    /// Chain specific id (output of chainId opcode on EVM networks).
    #[serde(default = "default_chain_id", rename(serialize = "chainId"))]
    pub chain_id: u64,
    /// Address of the trusted forwarder contract that verifies and executes
    /// signed forward requests.
    #[serde(rename(serialize = "forwarderAddress"))]
    pub forwarder_address: Option<Address>,
    /// The private key of the relayer account paying for forwarded
    /// transactions.
    ///
    /// The format is either a raw `0x`-prefixed hex string or a `$ENV_VAR`
    /// reference to an environment variable holding one.
    #[serde(skip_serializing)]
    pub private_key: Option<PrivateKey>,
    /// Gas ceiling for the outer forwarder transaction.
    #[serde(default = "default_gas_limit", rename(serialize = "gasLimit"))]
    pub gas_limit: u64,
    /// Frontend origin allowed for cross-origin requests.
    ///
    /// When unset, cross-origin access is left permissive, which is only
    /// acceptable for development.
    #[serde(default, rename(serialize = "allowedOrigin"))]
    pub allowed_origin: Option<String>,
}

impl RelayerConfig {
    /// Makes sure that the config is valid by checking that every required
    /// value is present.
    ///
    /// Called before the HTTP listener binds, so that a missing secret is a
    /// descriptive startup error instead of a runtime crash deep inside the
    /// gateway.
    pub fn verify(&self) -> pothole_relayer_utils::Result<()> {
        if self.private_key.is_none() {
            return Err(pothole_relayer_utils::Error::MissingSecrets);
        }
        if self.forwarder_address.is_none() {
            return Err(pothole_relayer_utils::Error::MissingForwarderAddress);
        }
        Ok(())
    }
}
