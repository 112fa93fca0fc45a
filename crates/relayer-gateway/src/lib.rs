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

//! # Chain Gateway Module
//!
//! The gateway is the sole component that talks to the chain node and the
//! sole holder of the relayer private key. Everything above it works against
//! the [`ForwarderGateway`] trait, so the orchestrator can be constructed
//! with the real EVM gateway in production and with [`mocked::MockGateway`]
//! in tests.

use ethers::types::{Address, TxHash, U256};
use pothole_relayer_handler_utils::CheckedForwardRequest;
use pothole_relayer_utils::Result;

mod contract;
mod evm;
/// Mocked gateway for tests.
pub mod mocked;

pub use evm::EvmGateway;

/// Outcome of asking the forwarder contract to verify a request signature.
///
/// A verification that errors out is kept distinct from one that returns
/// `false` for observability, but both are treated as invalid by the
/// relay pipeline: a verification error is never treated as valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The forwarder contract accepted the signature.
    Valid,
    /// The forwarder contract rejected the signature.
    Invalid,
    /// The verification call itself failed before producing an answer.
    TransportError(String),
}

impl VerificationOutcome {
    /// Whether the signature was positively verified.
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid)
    }
}

/// Read and write access to the forwarder contract, bound to the relayer
/// account that pays for forwarded transactions.
#[async_trait::async_trait]
pub trait ForwarderGateway: Send + Sync {
    /// The public address derived from the configured relayer private key.
    ///
    /// Used for status reporting, never for authorization decisions.
    fn relayer_address(&self) -> Address;

    /// The chain id the gateway is configured against.
    fn chain_id(&self) -> u64;

    /// The address of the bound forwarder contract.
    fn forwarder_address(&self) -> Address;

    /// Reads the forwarder contract's per-signer nonce counter.
    ///
    /// Used by clients to build a request's nonce pre-signature; replay
    /// checking itself is the contract's job.
    async fn nonce_of(&self, signer: Address) -> Result<U256>;

    /// Reads the relayer wallet's on-chain balance, in wei.
    async fn balance(&self) -> Result<U256>;

    /// Asks the forwarder contract to verify the request signature.
    ///
    /// The contract is the sole authority on signature correctness; the
    /// relayer never re-implements the signature math.
    async fn verify_signature(
        &self,
        request: &CheckedForwardRequest,
    ) -> VerificationOutcome;

    /// Submits the forwarder's execute entry point with the request tuple
    /// and waits for one confirmation.
    ///
    /// The outer transaction uses the configured fixed gas ceiling, never
    /// the request's advisory `gas` field. Errors on revert, on a dropped
    /// transaction and on transport failure; never retries.
    async fn execute(&self, request: &CheckedForwardRequest)
        -> Result<TxHash>;
}
