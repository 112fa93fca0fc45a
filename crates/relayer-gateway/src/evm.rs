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

use std::sync::Arc;
use std::time::Duration;

use ethers::middleware::{Middleware, SignerMiddleware};
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TxHash, U256};

use pothole_relayer_handler_utils::CheckedForwardRequest;
use pothole_relayer_utils::{probe, Error, Result};

use crate::contract::ForwarderContract;
use crate::{ForwarderGateway, VerificationOutcome};

/// The client type the relayer signs and submits transactions with.
pub type RelayerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// [`ForwarderGateway`] implementation over a JSON-RPC connection to an EVM
/// node.
///
/// Owns the provider connection and the relayer wallet; all network traffic
/// of the relayer flows through this one value.
pub struct EvmGateway {
    client: Arc<RelayerClient>,
    contract: ForwarderContract<RelayerClient>,
    relayer_address: Address,
    chain_id: u64,
    gas_limit: U256,
}

impl EvmGateway {
    /// Creates a new gateway from an already-configured provider and wallet.
    ///
    /// The wallet must carry the chain id it is meant to sign for.
    pub fn new(
        provider: Provider<Http>,
        wallet: LocalWallet,
        forwarder_address: Address,
        gas_limit: u64,
    ) -> Self {
        let relayer_address = wallet.address();
        let chain_id = wallet.chain_id();
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let contract = ForwarderContract::new(forwarder_address, client.clone());
        Self {
            client,
            contract,
            relayer_address,
            chain_id,
            gas_limit: gas_limit.into(),
        }
    }
}

#[async_trait::async_trait]
impl ForwarderGateway for EvmGateway {
    fn relayer_address(&self) -> Address {
        self.relayer_address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn forwarder_address(&self) -> Address {
        self.contract.address()
    }

    async fn nonce_of(&self, signer: Address) -> Result<U256> {
        let nonce = self.contract.nonces(signer).call().await?;
        Ok(nonce)
    }

    async fn balance(&self) -> Result<U256> {
        let balance = self
            .client
            .inner()
            .get_balance(self.relayer_address, None)
            .await?;
        Ok(balance)
    }

    async fn verify_signature(
        &self,
        request: &CheckedForwardRequest,
    ) -> VerificationOutcome {
        match self.contract.verify(request.into()).call().await {
            Ok(true) => VerificationOutcome::Valid,
            Ok(false) => VerificationOutcome::Invalid,
            // Fail closed: a verification error is indistinguishable from an
            // invalid signature as far as the relay pipeline is concerned.
            Err(e) => VerificationOutcome::TransportError(e.to_string()),
        }
    }

    async fn execute(
        &self,
        request: &CheckedForwardRequest,
    ) -> Result<TxHash> {
        let mut call =
            self.contract.execute(request.into()).gas(self.gas_limit);
        if !request.value.is_zero() {
            call = call.value(request.value);
        }
        let pending = call.send().await?;
        let tx_hash = *pending;
        tracing::event!(
            target: probe::TARGET,
            tracing::Level::DEBUG,
            kind = %probe::Kind::MetaTx,
            chain_id = %self.chain_id,
            pending = true,
            %tx_hash,
        );
        let receipt = pending
            .interval(Duration::from_millis(1000))
            .await?
            .ok_or(Error::TxDropped)?;
        if receipt.status == Some(0u64.into()) {
            return Err(Error::ExecutionReverted {
                tx_hash: receipt.transaction_hash,
            });
        }
        tracing::event!(
            target: probe::TARGET,
            tracing::Level::DEBUG,
            kind = %probe::Kind::MetaTx,
            chain_id = %self.chain_id,
            finalized = true,
            tx_hash = %receipt.transaction_hash,
        );
        Ok(receipt.transaction_hash)
    }
}
