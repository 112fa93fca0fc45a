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

use std::sync::atomic::{AtomicUsize, Ordering};

use ethers::types::{Address, TxHash, U256};
use typed_builder::TypedBuilder;

use pothole_relayer_handler_utils::CheckedForwardRequest;
use pothole_relayer_utils::{Error, Result};

use crate::{ForwarderGateway, VerificationOutcome};

/// A canned-response [`ForwarderGateway`] that counts its calls.
///
/// Everything has a sensible default: a funded relayer, a valid signature
/// and a successful execution; individual tests override the piece they are
/// exercising. The call counters let tests assert that a rejected request
/// never reached the later pipeline stages.
#[derive(Debug, TypedBuilder)]
pub struct MockGateway {
    #[builder(default = Address::repeat_byte(0xaa))]
    relayer_address: Address,
    #[builder(default = 31337)]
    chain_id: u64,
    #[builder(default = Address::repeat_byte(0xfd))]
    forwarder_address: Address,
    #[builder(default = U256::zero(), setter(into))]
    nonce: U256,
    /// Relayer balance in wei; defaults to one ether.
    #[builder(default = U256::exp10(18), setter(into))]
    balance: U256,
    #[builder(default = VerificationOutcome::Valid)]
    verification: VerificationOutcome,
    #[builder(default = Ok(TxHash::repeat_byte(0x42)))]
    execute_outcome: std::result::Result<TxHash, String>,
    #[builder(default)]
    nonce_calls: AtomicUsize,
    #[builder(default)]
    balance_calls: AtomicUsize,
    #[builder(default)]
    verify_calls: AtomicUsize,
    #[builder(default)]
    execute_calls: AtomicUsize,
}

impl MockGateway {
    /// How many times `nonce_of` was called.
    pub fn nonce_calls(&self) -> usize {
        self.nonce_calls.load(Ordering::SeqCst)
    }

    /// How many times `balance` was called.
    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    /// How many times `verify_signature` was called.
    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    /// How many times `execute` was called.
    pub fn execute_calls(&self) -> usize {
        self.execute_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ForwarderGateway for MockGateway {
    fn relayer_address(&self) -> Address {
        self.relayer_address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn forwarder_address(&self) -> Address {
        self.forwarder_address
    }

    async fn nonce_of(&self, _signer: Address) -> Result<U256> {
        self.nonce_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.nonce)
    }

    async fn balance(&self) -> Result<U256> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.balance)
    }

    async fn verify_signature(
        &self,
        _request: &CheckedForwardRequest,
    ) -> VerificationOutcome {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verification.clone()
    }

    async fn execute(
        &self,
        _request: &CheckedForwardRequest,
    ) -> Result<TxHash> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        match &self.execute_outcome {
            Ok(tx_hash) => Ok(*tx_hash),
            Err(reason) => Err(Error::Gateway(reason.clone())),
        }
    }
}
