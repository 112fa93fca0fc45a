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

//! # Relay Orchestrator Module
//!
//! Sequences the full relay protocol for one forward request:
//! validate → verify signature → check solvency → execute → report.
//!
//! The pipeline is linear with no backward transitions and no automatic
//! retries; every failure is converted into a [`RelayError`] so that
//! nothing throws past the HTTP boundary. The orchestrator holds no chain
//! state of its own, it is a stateless pipeline over the injected
//! [`ForwarderGateway`]; concurrent requests interleave freely except that
//! at most one execute per claimed signer is admitted at a time, so two
//! in-flight requests for the same signer cannot race each other's
//! forwarder nonce.

use std::collections::HashMap;
use std::sync::Arc;

use ethers::types::{Address, TxHash, U256};
use tokio::sync::Mutex;

use pothole_relayer_gateway::{ForwarderGateway, VerificationOutcome};
use pothole_relayer_handler_utils::ForwardRequest;
use pothole_relayer_utils::probe;

/// Fallback failure string when an execution error carries no message.
const GENERIC_EXECUTION_FAILURE: &str = "Failed to process meta-transaction";

/// Minimum operational relayer balance: 0.01 in native-currency units.
///
/// A circuit breaker against an empty relayer wallet, not a per-request
/// cost estimate.
fn min_relayer_balance() -> U256 {
    U256::exp10(16)
}

/// Forward-request relaying errors.
///
/// Every variant is a policy rejection that maps to a 400 response; the
/// `Display` string is the client-visible reason.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The request failed structural validation.
    #[error("Invalid request format")]
    InvalidRequest,
    /// The forwarder contract did not verify the signature, or the
    /// verification call itself failed (fail-closed).
    #[error("Invalid signature")]
    InvalidSignature,
    /// The relayer wallet is below its operational balance floor.
    #[error("Insufficient relayer balance")]
    InsufficientBalance,
    /// Submission or confirmation failed; carries the underlying message.
    #[error("{0}")]
    Execution(String),
}

/// A snapshot of the relayer identity and funds, for status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayerStatusInfo {
    /// The relayer account address.
    pub relayer_address: Address,
    /// The relayer account balance, in wei.
    pub balance: U256,
    /// The configured chain id.
    pub chain_id: u64,
    /// The configured forwarder contract address.
    pub forwarder_address: Address,
}

/// The relay pipeline over an injected chain gateway.
pub struct RelayOrchestrator {
    gateway: Arc<dyn ForwarderGateway>,
    signer_locks: Mutex<HashMap<Address, Arc<Mutex<()>>>>,
}

impl RelayOrchestrator {
    /// Creates a new orchestrator over the given gateway.
    pub fn new(gateway: Arc<dyn ForwarderGateway>) -> Self {
        Self {
            gateway,
            signer_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Relays one forward request and reports its terminal state.
    ///
    /// Cheap local checks run before any paid or network-bound check, so a
    /// malformed request never spends RPC budget and an unverifiable one
    /// never spends gas.
    pub async fn relay(
        &self,
        request: ForwardRequest,
    ) -> Result<TxHash, RelayError> {
        let checked = request.checked().ok_or(RelayError::InvalidRequest)?;

        match self.gateway.verify_signature(&checked).await {
            VerificationOutcome::Valid => {}
            VerificationOutcome::Invalid => {
                tracing::debug!(from = %checked.from, "signature rejected by the forwarder");
                return Err(RelayError::InvalidSignature);
            }
            VerificationOutcome::TransportError(reason) => {
                // Fail closed; the transport detail stays in the logs.
                tracing::warn!(
                    %reason,
                    "signature verification errored, treating as invalid"
                );
                return Err(RelayError::InvalidSignature);
            }
        }

        let balance =
            self.gateway.balance().await.map_err(execution_error)?;
        if balance < min_relayer_balance() {
            tracing::error!(
                %balance,
                "relayer balance below the operational floor, rejecting"
            );
            return Err(RelayError::InsufficientBalance);
        }

        // Admit one in-flight execute per claimed signer. Ordering between
        // distinct signers stays unconstrained.
        let signer_lock = self.signer_lock(checked.from).await;
        let _guard = signer_lock.lock().await;

        tracing::event!(
            target: probe::TARGET,
            tracing::Level::DEBUG,
            kind = %probe::Kind::MetaTx,
            from = %checked.from,
            to = %checked.to,
            executing = true,
        );
        let tx_hash = self
            .gateway
            .execute(&checked)
            .await
            .map_err(execution_error)?;
        tracing::event!(
            target: probe::TARGET,
            tracing::Level::DEBUG,
            kind = %probe::Kind::MetaTx,
            from = %checked.from,
            %tx_hash,
            finalized = true,
        );
        Ok(tx_hash)
    }

    /// Pass-through read of the forwarder's per-signer nonce counter.
    pub async fn nonce_of(
        &self,
        address: Address,
    ) -> pothole_relayer_utils::Result<U256> {
        self.gateway.nonce_of(address).await
    }

    /// Assembles a status snapshot of the relayer.
    pub async fn status(
        &self,
    ) -> pothole_relayer_utils::Result<RelayerStatusInfo> {
        Ok(RelayerStatusInfo {
            relayer_address: self.gateway.relayer_address(),
            balance: self.gateway.balance().await?,
            chain_id: self.gateway.chain_id(),
            forwarder_address: self.gateway.forwarder_address(),
        })
    }

    // The lock table only ever grows, one entry per distinct signer seen
    // over the process lifetime.
    async fn signer_lock(&self, signer: Address) -> Arc<Mutex<()>> {
        let mut locks = self.signer_locks.lock().await;
        locks.entry(signer).or_default().clone()
    }
}

fn execution_error(e: pothole_relayer_utils::Error) -> RelayError {
    let reason = e.to_string();
    if reason.is_empty() {
        RelayError::Execution(GENERIC_EXECUTION_FAILURE.to_string())
    } else {
        RelayError::Execution(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pothole_relayer_gateway::mocked::MockGateway;
    use pothole_relayer_handler_utils::{CheckedForwardRequest, DecimalU256};
    use pothole_relayer_utils::Result as UtilsResult;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn well_formed_request() -> ForwardRequest {
        ForwardRequest {
            from: Some(Address::repeat_byte(0x11)),
            to: Some(Address::repeat_byte(0x22)),
            value: Some(DecimalU256(U256::zero())),
            gas: Some(DecimalU256(U256::from(100_000u64))),
            deadline: Some(DecimalU256(U256::from(4_102_444_800u64))),
            data: Some(vec![0xde, 0xad, 0xbe, 0xef].into()),
            signature: Some(vec![0x01; 65].into()),
        }
    }

    #[tokio::test]
    async fn malformed_requests_never_reach_the_gateway() {
        let strips: [fn(&mut ForwardRequest); 5] = [
            |r| r.from = None,
            |r| r.to = None,
            |r| r.value = None,
            |r| r.gas = None,
            |r| r.data = None,
        ];
        for strip in strips {
            let gateway = Arc::new(MockGateway::builder().build());
            let orchestrator = RelayOrchestrator::new(gateway.clone());
            let mut request = well_formed_request();
            strip(&mut request);
            let result = orchestrator.relay(request).await;
            assert!(matches!(result, Err(RelayError::InvalidRequest)));
            assert_eq!(gateway.verify_calls(), 0);
            assert_eq!(gateway.balance_calls(), 0);
            assert_eq!(gateway.execute_calls(), 0);
        }
    }

    #[tokio::test]
    async fn rejected_signature_never_executes() {
        let gateway = Arc::new(
            MockGateway::builder()
                .verification(VerificationOutcome::Invalid)
                .build(),
        );
        let orchestrator = RelayOrchestrator::new(gateway.clone());
        let result = orchestrator.relay(well_formed_request()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid signature"
        );
        assert_eq!(gateway.verify_calls(), 1);
        assert_eq!(gateway.execute_calls(), 0);
    }

    #[tokio::test]
    async fn verification_transport_error_fails_closed() {
        let gateway = Arc::new(
            MockGateway::builder()
                .verification(VerificationOutcome::TransportError(
                    "connection refused".into(),
                ))
                .build(),
        );
        let orchestrator = RelayOrchestrator::new(gateway.clone());
        let result = orchestrator.relay(well_formed_request()).await;
        // indistinguishable from an invalid signature for the caller
        assert_eq!(result.unwrap_err().to_string(), "Invalid signature");
        assert_eq!(gateway.execute_calls(), 0);
    }

    #[tokio::test]
    async fn underfunded_relayer_never_executes() {
        // 0.005 native units, below the 0.01 floor
        let gateway = Arc::new(
            MockGateway::builder()
                .balance(U256::exp10(15) * 5)
                .build(),
        );
        let orchestrator = RelayOrchestrator::new(gateway.clone());
        let result = orchestrator.relay(well_formed_request()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Insufficient relayer balance"
        );
        assert_eq!(gateway.verify_calls(), 1);
        assert_eq!(gateway.execute_calls(), 0);
    }

    #[tokio::test]
    async fn balance_exactly_at_the_floor_is_accepted() {
        let gateway = Arc::new(
            MockGateway::builder().balance(U256::exp10(16)).build(),
        );
        let orchestrator = RelayOrchestrator::new(gateway.clone());
        orchestrator.relay(well_formed_request()).await.unwrap();
        assert_eq!(gateway.execute_calls(), 1);
    }

    #[tokio::test]
    async fn happy_path_executes_exactly_once() {
        let gateway = Arc::new(MockGateway::builder().build());
        let orchestrator = RelayOrchestrator::new(gateway.clone());
        let tx_hash =
            orchestrator.relay(well_formed_request()).await.unwrap();
        assert_eq!(tx_hash, TxHash::repeat_byte(0x42));
        assert_eq!(gateway.verify_calls(), 1);
        assert_eq!(gateway.balance_calls(), 1);
        assert_eq!(gateway.execute_calls(), 1);
    }

    #[tokio::test]
    async fn execution_failure_message_passes_through() {
        let gateway = Arc::new(
            MockGateway::builder()
                .execute_outcome(Err("reverted: nonce too low".to_string()))
                .build(),
        );
        let orchestrator = RelayOrchestrator::new(gateway.clone());
        let result = orchestrator.relay(well_formed_request()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "reverted: nonce too low"
        );
    }

    #[tokio::test]
    async fn status_is_idempotent_without_state_changes() {
        let gateway = Arc::new(MockGateway::builder().build());
        let orchestrator = RelayOrchestrator::new(gateway);
        let first = orchestrator.status().await.unwrap();
        let second = orchestrator.status().await.unwrap();
        assert_eq!(first.relayer_address, second.relayer_address);
        assert_eq!(first.chain_id, second.chain_id);
        assert_eq!(first.forwarder_address, second.forwarder_address);
    }

    /// A gateway whose execute reports the largest number of concurrently
    /// in-flight calls it ever observed.
    #[derive(Default)]
    struct OverlapGauge {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ForwarderGateway for OverlapGauge {
        fn relayer_address(&self) -> Address {
            Address::repeat_byte(0xaa)
        }

        fn chain_id(&self) -> u64 {
            31337
        }

        fn forwarder_address(&self) -> Address {
            Address::repeat_byte(0xfd)
        }

        async fn nonce_of(&self, _signer: Address) -> UtilsResult<U256> {
            Ok(U256::zero())
        }

        async fn balance(&self) -> UtilsResult<U256> {
            Ok(U256::exp10(18))
        }

        async fn verify_signature(
            &self,
            _request: &CheckedForwardRequest,
        ) -> VerificationOutcome {
            VerificationOutcome::Valid
        }

        async fn execute(
            &self,
            _request: &CheckedForwardRequest,
        ) -> UtilsResult<TxHash> {
            let n = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(n, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(TxHash::zero())
        }
    }

    #[tokio::test]
    async fn same_signer_executes_are_serialized() {
        let gateway = Arc::new(OverlapGauge::default());
        let orchestrator =
            Arc::new(RelayOrchestrator::new(gateway.clone()));
        let a = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator.relay(well_formed_request()).await
            })
        };
        let b = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator.relay(well_formed_request()).await
            })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert_eq!(gateway.max_in_flight.load(Ordering::SeqCst), 1);
    }
}
