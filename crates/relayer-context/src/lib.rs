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

//! # Relayer Context Module
//!
//! A module for managing the context of the relayer: the validated
//! configuration, the construction of the provider and wallet the gateway
//! is built from, and the process-wide shutdown signal.

use std::time::Duration;

use ethers::core::k256::SecretKey;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use tokio::sync::broadcast;

use pothole_relayer_config::RelayerConfig;

/// RelayerContext contains the relayer's configuration and shutdown signal.
#[derive(Clone)]
pub struct RelayerContext {
    /// The configuration of the relayer.
    pub config: RelayerConfig,
    /// Broadcasts a shutdown signal to all active connections.
    ///
    /// The initial `shutdown` trigger is provided by the `run` caller. When
    /// a graceful shutdown is initiated, a `()` value is sent via the
    /// broadcast::Sender and each subscribed task reaches a safe terminal
    /// state.
    notify_shutdown: broadcast::Sender<()>,
}

impl RelayerContext {
    /// Creates a new RelayerContext.
    pub fn new(config: RelayerConfig) -> Self {
        let (notify_shutdown, _) = broadcast::channel(2);
        Self {
            config,
            notify_shutdown,
        }
    }

    /// Returns a broadcast receiver handle for the shutdown signal.
    pub fn shutdown_signal(&self) -> Shutdown {
        Shutdown::new(self.notify_shutdown.subscribe())
    }

    /// Sends a shutdown signal to all subscribed tasks/connections.
    pub fn shutdown(&self) {
        let _ = self.notify_shutdown.send(());
    }

    /// Returns a new provider over the configured HTTP RPC endpoint.
    pub fn evm_provider(
        &self,
    ) -> pothole_relayer_utils::Result<Provider<Http>> {
        let provider =
            Provider::try_from(self.config.http_endpoint.as_url().as_str())?
                .interval(Duration::from_millis(5u64));
        Ok(provider)
    }

    /// Sets up and returns the relayer wallet, bound to the configured
    /// chain id.
    pub fn evm_wallet(&self) -> pothole_relayer_utils::Result<LocalWallet> {
        let private_key = self
            .config
            .private_key
            .as_ref()
            .ok_or(pothole_relayer_utils::Error::MissingSecrets)?;
        let key = SecretKey::from_slice(private_key.as_bytes())?;
        let wallet =
            LocalWallet::from(key).with_chain_id(self.config.chain_id);
        tracing::debug!(address = ?wallet.address(), "derived relayer wallet");
        Ok(wallet)
    }
}

/// Listens for the server shutdown signal.
///
/// Shutdown is signalled using a `broadcast::Receiver`. Only a single value
/// is ever sent; once it has been received the server should shut down.
#[derive(Debug)]
pub struct Shutdown {
    /// `true` if the shutdown signal has been received
    shutdown: bool,
    /// The receive half of the channel used to listen for shutdown.
    notify: broadcast::Receiver<()>,
}

impl Shutdown {
    /// Create a new `Shutdown` backed by the given `broadcast::Receiver`.
    pub fn new(notify: broadcast::Receiver<()>) -> Shutdown {
        Shutdown {
            shutdown: false,
            notify,
        }
    }

    /// Receive the shutdown notice, waiting if necessary.
    pub async fn recv(&mut self) {
        // If the shutdown signal has already been received, then return
        // immediately.
        if self.shutdown {
            return;
        }

        // Cannot receive a "lag error" as only one value is ever sent.
        let _ = self.notify.recv().await;

        // Remember that the signal has been received.
        self.shutdown = true;
    }
}
