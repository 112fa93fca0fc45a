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

//! Wire types of the relay API.
//!
//! A [`ForwardRequest`] arrives exactly as the frontend serialized it: every
//! field optional and numeric fields as decimal strings. Structural
//! validation turns it into a [`CheckedForwardRequest`], the only shape the
//! chain gateway accepts, so nothing that skipped validation can reach the
//! network.

use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A wrapper type around [`U256`] that serializes as a decimal string.
///
/// The frontend sends every numeric field of a forward request as a decimal
/// string, while [`U256`] serializes as hex by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalU256(pub U256);

impl From<U256> for DecimalU256 {
    fn from(value: U256) -> Self {
        DecimalU256(value)
    }
}

impl Serialize for DecimalU256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for DecimalU256 {
    fn deserialize<D>(deserializer: D) -> Result<DecimalU256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let dec_str = String::deserialize(deserializer)?;
        let value = U256::from_dec_str(&dec_str)
            .map_err(serde::de::Error::custom)?;
        Ok(DecimalU256(value))
    }
}

/// A signed forward request, as submitted by a citizen through the frontend.
///
/// Every field is optional on the wire so that presence is an explicit
/// validation step with a clear client error, not a serde artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequest {
    /// The claimed signer address.
    pub from: Option<Address>,
    /// The target contract address.
    pub to: Option<Address>,
    /// Native-currency amount forwarded with the inner call.
    pub value: Option<DecimalU256>,
    /// Gas stipend the signer wants reserved for the inner call.
    ///
    /// Advisory data forwarded to the inner call, never the outer
    /// transaction's gas limit.
    pub gas: Option<DecimalU256>,
    /// Unix timestamp after which the request is void, enforced on-chain.
    pub deadline: Option<DecimalU256>,
    /// The inner call payload.
    pub data: Option<Bytes>,
    /// EIP-712 signature produced by `from` over the request tuple plus the
    /// signer's current forwarder nonce.
    pub signature: Option<Bytes>,
}

impl ForwardRequest {
    /// Structural validation of an inbound request, before any network call
    /// is made.
    ///
    /// A request is valid iff `from`, `to` and a non-empty `data` are
    /// present and `value`, `gas` and `deadline` are defined. Zero is an
    /// acceptable `value`, and a zero `deadline` is accepted here since
    /// deadline enforcement happens on-chain. A missing signature passes
    /// through as empty bytes for the forwarder contract to reject.
    ///
    /// Pure and side-effect free; failing this check must short-circuit the
    /// pipeline before the signature or balance checks spend any RPC budget.
    pub fn checked(self) -> Option<CheckedForwardRequest> {
        let data = self.data.filter(|data| !data.0.is_empty())?;
        Some(CheckedForwardRequest {
            from: self.from?,
            to: self.to?,
            value: self.value?.0,
            gas: self.gas?.0,
            deadline: self.deadline?.0,
            data,
            signature: self.signature.unwrap_or_default(),
        })
    }
}

/// A structurally-validated forward request.
///
/// The only request shape the chain gateway accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedForwardRequest {
    /// The claimed signer address.
    pub from: Address,
    /// The target contract address.
    pub to: Address,
    /// Native-currency amount forwarded with the inner call.
    pub value: U256,
    /// Gas stipend for the inner call.
    pub gas: U256,
    /// Unix timestamp after which the request is void.
    pub deadline: U256,
    /// The inner call payload.
    pub data: Bytes,
    /// Signature over the request tuple; possibly empty, in which case
    /// on-chain verification fails closed.
    pub signature: Bytes,
}
