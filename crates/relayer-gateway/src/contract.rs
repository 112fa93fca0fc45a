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

use ethers::prelude::abigen;
use pothole_relayer_handler_utils::CheckedForwardRequest;

// The relayer only ever touches the three entry points of the trusted
// forwarder: the per-signer nonce counter, the read-only signature check and
// the paying execute call. The forwarder's own EIP-712 hashing and replay
// protection stay behind this interface.
abigen!(
    ForwarderContract,
    r#"[
        struct ForwardRequestData { address from; address to; uint256 value; uint256 gas; uint256 deadline; bytes data; bytes signature; }
        function nonces(address owner) external view returns (uint256)
        function verify(ForwardRequestData request) external view returns (bool)
        function execute(ForwardRequestData request) external payable
    ]"#
);

impl From<&CheckedForwardRequest> for ForwardRequestData {
    fn from(request: &CheckedForwardRequest) -> Self {
        ForwardRequestData {
            from: request.from,
            to: request.to,
            value: request.value,
            gas: request.gas,
            deadline: request.deadline,
            data: request.data.clone(),
            signature: request.signature.clone(),
        }
    }
}
