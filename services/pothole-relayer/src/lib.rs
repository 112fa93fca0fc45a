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

//! # Pothole Relayer
//!
//! The off-chain side of gasless pothole reporting: citizens sign a
//! structured forward request, this service verifies it against the trusted
//! forwarder contract and submits it from a funded relayer account.

/// Building and running the HTTP services of the relayer.
pub mod service;
