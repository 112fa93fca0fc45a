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

//! Relayer handlers for HTTP calls
//!
//! Translates external JSON requests into orchestrator calls and maps each
//! outcome to a status code: policy rejections become 400 with the result
//! body, anything unexpected becomes a generic 500. Neither the relayer
//! private key nor raw transport errors ever reach a response body.

#![warn(missing_docs)]

/// Module handles relayer API
pub mod routes;
