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

use std::str::FromStr;

use ethereum_types::Secret;
use serde::Deserialize;

/// The relayer account private key.
///
/// Deserialized either from a `0x`-prefixed hex string or from a `$ENV_VAR`
/// reference to an environment variable holding such a string. The `Debug`
/// impl never prints the key material.
#[derive(Clone)]
pub struct PrivateKey(Secret);

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrivateKey").finish()
    }
}

impl From<Secret> for PrivateKey {
    fn from(secret: Secret) -> Self {
        PrivateKey(secret)
    }
}

impl std::ops::Deref for PrivateKey {
    type Target = Secret;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PrivateKeyVisitor;
        impl serde::de::Visitor<'_> for PrivateKeyVisitor {
            type Value = Secret;

            fn expecting(
                &self,
                formatter: &mut std::fmt::Formatter,
            ) -> std::fmt::Result {
                formatter.write_str(
                    "hex string or an env var containing a hex string in it",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if value.starts_with("0x") {
                    // hex value
                    Secret::from_str(value).map_err(|e| {
                        serde::de::Error::custom(format!(
                            "{e}\n got {} chars but expected a 66 chars string (including the 0x prefix)",
                            value.len()
                        ))
                    })
                } else if value.starts_with('$') {
                    // env
                    let var = value.strip_prefix('$').unwrap_or(value);
                    tracing::trace!("Reading {} from env", var);
                    let val = std::env::var(var).map_err(|e| {
                        serde::de::Error::custom(format!(
                            "error while loading this env {var}: {e}",
                        ))
                    })?;
                    Secret::from_str(&val).map_err(|e| {
                        serde::de::Error::custom(format!(
                            "{e}\n expected a 66 chars string (including the 0x prefix) but found {} chars",
                            val.len()
                        ))
                    })
                } else {
                    Err(serde::de::Error::custom(
                        "expected a 0x-prefixed hex string or a $ENV_VAR reference",
                    ))
                }
            }
        }

        let secret = deserializer.deserialize_str(PrivateKeyVisitor)?;
        Ok(Self(secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        key: PrivateKey,
    }

    const KEY: &str =
        "0x000000000000000000000000000000000000000000000000000000000000dead";

    #[test]
    fn parses_hex_literal() {
        let v: Wrapper =
            serde_json::from_str(&format!(r#"{{ "key": "{KEY}" }}"#)).unwrap();
        assert_eq!(*v.key, Secret::from_str(KEY).unwrap());
    }

    #[test]
    fn parses_env_reference() {
        std::env::set_var("TEST_RELAYER_PRIVATE_KEY", KEY);
        let v: Wrapper = serde_json::from_str(
            r#"{ "key": "$TEST_RELAYER_PRIVATE_KEY" }"#,
        )
        .unwrap();
        assert_eq!(*v.key, Secret::from_str(KEY).unwrap());
    }

    #[test]
    fn rejects_everything_else() {
        let v: Result<Wrapper, _> =
            serde_json::from_str(r#"{ "key": "not a key" }"#);
        assert!(v.is_err());
    }

    #[test]
    fn debug_never_prints_the_key() {
        let v: Wrapper =
            serde_json::from_str(&format!(r#"{{ "key": "{KEY}" }}"#)).unwrap();
        assert_eq!(format!("{:?}", v.key), "PrivateKey");
    }
}
