// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! AWS SigV4 signing.

pub use healthfetch_aws_v4::*;

#[cfg(feature = "default-context")]
use crate::default_context;
use crate::{Context, Signer};

/// Signer for AWS services.
pub type DefaultSigner = Signer<Credential>;

/// Create a signer for `service` in `region` on top of the default context,
/// loading credentials through [`DefaultCredentialProvider`].
#[cfg(feature = "default-context")]
pub fn default_signer(service: &str, region: &str) -> DefaultSigner {
    signer_with_context(default_context(), service, region)
}

/// Create a signer for `service` in `region` on top of `ctx`, loading
/// credentials through [`DefaultCredentialProvider`].
pub fn signer_with_context(ctx: Context, service: &str, region: &str) -> DefaultSigner {
    let provider = DefaultCredentialProvider::new();
    let signer = RequestSigner::new(service, region);
    Signer::new(ctx, provider, signer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_signer_without_credential() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (AWS_CONFIG_FILE.to_string(), "/not_exist/config".to_string()),
                (
                    AWS_SHARED_CREDENTIALS_FILE.to_string(),
                    "/not_exist/credentials".to_string(),
                ),
            ]),
        });

        let err = signer_with_context(ctx, "healthlake", "us-west-2")
            .credential()
            .await
            .unwrap_err();
        assert!(err.is_credential_error());
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[cfg(feature = "default-context")]
    #[tokio::test]
    async fn test_default_signer_signs_with_env_credential() {
        let signer = default_signer("healthlake", "us-west-2");
        let (mut parts, _) = http::Request::get("https://fhir.example.com/ds1/r4/Patient")
            .body(())
            .expect("request must be valid")
            .into_parts();

        // Only signs when the OS env carries a credential.
        if signer.credential().await.is_ok() {
            signer.sign(&mut parts).await.expect("sign must succeed");
            assert!(parts.headers.contains_key(http::header::AUTHORIZATION));
        }
    }
}
