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

use crate::time::{now, DateTime};
use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// It loads the credential through the configured provider, caches it while
/// it stays valid, and hands it to the request signer.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    signer: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        signer: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            provider: Arc::new(provider),
            signer: Arc::new(signer),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// The context this signer runs in.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Load the credential, reusing the cached one while it is still valid.
    ///
    /// Returns a `CredentialInvalid` error when no provider has a usable credential.
    pub async fn credential(&self) -> Result<K> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        if cached.is_valid() {
            if let Some(cred) = cached {
                return Ok(cred);
            }
        }

        let loaded = self.provider.provide_credential(&self.ctx).await?;
        let Some(cred) = loaded.filter(|v| v.is_valid()) else {
            return Err(Error::credential_invalid(
                "no valid credential found to sign request",
            ));
        };

        *self.credential.lock().expect("lock poisoned") = Some(cred.clone());
        Ok(cred)
    }

    /// Sign the request with the current time.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        self.sign_at(req, now()).await
    }

    /// Sign the request with the given signing time.
    pub async fn sign_at(
        &self,
        req: &mut http::request::Parts,
        signing_time: DateTime,
    ) -> Result<()> {
        let cred = self.credential().await?;

        self.signer
            .sign_request(&self.ctx, req, &cred, signing_time)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use async_trait::async_trait;
    use http::request::Parts;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct TestCredential(String);

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.0.is_empty()
        }
    }

    #[derive(Debug, Default)]
    struct CountingProvider {
        key: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProvideCredential for CountingProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<TestCredential>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.key.is_empty() {
                return Ok(None);
            }
            Ok(Some(TestCredential(self.key.to_string())))
        }
    }

    #[derive(Debug)]
    struct HeaderSigner;

    #[async_trait]
    impl SignRequest for HeaderSigner {
        type Credential = TestCredential;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut Parts,
            cred: &TestCredential,
            signing_time: DateTime,
        ) -> Result<()> {
            req.headers.insert("x-test-key", cred.0.parse()?);
            req.headers
                .insert("x-test-time", crate::time::format_iso8601(signing_time).parse()?);
            Ok(())
        }
    }

    fn parts() -> Parts {
        http::Request::get("https://fhir.example.com/ds1/r4/Patient")
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_credential_is_cached() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            key: "access_key_id",
            calls: calls.clone(),
        };
        let signer = Signer::new(Context::new(), provider, HeaderSigner);

        let mut req = parts();
        signer.sign(&mut req).await?;
        let mut req = parts();
        signer.sign(&mut req).await?;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(req.headers["x-test-key"], "access_key_id");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_credential_fails() {
        let signer = Signer::new(Context::new(), CountingProvider::default(), HeaderSigner);

        let mut req = parts();
        let err = signer.sign(&mut req).await.expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(req.headers.is_empty());
    }
}
