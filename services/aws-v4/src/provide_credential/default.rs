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

use crate::provide_credential::{EnvCredentialProvider, ProfileCredentialProvider};
use crate::Credential;
use async_trait::async_trait;
use healthfetch_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

/// DefaultCredentialProvider is a loader that will try to load credential via default chains.
///
/// Resolution order:
///
/// 1. Environment variables
/// 2. Shared config (`~/.aws/credentials`, `~/.aws/config`)
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new()
            .push(EnvCredentialProvider::new())
            .push(ProfileCredentialProvider::new());

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain<Credential>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        AWS_ACCESS_KEY_ID, AWS_CONFIG_FILE, AWS_SECRET_ACCESS_KEY, AWS_SHARED_CREDENTIALS_FILE,
    };
    use healthfetch_core::StaticEnv;
    use healthfetch_file_read_tokio::TokioFileRead;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_credential_env_loader_without_env() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = Context::new()
            .with_file_read(TokioFileRead)
            .with_env(StaticEnv {
                home_dir: None,
                envs: HashMap::from([
                    (
                        AWS_CONFIG_FILE.to_string(),
                        "/not_exist/config".to_string(),
                    ),
                    (
                        AWS_SHARED_CREDENTIALS_FILE.to_string(),
                        "/not_exist/credentials".to_string(),
                    ),
                ]),
            });

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await?;
        assert!(cred.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_env_takes_precedence_over_profile() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let tmp_dir = tempdir()?;
        let file_path = tmp_dir.path().join("credentials");
        let mut tmp_file = File::create(&file_path)?;
        writeln!(tmp_file, "[default]")?;
        writeln!(tmp_file, "aws_access_key_id = PROFILEACCESSKEYID")?;
        writeln!(tmp_file, "aws_secret_access_key = PROFILESECRETACCESSKEY")?;

        let file_envs = HashMap::from([(
            AWS_SHARED_CREDENTIALS_FILE.to_string(),
            file_path.to_string_lossy().to_string(),
        )]);
        let ctx = Context::new()
            .with_file_read(TokioFileRead)
            .with_env(StaticEnv {
                home_dir: None,
                envs: file_envs.clone(),
            });

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await?
            .expect("profile credential must be loaded");
        assert_eq!(cred.access_key_id, "PROFILEACCESSKEYID");

        let mut envs = file_envs;
        envs.insert(AWS_ACCESS_KEY_ID.to_string(), "ENVACCESSKEYID".to_string());
        envs.insert(
            AWS_SECRET_ACCESS_KEY.to_string(),
            "ENVSECRETACCESSKEY".to_string(),
        );
        let ctx = ctx.with_env(StaticEnv {
            home_dir: None,
            envs,
        });

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await?
            .expect("env credential must be loaded");
        assert_eq!(cred.access_key_id, "ENVACCESSKEYID");
        assert_eq!(cred.secret_access_key, "ENVSECRETACCESSKEY");

        Ok(())
    }
}
