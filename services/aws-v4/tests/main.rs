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

use std::env;

use anyhow::Result;
use bytes::Bytes;
use healthfetch_aws_v4::{DefaultCredentialProvider, RequestSigner, X_AMZ_CONTENT_SHA_256};
use healthfetch_core::hash::EMPTY_STRING_SHA256;
use healthfetch_core::{Context, OsEnv, Signer};
use healthfetch_file_read_tokio::TokioFileRead;
use healthfetch_http_send_reqwest::ReqwestHttpSend;
use http::{Request, StatusCode};
use log::{debug, warn};

fn init_signer() -> Option<(Signer<healthfetch_aws_v4::Credential>, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("HEALTHFETCH_AWS_V4_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let region =
        env::var("HEALTHFETCH_AWS_V4_REGION").expect("env HEALTHFETCH_AWS_V4_REGION must set");
    let service =
        env::var("HEALTHFETCH_AWS_V4_SERVICE").unwrap_or_else(|_| "healthlake".to_string());
    let url = env::var("HEALTHFETCH_AWS_V4_URL").expect("env HEALTHFETCH_AWS_V4_URL must set");

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        RequestSigner::new(&service, &region),
    );

    Some((signer, url))
}

#[tokio::test]
async fn test_get_collection() -> Result<()> {
    let Some((signer, url)) = init_signer() else {
        warn!("HEALTHFETCH_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = Request::get(format!("{url}/Patient"))
        .header(http::header::CONTENT_TYPE, "application/json; charset=utf-8")
        .header(X_AMZ_CONTENT_SHA_256, EMPTY_STRING_SHA256)
        .body(Bytes::new())?;
    let (mut parts, body) = req.into_parts();
    signer.sign(&mut parts).await?;

    let resp = signer
        .context()
        .http_send(Request::from_parts(parts, body))
        .await?;
    debug!("got response: {:?}", resp);
    assert_eq!(StatusCode::OK, resp.status());

    Ok(())
}

#[tokio::test]
async fn test_get_not_exist_patient() -> Result<()> {
    let Some((signer, url)) = init_signer() else {
        warn!("HEALTHFETCH_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = Request::get(format!("{url}/Patient/not-exist-patient"))
        .header(http::header::CONTENT_TYPE, "application/json; charset=utf-8")
        .header(X_AMZ_CONTENT_SHA_256, EMPTY_STRING_SHA256)
        .body(Bytes::new())?;
    let (mut parts, body) = req.into_parts();
    signer.sign(&mut parts).await?;

    let resp = signer
        .context()
        .http_send(Request::from_parts(parts, body))
        .await?;
    assert_eq!(StatusCode::NOT_FOUND, resp.status());

    Ok(())
}
