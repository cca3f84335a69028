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

use std::sync::Arc;

use bytes::Bytes;
use healthfetch_aws_v4::{Credential, X_AMZ_CONTENT_SHA_256};
use healthfetch_core::hash::EMPTY_STRING_SHA256;
use healthfetch_core::utils::truncate;
use healthfetch_core::{Error, Result, Signer};
use http::header::CONTENT_TYPE;
use http::Request;
use log::debug;

use crate::constants::CONTENT_TYPE_FHIR_JSON;
use crate::resource::{Bundle, Resource};
use crate::EndpointConfig;

/// Max chars of an error response body kept in an `UnexpectedStatus` error.
const MAX_ERROR_BODY: usize = 1024;

/// Fetcher reads FHIR resources from one data store.
///
/// Every request is signed right before it is sent, through the transport
/// configured in the signer's context.
#[derive(Debug)]
pub struct Fetcher {
    config: Arc<EndpointConfig>,
    signer: Signer<Credential>,
}

impl Fetcher {
    /// Create a new fetcher.
    pub fn new(config: Arc<EndpointConfig>, signer: Signer<Credential>) -> Self {
        Self { config, signer }
    }

    /// The endpoint this fetcher talks to.
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Fetch the collection of `T`.
    ///
    /// An empty bundle is a valid result.
    pub async fn fetch_collection<T: Resource>(&self) -> Result<Bundle> {
        let url = self.config.collection_url(T::RESOURCE_TYPE);
        let body = self.get(&url).await?;

        let bundle: Bundle = serde_json::from_slice(&body).map_err(|e| {
            Error::decode(format!(
                "failed to decode {} bundle from {url}",
                T::RESOURCE_TYPE
            ))
            .with_source(e)
        })?;
        check_resource_type(&url, Bundle::RESOURCE_TYPE, &bundle.resource_type)?;

        Ok(bundle)
    }

    /// Fetch a single `T` by id.
    pub async fn fetch_by_id<T: Resource>(&self, id: &str) -> Result<T> {
        if id.is_empty() {
            return Err(Error::request_invalid(format!(
                "id of {} must not be empty",
                T::RESOURCE_TYPE
            )));
        }

        let url = self.config.resource_url(T::RESOURCE_TYPE, id);
        let body = self.get(&url).await?;

        let record: T = serde_json::from_slice(&body).map_err(|e| {
            Error::decode(format!("failed to decode {} from {url}", T::RESOURCE_TYPE))
                .with_source(e)
        })?;
        check_resource_type(&url, T::RESOURCE_TYPE, record.resource_type())?;

        Ok(record)
    }

    /// Build, sign and send a GET request, returning the body of a 2xx response.
    async fn get(&self, url: &str) -> Result<Bytes> {
        let req = Request::get(url)
            .header(CONTENT_TYPE, CONTENT_TYPE_FHIR_JSON)
            .header(X_AMZ_CONTENT_SHA_256, EMPTY_STRING_SHA256)
            .body(Bytes::new())?;

        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts).await?;

        debug!("sending GET {url}");
        let resp = self
            .signer
            .context()
            .http_send(Request::from_parts(parts, body))
            .await?;

        let status = resp.status();
        let body = resp.into_body();
        if !status.is_success() {
            return Err(Error::unexpected_status(format!(
                "GET {url} returned {status}: {}",
                truncate(&String::from_utf8_lossy(&body), MAX_ERROR_BODY)
            )));
        }

        Ok(body)
    }
}

/// A well-formed document of another kind is a decode failure, never an
/// empty or partial success.
fn check_resource_type(url: &str, expected: &str, actual: &str) -> Result<()> {
    if actual != expected {
        return Err(Error::decode(format!(
            "expected {expected} from {url}, got {actual}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Patient;
    use async_trait::async_trait;
    use healthfetch_aws_v4::{RequestSigner, StaticCredentialProvider};
    use healthfetch_core::{Context, ErrorKind, HttpSend};
    use http::StatusCode;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Replays one canned response and keeps the last request.
    #[derive(Debug, Clone)]
    struct Replay {
        status: StatusCode,
        body: &'static str,
        last: Arc<Mutex<Option<http::request::Parts>>>,
    }

    impl Replay {
        fn new(status: StatusCode, body: &'static str) -> Self {
            Self {
                status,
                body,
                last: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl HttpSend for Replay {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            *self.last.lock().unwrap() = Some(req.into_parts().0);

            let mut resp = http::Response::new(Bytes::from_static(self.body.as_bytes()));
            *resp.status_mut() = self.status;
            Ok(resp)
        }
    }

    fn fetcher(http: Replay) -> Fetcher {
        let _ = env_logger::builder().is_test(true).try_init();

        let signer = Signer::new(
            Context::new().with_http_send(http),
            StaticCredentialProvider::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
            RequestSigner::new("healthlake", "us-west-2"),
        );
        Fetcher::new(
            Arc::new(EndpointConfig::new("fhir.example.com", "ds1")),
            signer,
        )
    }

    #[tokio::test]
    async fn test_fetch_by_id_signs_request() -> anyhow::Result<()> {
        let http = Replay::new(
            StatusCode::OK,
            r#"{"resourceType":"Patient","id":"p1","gender":"other"}"#,
        );
        let f = fetcher(http.clone());

        let p: Patient = f.fetch_by_id("p1").await?;
        assert_eq!(p.id(), Some("p1"));

        let parts = http.last.lock().unwrap().take().expect("request must be sent");
        assert_eq!(parts.method, http::Method::GET);
        assert_eq!(
            parts.uri.to_string(),
            "https://fhir.example.com/ds1/r4/Patient/p1"
        );
        assert_eq!(parts.headers[CONTENT_TYPE], CONTENT_TYPE_FHIR_JSON);
        assert_eq!(parts.headers[X_AMZ_CONTENT_SHA_256], EMPTY_STRING_SHA256);
        assert!(parts.headers.contains_key("x-amz-date"));
        let auth = parts.headers[http::header::AUTHORIZATION].to_str()?;
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
        assert!(auth.contains("/us-west-2/healthlake/aws4_request"));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_by_id_rejects_empty_id() {
        let http = Replay::new(StatusCode::OK, "{}");
        let f = fetcher(http.clone());

        let err = f.fetch_by_id::<Patient>("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
        assert!(http.last.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unexpected_status() {
        let http = Replay::new(
            StatusCode::FORBIDDEN,
            r#"{"message":"The security token included in the request is invalid."}"#,
        );
        let f = fetcher(http);

        let err = f.fetch_collection::<Patient>().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
        assert!(err.message().contains("403"));
        assert!(err.message().contains("security token"));
    }

    #[tokio::test]
    async fn test_decode_errors() {
        let f = fetcher(Replay::new(StatusCode::OK, r#"{"resourceType":"Bundle","entry":["#));
        let err = f.fetch_collection::<Patient>().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let f = fetcher(Replay::new(StatusCode::OK, r#"{"id":"p1"}"#));
        let err = f.fetch_by_id::<Patient>("p1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_wrong_resource_type() {
        let f = fetcher(Replay::new(
            StatusCode::OK,
            r#"{"resourceType":"Patient","id":"p1"}"#,
        ));
        let err = f.fetch_collection::<Patient>().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.message().contains("expected Bundle"));

        let f = fetcher(Replay::new(
            StatusCode::OK,
            r#"{"resourceType":"Bundle","id":"p1"}"#,
        ));
        let err = f.fetch_by_id::<Patient>("p1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.message().contains("got Bundle"));
    }
}
