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

//! Reqwest-based HTTP transport for healthfetch.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `healthfetch_core`
//! on top of a [`reqwest::Client`]. Headers are forwarded untouched so the
//! signature computed over them stays valid.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use healthfetch_core::Context;
//! use healthfetch_http_send_reqwest::ReqwestHttpSend;
//! use reqwest::Client;
//!
//! # fn example() -> Result<(), reqwest::Error> {
//! let client = Client::builder()
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use healthfetch_core::{Error, HttpSend, Result};
use http_body_util::BodyExt;
use reqwest::{Client, Request};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid("failed to convert request for reqwest").with_source(e)
        })?;
        let url = req.url().to_string();

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport(format!("failed to send request to {url}")).with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| {
                Error::transport(format!("failed to read response body from {url}")).with_source(e)
            })?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthfetch_core::ErrorKind;

    #[tokio::test]
    async fn test_relative_uri_is_rejected() {
        let req = http::Request::get("/datastore/ds1/r4/Patient")
            .body(Bytes::new())
            .expect("request must be valid");

        let err = ReqwestHttpSend::default()
            .http_send(req)
            .await
            .expect_err("relative uri must be rejected");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 1 on loopback is never served.
        let req = http::Request::get("http://127.0.0.1:1/datastore/ds1/r4/Patient")
            .body(Bytes::new())
            .expect("request must be valid");

        let err = ReqwestHttpSend::default()
            .http_send(req)
            .await
            .expect_err("connection must fail");
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
