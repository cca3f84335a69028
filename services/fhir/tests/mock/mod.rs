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

//! In-memory transport that records requests and replays canned responses.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use healthfetch_core::{Error, HttpSend, Result};
use http::StatusCode;

#[derive(Debug, Clone)]
enum Route {
    Respond(StatusCode, String),
    Fail,
}

/// Request as seen by the transport.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: http::Method,
    pub uri: String,
    pub headers: http::HeaderMap,
}

#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    routes: Arc<Mutex<HashMap<String, Route>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHttpSend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer GET `uri` with `status` and `body`.
    pub fn respond(self, uri: &str, status: StatusCode, body: impl Into<String>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(uri.to_string(), Route::Respond(status, body.into()));
        self
    }

    /// Answer GET `uri` with a transport error.
    pub fn fail(self, uri: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(uri.to_string(), Route::Fail);
        self
    }

    /// All requests sent so far, in order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// URIs of all requests sent so far, in order.
    pub fn uris(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.uri).collect()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let uri = req.uri().to_string();
        self.requests.lock().unwrap().push(Recorded {
            method: req.method().clone(),
            uri: uri.clone(),
            headers: req.headers().clone(),
        });

        let route = self.routes.lock().unwrap().get(&uri).cloned();
        let (status, body) = match route {
            Some(Route::Respond(status, body)) => (status, body),
            Some(Route::Fail) => {
                return Err(Error::transport(format!("connection reset by {uri}")));
            }
            None => (StatusCode::NOT_FOUND, String::new()),
        };

        let mut resp = http::Response::new(Bytes::from(body));
        *resp.status_mut() = status;
        Ok(resp)
    }
}
