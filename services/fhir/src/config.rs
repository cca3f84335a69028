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

use crate::constants::*;
use healthfetch_core::{Context, Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters kept verbatim when a resource id is placed into a path segment.
///
/// Valid FHIR ids only use `[A-Za-z0-9-.]`, so they pass through unchanged.
static ID_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Where the FHIR data store lives and how requests to it are scoped.
///
/// Built once at startup and shared read-only by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Host name of the FHIR API, without scheme.
    pub endpoint: String,
    /// Data store identifier, the first path component of every request.
    pub datastore: String,
    /// Region used to scope the signing key.
    pub region: String,
    /// Service name used to scope the signing key.
    pub service: String,
}

impl EndpointConfig {
    /// Create a config for `endpoint` and `datastore` with the default region and service.
    pub fn new(endpoint: impl Into<String>, datastore: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            datastore: datastore.into(),
            region: DEFAULT_REGION.to_string(),
            service: DEFAULT_SERVICE.to_string(),
        }
    }

    /// Set the signing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the signing service name.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Load config from env.
    ///
    /// `ENDPOINT` and `DATASTORE` are required. Their values are not
    /// validated further: a malformed host fails when the request is built
    /// or sent.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let required = |key: &str| {
            ctx.env_var(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::config_invalid(format!("env {key} must be set")))
        };
        let optional = |key: &str, default: &str| {
            ctx.env_var(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            endpoint: required(ENDPOINT)?,
            datastore: required(DATASTORE)?,
            region: optional(AWS_REGION, DEFAULT_REGION),
            service: optional(HEALTHLAKE_SERVICE, DEFAULT_SERVICE),
        })
    }

    /// URL of the whole collection of `resource_type`.
    pub fn collection_url(&self, resource_type: &str) -> String {
        format!(
            "https://{}/{}/{}/{}",
            self.endpoint, self.datastore, FHIR_VERSION, resource_type
        )
    }

    /// URL of a single `resource_type` with the given id.
    pub fn resource_url(&self, resource_type: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(resource_type),
            utf8_percent_encode(id, &ID_ENCODE_SET)
        )
    }
}
