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

use healthfetch_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// A container for a collection of resources, as returned by a search.
///
/// Entries keep their resource as raw JSON so each one can be decoded on
/// its own: a broken entry doesn't prevent reading the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<BundleEntry>>,
}

impl Bundle {
    /// The `resourceType` every bundle carries.
    pub const RESOURCE_TYPE: &'static str = "Bundle";

    /// Entries of this bundle in server order, empty when `entry` is absent.
    pub fn entries(&self) -> &[BundleEntry] {
        self.entry.as_deref().unwrap_or_default()
    }
}

/// One entry of a [`Bundle`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Box<RawValue>>,
}

#[derive(Deserialize)]
struct ResourceId {
    id: Option<String>,
}

impl BundleEntry {
    fn raw(&self) -> Result<&RawValue> {
        self.resource
            .as_deref()
            .ok_or_else(|| Error::decode("bundle entry has no resource"))
    }

    /// Decode only the `id` of the embedded resource.
    ///
    /// An absent, empty or non-string id is a `Decode` error.
    pub fn resource_id(&self) -> Result<String> {
        let raw = self.raw()?;
        let rid: ResourceId = serde_json::from_str(raw.get()).map_err(|e| {
            Error::decode("failed to decode id of bundle entry resource").with_source(e)
        })?;

        match rid.id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(Error::decode("bundle entry resource has no id")),
        }
    }

    /// Decode the embedded resource into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self.raw()?;
        serde_json::from_str(raw.get())
            .map_err(|e| Error::decode("failed to decode bundle entry resource").with_source(e))
    }
}
