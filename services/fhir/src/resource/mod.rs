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

//! Typed FHIR resources and the Bundle envelope they arrive in.

mod bundle;
pub use bundle::{Bundle, BundleEntry};

mod patient;
pub use patient::{Address, ContactPoint, HumanName, Identifier, Meta, Patient};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A FHIR resource kind that can be fetched by type and id.
pub trait Resource: DeserializeOwned + Serialize + Send + 'static {
    /// The `resourceType` of this kind, also its path segment.
    const RESOURCE_TYPE: &'static str;

    /// The `resourceType` the payload carried.
    fn resource_type(&self) -> &str;

    /// The logical id of this resource, if the payload carried one.
    fn id(&self) -> Option<&str>;
}
