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

// Env values
/// Host name of the HealthLake API, e.g. `healthlake.us-west-2.amazonaws.com`.
pub const ENDPOINT: &str = "ENDPOINT";
/// Data store identifier, may contain slashes such as `datastore/<id>`.
pub const DATASTORE: &str = "DATASTORE";
/// Region used to scope the signing key.
pub const AWS_REGION: &str = "AWS_REGION";
/// Service name used to scope the signing key.
pub const HEALTHLAKE_SERVICE: &str = "HEALTHLAKE_SERVICE";
/// Failure policy of the fetch workflow, `fail-fast` or `continue`.
pub const FAILURE_POLICY: &str = "FAILURE_POLICY";

// Defaults
/// Region used when `AWS_REGION` is not set.
pub const DEFAULT_REGION: &str = "us-west-2";
/// Service used when `HEALTHLAKE_SERVICE` is not set.
pub const DEFAULT_SERVICE: &str = "healthlake";

/// FHIR release segment of every resource path.
pub const FHIR_VERSION: &str = "r4";

/// Content type sent with every request.
pub const CONTENT_TYPE_FHIR_JSON: &str = "application/json; charset=utf-8";
