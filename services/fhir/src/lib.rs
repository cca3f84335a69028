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

//! FHIR resource fetching for healthfetch.
//!
//! [`Fetcher`] reads resources from a FHIR R4 data store such as AWS
//! HealthLake. It fetches a collection as a [`Bundle`], then fetches every
//! entry again by its id, signing each request with SigV4.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use healthfetch_aws_v4::{DefaultCredentialProvider, RequestSigner};
//! use healthfetch_core::{Context, OsEnv, Signer};
//! use healthfetch_fhir::{EndpointConfig, FailurePolicy, Fetcher, Patient};
//!
//! # async fn example() -> healthfetch_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let config = EndpointConfig::from_env(&ctx)?;
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::new(&config.service, &config.region),
//! );
//!
//! let fetcher = Fetcher::new(Arc::new(config), signer);
//! let report = fetcher
//!     .run::<Patient>(FailurePolicy::FailFast, |p| println!("{:?}", p.id))
//!     .await?;
//! println!("fetched {} patients", report.fetched());
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::*;

mod config;
pub use config::EndpointConfig;

mod resource;
pub use resource::*;

mod fetcher;
pub use fetcher::Fetcher;

mod workflow;
pub use workflow::{EntryOutcome, FailurePolicy, FetchReport, FetchSummary};
