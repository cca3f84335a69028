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

//! Signed retrieval of FHIR resources from AWS HealthLake.
//!
//! This crate bundles the healthfetch crates behind one dependency:
//!
//! - [`aws`]: SigV4 request signing and AWS credential providers.
//! - [`fhir`]: the FHIR resource fetcher and its workflow.
//! - Everything from `healthfetch-core` at the crate root.
//!
//! With the `default-context` feature (on by default), [`default_context`]
//! wires tokio file reads, a reqwest transport and the OS environment
//! together, and [`fhir::default_fetcher`] builds a ready to use fetcher:
//!
//! ```no_run
//! use healthfetch::fhir::{default_fetcher, FailurePolicy, Patient};
//!
//! # async fn example() -> healthfetch::Result<()> {
//! let fetcher = default_fetcher(healthfetch::default_context())?;
//! let report = fetcher
//!     .run::<Patient>(FailurePolicy::FailFast, |p| println!("{:?}", p.id))
//!     .await?;
//! report.into_result()?;
//! # Ok(())
//! # }
//! ```

pub use healthfetch_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

pub mod aws;
pub mod fhir;
