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

//! FHIR resource fetching.

pub use healthfetch_fhir::*;

use std::sync::Arc;

use crate::aws::signer_with_context;
use crate::{Context, Result};

/// Create a fetcher configured from the environment of `ctx`.
///
/// The endpoint comes from [`EndpointConfig::from_env`], and requests are
/// signed for its service and region with credentials loaded through
/// the default AWS credential chain.
pub fn default_fetcher(ctx: Context) -> Result<Fetcher> {
    let config = EndpointConfig::from_env(&ctx)?;
    let signer = signer_with_context(ctx, &config.service, &config.region);

    Ok(Fetcher::new(Arc::new(config), signer))
}
