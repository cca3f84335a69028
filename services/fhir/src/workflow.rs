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

use std::fmt::{self, Display};
use std::str::FromStr;

use healthfetch_core::{Context, Error, Result};
use log::{info, kv, warn};

use crate::constants::FAILURE_POLICY;
use crate::resource::Resource;
use crate::Fetcher;

/// What the workflow does when fetching a single entry fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failed entry, later entries are never fetched.
    #[default]
    FailFast,
    /// Record the failure and go on with the next entry.
    ContinueOnError,
}

impl FailurePolicy {
    /// Load the policy from `FAILURE_POLICY`, defaulting to `FailFast`.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        match ctx.env_var(FAILURE_POLICY) {
            Some(v) if !v.is_empty() => v.parse(),
            _ => Ok(Self::default()),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fail-fast" => Ok(Self::FailFast),
            "continue" => Ok(Self::ContinueOnError),
            v => Err(Error::config_invalid(format!(
                "failure policy must be fail-fast or continue, got {v}"
            ))),
        }
    }
}

impl Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => f.write_str("fail-fast"),
            Self::ContinueOnError => f.write_str("continue"),
        }
    }
}

/// Outcome of one attempted bundle entry.
#[derive(Debug)]
pub struct EntryOutcome {
    /// Position of the entry in the bundle.
    pub index: usize,
    /// Id of the entry, `None` when it couldn't be decoded.
    pub id: Option<String>,
    /// `Ok` once the record was fetched and handed over.
    pub result: Result<()>,
}

/// Result of a whole run: one outcome per attempted entry, in bundle order.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Number of entries in the collection.
    pub entries: usize,
    /// Outcomes of the attempted entries.
    pub outcomes: Vec<EntryOutcome>,
}

/// Counters of a run without failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    /// Number of entries in the collection.
    pub entries: usize,
    /// Number of records fetched.
    pub fetched: usize,
}

impl FetchReport {
    /// Number of entries that were fetched.
    pub fn fetched(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of entries that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.fetched()
    }

    /// Returns true if every entry was fetched.
    pub fn is_complete(&self) -> bool {
        self.outcomes.len() == self.entries && self.failed() == 0
    }

    /// Convert into a summary, or the first recorded error.
    pub fn into_result(self) -> Result<FetchSummary> {
        let summary = FetchSummary {
            entries: self.entries,
            fetched: self.fetched(),
        };

        match self.outcomes.into_iter().find_map(|o| o.result.err()) {
            Some(err) => Err(err),
            None => Ok(summary),
        }
    }
}

impl Fetcher {
    /// Fetch the collection of `T`, then fetch every entry again by its id.
    ///
    /// Each fetched record is logged and handed to `on_record`. A failing
    /// collection fetch, or a local error such as a missing credential, is
    /// returned as `Err`. Failures of single entries are recorded in the
    /// report and handled according to `policy`.
    pub async fn run<T: Resource>(
        &self,
        policy: FailurePolicy,
        mut on_record: impl FnMut(T),
    ) -> Result<FetchReport> {
        info!("fetching a batch of {}", T::RESOURCE_TYPE);
        let bundle = self.fetch_collection::<T>().await?;

        let mut report = FetchReport {
            entries: bundle.entries().len(),
            outcomes: Vec::with_capacity(bundle.entries().len()),
        };
        info!(
            "fetched a batch of {} {} entries",
            report.entries,
            T::RESOURCE_TYPE
        );

        for (index, entry) in bundle.entries().iter().enumerate() {
            let (id, result) = match entry.resource_id() {
                Ok(id) => {
                    info!("fetching a single {} with an id of: ({id})", T::RESOURCE_TYPE);
                    let result = self.fetch_by_id::<T>(&id).await.map(|record| {
                        info!(
                            resource = kv::Value::from_serde(&record);
                            "fetched {} with an id of: ({id})",
                            T::RESOURCE_TYPE
                        );
                        on_record(record);
                    });
                    (Some(id), result)
                }
                Err(err) => (None, Err(err)),
            };

            let failed = match result {
                Err(err) if err.is_local() => return Err(err),
                Err(err) => {
                    warn!(
                        "failed to fetch {} entry {index} ({}): {err:?}",
                        T::RESOURCE_TYPE,
                        id.as_deref().unwrap_or("<no id>"),
                    );
                    report.outcomes.push(EntryOutcome {
                        index,
                        id,
                        result: Err(err),
                    });
                    true
                }
                Ok(()) => {
                    report.outcomes.push(EntryOutcome {
                        index,
                        id,
                        result: Ok(()),
                    });
                    false
                }
            };

            if failed && policy == FailurePolicy::FailFast {
                break;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthfetch_core::{ErrorKind, StaticEnv};
    use std::collections::HashMap;
    use test_case::test_case;

    fn context(policy: Option<&str>) -> Context {
        Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: policy
                .map(|v| HashMap::from([(FAILURE_POLICY.to_string(), v.to_string())]))
                .unwrap_or_default(),
        })
    }

    #[test_case(None => FailurePolicy::FailFast ; "default")]
    #[test_case(Some("") => FailurePolicy::FailFast ; "empty")]
    #[test_case(Some("fail-fast") => FailurePolicy::FailFast ; "fail fast")]
    #[test_case(Some("continue") => FailurePolicy::ContinueOnError ; "continue")]
    fn test_policy_from_env(v: Option<&str>) -> FailurePolicy {
        FailurePolicy::from_env(&context(v)).expect("policy must be valid")
    }

    #[test]
    fn test_policy_from_env_invalid() {
        let err = FailurePolicy::from_env(&context(Some("retry"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_policy_display_parses_back() -> anyhow::Result<()> {
        for p in [FailurePolicy::FailFast, FailurePolicy::ContinueOnError] {
            assert_eq!(p.to_string().parse::<FailurePolicy>()?, p);
        }
        Ok(())
    }

    #[test]
    fn test_report_into_result() {
        let ok = FetchReport {
            entries: 2,
            outcomes: vec![
                EntryOutcome {
                    index: 0,
                    id: Some("p1".to_string()),
                    result: Ok(()),
                },
                EntryOutcome {
                    index: 1,
                    id: Some("p2".to_string()),
                    result: Ok(()),
                },
            ],
        };
        assert!(ok.is_complete());
        assert_eq!(
            ok.into_result().expect("report must succeed"),
            FetchSummary {
                entries: 2,
                fetched: 2
            }
        );

        let failed = FetchReport {
            entries: 3,
            outcomes: vec![
                EntryOutcome {
                    index: 0,
                    id: Some("p1".to_string()),
                    result: Ok(()),
                },
                EntryOutcome {
                    index: 1,
                    id: None,
                    result: Err(Error::decode("bundle entry resource has no id")),
                },
                EntryOutcome {
                    index: 2,
                    id: Some("p3".to_string()),
                    result: Err(Error::transport("connection reset")),
                },
            ],
        };
        assert!(!failed.is_complete());
        assert_eq!(failed.fetched(), 1);
        assert_eq!(failed.failed(), 2);
        let err = failed.into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
