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

use std::io::Write;
use std::process::ExitCode;

use healthfetch::fhir::{default_fetcher, FailurePolicy, FetchSummary, Patient, Resource};
use healthfetch::time::{format_rfc3339, now};
use healthfetch::{default_context, Result};
use log::kv::{self, Key, Source, VisitSource};
use log::{error, info, warn};
use serde_json::{json, Map, Value};

fn main() -> ExitCode {
    let _ = dotenv::dotenv();
    init_logger();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to build tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(fetch_patients()) {
        Ok(summary) => {
            info!(
                "fetched {} of {} patients",
                summary.fetched, summary.entries
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("error fetching patients: {err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn fetch_patients() -> Result<FetchSummary> {
    let ctx = default_context();
    let policy = FailurePolicy::from_env(&ctx)?;
    let fetcher = default_fetcher(ctx)?;
    info!(
        "fetching patients from {} with policy {policy}",
        fetcher.config().collection_url(Patient::RESOURCE_TYPE)
    );

    let report = fetcher.run::<Patient>(policy, |_| {}).await?;
    if report.failed() > 0 {
        warn!(
            "{} of {} patient fetches failed",
            report.failed(),
            report.outcomes.len()
        );
    }
    report.into_result()
}

/// Log one JSON object per line, `debug` unless `RUST_LOG` says otherwise.
fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format(|buf, record| writeln!(buf, "{}", log_line(record)))
        .init();
}

fn log_line(record: &log::Record) -> Value {
    let mut line = json!({
        "level": record.level().to_string(),
        "time": format_rfc3339(now()),
        "target": record.target(),
        "msg": record.args().to_string(),
    });
    if let Some(fields) = line.as_object_mut() {
        // Fields never fails to visit.
        let _ = record.key_values().visit(&mut Fields(fields));
    }
    line
}

/// Copies the key-values of a record into its JSON line.
struct Fields<'a>(&'a mut Map<String, Value>);

impl<'kvs> VisitSource<'kvs> for Fields<'_> {
    fn visit_pair(
        &mut self,
        key: Key<'kvs>,
        value: kv::Value<'kvs>,
    ) -> std::result::Result<(), kv::Error> {
        let value =
            serde_json::to_value(&value).unwrap_or_else(|_| Value::String(value.to_string()));
        self.0.insert(key.as_str().to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_log_line() {
        let line = log_line(
            &log::Record::builder()
                .args(format_args!("fetching a single Patient with an id of: (p1)"))
                .level(log::Level::Info)
                .target("healthfetch_fhir::workflow")
                .build(),
        );

        assert_eq!(line["level"], "INFO");
        assert_eq!(line["target"], "healthfetch_fhir::workflow");
        assert_eq!(line["msg"], "fetching a single Patient with an id of: (p1)");
        assert!(line["time"].as_str().is_some_and(|t| t.ends_with('Z')));
    }

    #[test]
    fn test_log_line_keeps_record_structured() {
        let patient = json!({
            "resourceType": "Patient",
            "id": "p1",
            "name": [{"family": "Doe", "given": ["Jane"]}]
        });
        let kvs = [("resource", kv::Value::from_serde(&patient))];

        let line = log_line(
            &log::Record::builder()
                .args(format_args!("fetched Patient with an id of: (p1)"))
                .level(log::Level::Info)
                .target("healthfetch_fhir::workflow")
                .key_values(&kvs)
                .build(),
        );

        assert_eq!(line["msg"], "fetched Patient with an id of: (p1)");
        assert_eq!(line["resource"], patient);
    }
}
