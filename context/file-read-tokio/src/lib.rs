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

//! Tokio-based file reading implementation for healthfetch.
//!
//! `TokioFileRead` implements the `FileRead` trait from `healthfetch_core`
//! using Tokio's file system operations. Credential providers use it to read
//! the shared AWS config and credentials files.
//!
//! ```no_run
//! use healthfetch_core::{Context, OsEnv};
//! use healthfetch_file_read_tokio::TokioFileRead;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_env(OsEnv);
//!
//!     match ctx.file_read("/path/to/credentials").await {
//!         Ok(content) => println!("Read {} bytes", content.len()),
//!         Err(e) => eprintln!("Failed to read file: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use healthfetch_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to read file {path}")).with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthfetch_core::{Context, ErrorKind};
    use std::io::Write;

    #[tokio::test]
    async fn test_file_read() -> Result<()> {
        let mut f = tempfile::NamedTempFile::new()?;
        f.write_all(b"[default]\nregion = us-west-2\n")?;

        let ctx = Context::new().with_file_read(TokioFileRead);
        let content = ctx
            .file_read_as_string(&f.path().to_string_lossy())
            .await?;
        assert_eq!(content, "[default]\nregion = us-west-2\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_file_read_not_found() {
        let err = TokioFileRead
            .file_read("/not_exist/credentials")
            .await
            .expect_err("missing file must fail");
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }
}
