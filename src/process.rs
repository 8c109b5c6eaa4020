// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    ffi::OsString,
    path::Path,
    process::Stdio,
    str,
    time::Duration,
};

use async_trait::async_trait;
use log::{debug, trace, warn};
use tokio::{process, time};

use crate::error::{Conversion, Process, Result};

/// Text captured from an external command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Output {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl Output {
    /// Lines of standard output followed by those of standard error, with
    /// either line terminator removed.
    pub(crate) fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().chain(self.stderr.lines())
    }
}

#[async_trait]
pub(crate) trait Runner: Send + Sync {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<Output>;
}

#[async_trait]
impl<T: Runner + ?Sized> Runner for Box<T> {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<Output> {
        (**self).run(program, args).await
    }
}

/// Runs programs on the host, giving up after a fixed time.
pub(crate) struct System {
    timeout: Duration,
}

impl System {
    pub(crate) const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Runner for System {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<Output> {
        debug!(
            "Running {} {}",
            program.display(),
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut command = process::Command::new(program);
        _ = command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        let captured = time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| Process::Timeout {
                program: program.to_owned(),
                timeout: self.timeout,
            })?
            .map_err(|source| Process::Spawn {
                program: program.to_owned(),
                source,
            })?;

        if !captured.status.success() {
            warn!("{} exited with {}", program.display(), captured.status);
        }

        let output = Output {
            stdout: str::from_utf8(&captured.stdout)
                .map_err(Conversion::from)?
                .to_owned(),
            stderr: str::from_utf8(&captured.stderr)
                .map_err(Conversion::from)?
                .to_owned(),
        };
        trace!("Output of {}: {:?}", program.display(), output);
        Ok(output)
    }
}
