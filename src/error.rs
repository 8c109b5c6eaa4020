// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, path::PathBuf, result, time::Duration};

use thiserror::Error;

use crate::listing::{LineKind, State};

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("data conversion error: {0}")]
    Conversion(#[from] Conversion),
    #[error("cannot parse gpg output: {0}")]
    Parse(#[from] Parse),
    #[error("external command error: {0}")]
    Process(#[from] Process),
    #[error("agent error: {0}")]
    Agent(#[from] Agent),
    #[error("command execution failed")]
    Command,
    #[error(r#"there is no key with fingerprint "{}""#, .0.escape_default())]
    KeyNotFound(String),
}

#[derive(Error, Debug)]
pub(crate) enum Conversion {
    #[error("unexpected non-UTF-8-encoded bytes in output: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Structural problems in a key listing. Any of these aborts the whole parse.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Parse {
    #[error("line {line}: {kind} is not allowed {state}")]
    Unexpected {
        line: usize,
        kind: LineKind,
        state: State,
    },
}

#[derive(Error, Debug)]
pub(crate) enum Process {
    #[error("could not run {}: {source}", .program.display())]
    Spawn { program: PathBuf, source: io::Error },
    #[error("could not run {}: timed out after {} seconds", .program.display(), .timeout.as_secs())]
    Timeout { program: PathBuf, timeout: Duration },
}

#[derive(Error, Debug)]
pub(crate) enum Agent {
    #[error("the GnuPG home directory is unknown (use --homedir or set GNUPGHOME)")]
    NoHomeDirectory,
}
