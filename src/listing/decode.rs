// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Field extraction for individual listing lines.
//!
//! A line that does not have the exact expected shape decodes to empty
//! fields instead of failing. Whether a line is allowed at all is the
//! parser's business.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::model::{Identity, Subkey};

/// Continuation lines (fingerprints and grips) are indented by this much.
pub(crate) const INDENT: &str = "      ";

/// The capability letter that allows a key to be used for authentication.
const AUTHENTICATE: char = 'A';

// LINT: These expressions are constants; the tests below compile each one.
#[allow(clippy::expect_used)]
static SUBKEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(pub|sub) {3}(?P<algo>.*) \[(?P<capa>[A-Z]+)\]")
        .expect("subkey expression should compile")
});

#[allow(clippy::expect_used)]
static IDENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^uid {10}\[(?P<exp>.*)\] (?P<name>.+) <(?P<mail>.+)>")
        .expect("identity expression should compile")
});

#[allow(clippy::expect_used)]
static KEYGRIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {6}Keygrip = (?P<grip>.*)").expect("keygrip expression should compile")
});

fn group(caps: &Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map_or_else(String::new, |m| m.as_str().to_owned())
}

/// Decodes a `pub` or `sub` line, such as `sub   ed25519 2019-02-11 [A]`.
/// The fingerprint and grip are left empty; they arrive on later lines.
pub(crate) fn subkey(line: &str) -> Subkey {
    SUBKEY
        .captures(line)
        .map_or_else(Subkey::default, |caps| Subkey {
            algorithm: group(&caps, "algo"),
            authentication: group(&caps, "capa").contains(AUTHENTICATE),
            ..Subkey::default()
        })
}

/// Decodes a `uid` line, such as `uid          [ultimate] Alice <a@example.com>`.
pub(crate) fn identity(line: &str) -> Identity {
    IDENTITY
        .captures(line)
        .map_or_else(Identity::default, |caps| Identity {
            expiry: group(&caps, "exp"),
            name: group(&caps, "name"),
            mail: group(&caps, "mail"),
        })
}

pub(crate) fn keygrip(line: &str) -> String {
    KEYGRIP
        .captures(line)
        .map_or_else(String::new, |caps| group(&caps, "grip"))
}

/// Drops the indentation and the grouping spaces gpg puts in fingerprints.
pub(crate) fn fingerprint(line: &str) -> String {
    line.strip_prefix(INDENT)
        .unwrap_or(line)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
