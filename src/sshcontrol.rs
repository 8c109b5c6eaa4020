// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Cross-referencing keys against the agent's `sshcontrol` file, which lists
//! one keygrip per line.

use log::debug;

use crate::{
    error::{Error, Result},
    model::{Authorization, Key},
};

/// Marks every key as not authorized. This is also the outcome when the
/// `sshcontrol` file does not exist.
pub(crate) fn reset(keys: &mut [Key]) {
    for key in keys {
        key.authorization = Authorization::Unauthorized;
    }
}

/// Recomputes the authorization of every key from the given grips. A key is
/// authorized when any of its subkeys has a grip that matches a line exactly.
pub(crate) fn reconcile<'grip, I>(keys: &mut [Key], grips: I)
where
    I: IntoIterator<Item = &'grip str>,
{
    reset(keys);

    for grip in grips {
        for key in keys.iter_mut() {
            if key.subkeys.iter().any(|subkey| subkey.grip == grip) {
                debug!("Grip {} authorizes key {}", grip, key.hash);
                key.authorization = Authorization::Authorized;
            }
        }
    }
}

pub(crate) fn find<'key>(keys: &'key [Key], hash: &str) -> Result<&'key Key> {
    keys.iter()
        .find(|key| key.matches(hash))
        .ok_or_else(|| Error::KeyNotFound(hash.to_owned()))
}

/// What authorizing a key amounts to.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Plan<'key> {
    /// Append this grip to the `sshcontrol` file.
    Append(&'key str),
    AlreadyAuthorized,
    /// The key has not been reconciled against the `sshcontrol` file.
    Unreconciled,
    /// No subkey can authenticate, or none that can has a grip.
    NoSuitableSubkey,
}

pub(crate) fn plan(key: &Key) -> Plan<'_> {
    match key.authorization {
        Authorization::Unknown => Plan::Unreconciled,
        Authorization::Authorized => Plan::AlreadyAuthorized,
        Authorization::Unauthorized => key
            .authorization_grip()
            .map_or(Plan::NoSuitableSubkey, Plan::Append),
    }
}
