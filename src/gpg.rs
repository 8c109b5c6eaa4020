// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{
    error::Result,
    listing,
    metadata,
    model::Key,
    process::{Output, Runner},
};

const LIST_KEYS: &[&str] = &["--with-keygrip", "--fingerprint", "--fingerprint", "-k"];

/// What `gpg --version` reports about itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Version {
    /// The first line, such as `gpg (GnuPG) 2.2.4`.
    pub(crate) version: String,
    pub(crate) home: Option<PathBuf>,
}

impl Version {
    pub(crate) fn parse(output: &str) -> Self {
        let mut lines = output.lines();
        Self {
            version: lines.next().unwrap_or_default().to_owned(),
            home: lines
                .find_map(|line| line.split_once("Home: "))
                .map(|(_, home)| PathBuf::from(home.trim())),
        }
    }

    pub(crate) fn is_validated(&self) -> bool {
        self.version == metadata::VALIDATED_VERSION
    }
}

/// A public key in OpenSSH format, as printed by `gpg --export-ssh-key`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SshKey(String);

impl SshKey {
    pub(crate) fn raw(&self) -> &str {
        &self.0
    }

    /// The base64 blob without the algorithm name and comment, for services
    /// that want only that part.
    pub(crate) fn stripped(&self) -> Option<&str> {
        let tokens: Vec<_> = self.0.split(' ').collect();
        if tokens.len() >= 3 {
            Some(tokens[1])
        } else {
            None
        }
    }
}

/// The `gpg` and `gpgconf` programs of one GnuPG installation.
pub(crate) struct Gpg<R> {
    runner: R,
    gpg: PathBuf,
    gpgconf: PathBuf,
    homedir: Option<PathBuf>,
}

impl<R: Runner> Gpg<R> {
    pub(crate) fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        runner: R,
        gpg: P,
        gpgconf: Q,
        homedir: Option<PathBuf>,
    ) -> Self {
        Self {
            runner,
            gpg: gpg.as_ref().to_owned(),
            gpgconf: gpgconf.as_ref().to_owned(),
            homedir,
        }
    }

    /// The home directory given on the command line, if any.
    pub(crate) fn configured_homedir(&self) -> Option<&Path> {
        self.homedir.as_deref()
    }

    #[cfg(test)]
    pub(crate) const fn runner(&self) -> &R {
        &self.runner
    }

    fn args(&self, args: &[&str]) -> Vec<OsString> {
        self.homedir
            .iter()
            .flat_map(|dir| [OsString::from("--homedir"), dir.into()])
            .chain(args.iter().map(OsString::from))
            .collect()
    }

    async fn gpg(&self, args: &[&str]) -> Result<Output> {
        self.runner.run(&self.gpg, &self.args(args)).await
    }

    async fn gpgconf(&self, args: &[&str]) -> Result<Output> {
        self.runner.run(&self.gpgconf, &self.args(args)).await
    }

    pub(crate) async fn version(&self) -> Result<Version> {
        let version = Version::parse(&self.gpg(&["--version"]).await?.stdout);
        if !version.is_validated() {
            warn!(
                "This tool was tested with {:?} but found {:?}; the key listing may not parse",
                metadata::VALIDATED_VERSION,
                version.version
            );
        }
        Ok(version)
    }

    /// Lists the public keys. Authorization is left unknown.
    pub(crate) async fn list_keys(&self) -> Result<Vec<Key>> {
        let output = self.gpg(LIST_KEYS).await?;
        let keys = listing::parse(output.lines())?;

        for key in &keys {
            info!("{}", key.hash);
            for subkey in &key.subkeys {
                info!(
                    "- {} {} {} {}",
                    subkey.algorithm,
                    if subkey.authentication { "AUTH" } else { "NO-AUTH" },
                    subkey.grip,
                    subkey.fingerprint
                );
            }
            for identity in &key.identities {
                info!("- {} {} {}", identity.name, identity.mail, identity.expiry);
            }
        }

        Ok(keys)
    }

    /// Exports exactly the given subkey; the trailing `!` stops gpg from
    /// picking a different authentication subkey on its own.
    pub(crate) async fn export_ssh_key(&self, fingerprint: &str) -> Result<SshKey> {
        let selector = format!("{fingerprint}!");
        let output = self.gpg(&["--export-ssh-key", selector.as_str()]).await?;
        if !output.stderr.is_empty() {
            warn!("{}", output.stderr.trim_end());
        }
        Ok(SshKey(output.stdout.trim_end().to_owned()))
    }

    pub(crate) async fn agent_options(&self) -> Result<Output> {
        self.gpgconf(&["--list-options", "gpg-agent"]).await
    }

    pub(crate) async fn restart_agent(&self) -> Result<()> {
        _ = self.gpgconf(&["--kill", "gpg-agent"]).await?;
        _ = self.gpgconf(&["--launch", "gpg-agent"]).await?;
        Ok(())
    }
}
