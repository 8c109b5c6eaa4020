// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use async_trait::async_trait;
use log::{info, warn};

use crate::{
    error::{Agent, Error, Result},
    gpg::Gpg,
    metadata,
    model::Key,
    process::Runner,
    sshcontrol,
    storage::LineFile,
};

pub(crate) mod agent;
pub(crate) mod authorize;
pub(crate) mod export;
pub(crate) mod keys;
pub(crate) mod version;

/// Everything a command needs to talk to the local GnuPG installation.
pub(crate) struct Context<R> {
    gpg: Gpg<R>,
}

impl<R: Runner> Context<R> {
    pub(crate) const fn new(gpg: Gpg<R>) -> Self {
        Self { gpg }
    }

    pub(crate) const fn gpg(&self) -> &Gpg<R> {
        &self.gpg
    }

    /// The configured home directory, or the one gpg reports.
    pub(crate) async fn homedir(&self) -> Result<PathBuf> {
        if let Some(dir) = self.gpg.configured_homedir() {
            return Ok(dir.to_owned());
        }

        self.gpg
            .version()
            .await?
            .home
            .ok_or(Error::Agent(Agent::NoHomeDirectory))
    }

    pub(crate) async fn sshcontrol(&self) -> Result<LineFile> {
        Ok(LineFile::new(
            self.homedir().await?.join(metadata::SSHCONTROL_FILE),
        ))
    }

    pub(crate) async fn agent_conf(&self) -> Result<LineFile> {
        Ok(LineFile::new(
            self.homedir().await?.join(metadata::AGENT_CONF_FILE),
        ))
    }

    /// Lists the keys and reconciles them with the `sshcontrol` file. When
    /// the home directory cannot be found, authorization stays unknown.
    pub(crate) async fn keys(&self) -> Result<Vec<Key>> {
        let mut keys = self.gpg.list_keys().await?;

        let sshcontrol = match self.sshcontrol().await {
            Ok(file) => file,
            Err(Error::Agent(e)) => {
                warn!("Cannot check which keys are authorized: {}", e);
                return Ok(keys);
            }
            Err(e) => return Err(e),
        };

        match sshcontrol.read_lines().await? {
            Some(grips) => sshcontrol::reconcile(&mut keys, grips.iter().map(String::as_str)),
            None => {
                info!(
                    "{} does not exist yet (it will be created when a key is authorized)",
                    sshcontrol.path().display()
                );
                sshcontrol::reset(&mut keys);
            }
        }

        Ok(keys)
    }
}

#[async_trait]
pub(crate) trait Command {
    async fn execute<R: Runner>(self, ctx: &Context<R>) -> Result<()>;
}


#[cfg(test)]
mod tests {
    use super::{testing::*, *};
    use crate::model::Authorization;

    #[tokio::test]
    async fn keys_without_sshcontrol_are_unauthorized() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let keys = context(listing(), Some(dir.path())).keys().await?;

        assert!(keys
            .iter()
            .all(|key| key.authorization == Authorization::Unauthorized));
        Ok(())
    }

    #[tokio::test]
    async fn keys_reconcile_with_sshcontrol() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("sshcontrol"), format!("{ALICE_AUTH_GRIP}\n"))?;
        let keys = context(listing(), Some(dir.path())).keys().await?;

        assert_eq!(keys[0].hash, ALICE);
        assert_eq!(keys[0].authorization, Authorization::Authorized);
        assert_eq!(keys[1].hash, BOB);
        assert_eq!(keys[1].authorization, Authorization::Unauthorized);
        Ok(())
    }

    #[tokio::test]
    async fn homedir_comes_from_gpg_version() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("sshcontrol"), format!("{ALICE_AUTH_GRIP}\n"))?;
        let runner = listing().with(
            &["--version"],
            &format!("gpg (GnuPG) 2.2.4\nHome: {}\n", dir.path().display()),
        );
        let keys = context(runner, None).keys().await?;

        assert_eq!(keys[0].authorization, Authorization::Authorized);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_homedir_leaves_authorization_unknown() -> Result<()> {
        let runner = listing().with(&["--version"], "gpg (GnuPG) 2.2.4\n");
        let keys = context(runner, None).keys().await?;

        assert!(keys
            .iter()
            .all(|key| key.authorization == Authorization::Unknown));
        Ok(())
    }
}
