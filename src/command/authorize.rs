// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::{error, info};

use crate::{
    error::{self, Result},
    process::Runner,
    sshcontrol::{self, Plan},
};

use super::Context;

/// Allow gpg-agent to use a key for SSH authentication by adding its
/// authentication subkey to the sshcontrol file.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The fingerprint of the primary key, as shown by `keys`.
    #[clap()]
    hash: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute<R: Runner>(self, ctx: &Context<R>) -> Result<()> {
        let keys = ctx.keys().await?;
        let key = sshcontrol::find(&keys, &self.hash)?;

        match sshcontrol::plan(key) {
            Plan::Append(grip) => {
                let file = ctx.sshcontrol().await?;
                info!(
                    "Adding grip {} for fingerprint {} to ssh control file {}",
                    grip,
                    key.hash,
                    file.path().display()
                );
                file.append_line(grip).await?;

                let keys = ctx.keys().await?;
                let key = sshcontrol::find(&keys, &self.hash)?;
                println!("{}: {}", key.hash, key.authorization);
                Ok(())
            }
            Plan::AlreadyAuthorized => {
                println!("{}: {}", key.hash, key.authorization);
                Ok(())
            }
            Plan::NoSuitableSubkey => {
                println!(
                    "No suitable key (allowing authentication) found for fingerprint {}",
                    key.hash
                );
                Ok(())
            }
            Plan::Unreconciled => {
                error!(
                    "Cannot tell whether {} is already authorized without a GnuPG home directory",
                    key.hash
                );
                Err(error::Error::Command)
            }
        }
    }
}
