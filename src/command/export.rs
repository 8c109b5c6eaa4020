// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;

use crate::{
    error::{self, Result},
    gpg::SshKey,
    process::Runner,
    sshcontrol,
};

use super::Context;

/// Print the SSH public key of a key's authentication subkey.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Print only the base64-encoded key, without the algorithm name and
    /// comment.
    #[arg(long)]
    stripped: bool,

    /// The fingerprint of the primary key, as shown by `keys`.
    #[clap()]
    hash: String,
}

impl Command {
    async fn ssh_key<R: Runner>(&self, ctx: &Context<R>) -> Result<SshKey> {
        let keys = ctx.gpg().list_keys().await?;
        let key = sshcontrol::find(&keys, &self.hash)?;

        // The primary fingerprint is not necessarily the one of the
        // authentication subkey.
        let Some(fingerprint) = key.authentication_fingerprint() else {
            error!("Cannot find a suitable key for ssh (no subkey with auth capability found)");
            return Err(error::Error::Command);
        };

        ctx.gpg().export_ssh_key(fingerprint).await
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute<R: Runner>(self, ctx: &Context<R>) -> Result<()> {
        let ssh_key = self.ssh_key(ctx).await?;

        if self.stripped {
            let Some(stripped) = ssh_key.stripped() else {
                error!("Unexpected output from gpg: {:?}", ssh_key.raw());
                return Err(error::Error::Command);
            };
            println!("{stripped}");
        } else {
            println!("{}", ssh_key.raw());
        }
        Ok(())
    }
}
