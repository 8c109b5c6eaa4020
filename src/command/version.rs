// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, process::Runner};

use super::Context;

/// Show the GnuPG version and home directory in use.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute<R: Runner>(self, ctx: &Context<R>) -> Result<()> {
        let version = ctx.gpg().version().await?;
        let home = ctx
            .gpg()
            .configured_homedir()
            .map(ToOwned::to_owned)
            .or(version.home);

        println!("{}", version.version);
        match home {
            Some(dir) => println!("Home: {}", dir.display()),
            None => println!("Home: unknown"),
        }
        Ok(())
    }
}
