// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Subcommand;
use log::warn;

use crate::{agent, error::Result, process::Runner};

use super::Context;

/// Inspect and configure gpg-agent.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Show whether PuTTY support is enabled.
    Status,
    /// Stop gpg-agent and start it again.
    Restart,
    /// Turn on PuTTY support in gpg-agent.conf and restart the agent.
    EnablePutty,
}

async fn putty_support_enabled<R: Runner>(ctx: &Context<R>) -> Result<bool> {
    let options = ctx.gpg().agent_options().await?;
    Ok(agent::putty_support_enabled(options.lines()))
}

async fn restart<R: Runner>(ctx: &Context<R>) -> Result<()> {
    ctx.gpg().restart_agent().await?;
    warn!("gpg-agent spawns processes to handle PuTTY requests, so restart your SSH client too");
    Ok(())
}

#[async_trait]
impl super::Command for Command {
    async fn execute<R: Runner>(self, ctx: &Context<R>) -> Result<()> {
        match self {
            Self::Status => {
                println!("PuTTY support: {}", putty_support_enabled(ctx).await?);
                Ok(())
            }
            Self::Restart => restart(ctx).await,
            Self::EnablePutty => {
                if putty_support_enabled(ctx).await? {
                    println!("PuTTY support: true");
                    return Ok(());
                }

                agent::enable_putty_support(&ctx.agent_conf().await?).await?;
                println!("PuTTY support: {}", putty_support_enabled(ctx).await?);
                restart(ctx).await
            }
        }
    }
}
