// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    error::Result,
    model::{Authorization, Key},
    process::Runner,
};

use super::Context;

/// List public keys and whether gpg-agent may use them for SSH.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Print the keys, including all subkeys and user IDs, as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Tabled)]
struct Row {
    #[tabled(rename = "Fingerprint")]
    hash: String,
    #[tabled(rename = "Names")]
    names: String,
    #[tabled(rename = "Can Authenticate")]
    can_authenticate: bool,
    #[tabled(rename = "SSH")]
    authorization: Authorization,
}

impl From<&Key> for Row {
    fn from(key: &Key) -> Self {
        Self {
            hash: key.hash.clone(),
            names: key.names().collect::<Vec<_>>().join("|"),
            can_authenticate: key.can_authenticate(),
            authorization: key.authorization,
        }
    }
}

impl Command {
    /// The text to print, if any. An empty table is not printed at all.
    fn render(&self, keys: &[Key]) -> Result<Option<String>> {
        if self.json {
            Ok(Some(serde_json::to_string_pretty(keys)?))
        } else if keys.is_empty() {
            Ok(None)
        } else {
            Ok(Some(
                Table::new(keys.iter().map(Row::from))
                    .with(Style::rounded())
                    .to_string(),
            ))
        }
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute<R: Runner>(self, ctx: &Context<R>) -> Result<()> {
        let keys = ctx.keys().await?;

        if let Some(output) = self.render(&keys)? {
            println!("{output}");
        }
        Ok(())
    }
}
