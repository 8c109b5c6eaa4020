// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::indexing_slicing))]

mod agent;
mod command;
mod error;
mod gpg;
mod listing;
mod metadata;
mod model;
mod process;
mod sshcontrol;
mod storage;

use std::{path::PathBuf, process as host, time::Duration};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use command::Context;
use error::Result;
use log::error;
use process::Runner;

#[derive(Debug, Subcommand)]
enum Command {
    Version(command::version::Command),
    Keys(command::keys::Command),
    Authorize(command::authorize::Command),
    Export(command::export::Command),
    #[command(subcommand)]
    Agent(command::agent::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute<R: Runner>(self, ctx: &Context<R>) -> Result<()> {
        match self {
            Self::Version(cmd) => cmd.execute(ctx).await,
            Self::Keys(cmd) => cmd.execute(ctx).await,
            Self::Authorize(cmd) => cmd.execute(ctx).await,
            Self::Export(cmd) => cmd.execute(ctx).await,
            Self::Agent(cmd) => cmd.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The gpg program used to list and export keys.
    #[arg(long, env = "GPGSSHCTL_GPG", default_value = "gpg", value_hint = clap::ValueHint::ExecutablePath)]
    gpg: PathBuf,

    /// The gpgconf program used to query and restart gpg-agent.
    #[arg(long, env = "GPGSSHCTL_GPGCONF", default_value = "gpgconf", value_hint = clap::ValueHint::ExecutablePath)]
    gpgconf: PathBuf,

    /// The GnuPG home directory holding sshcontrol and gpg-agent.conf. When
    /// not given, the directory reported by `gpg --version` is used.
    #[arg(long, env = "GNUPGHOME", value_hint = clap::ValueHint::DirPath)]
    homedir: Option<PathBuf>,

    /// How many seconds to wait for gpg or gpgconf to finish.
    #[arg(long, default_value_t = metadata::DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    #[clap(subcommand)]
    command: Command,
}

async fn run(args: Args) -> Result<()> {
    let gpg = gpg::Gpg::new(
        process::System::new(Duration::from_secs(args.timeout)),
        args.gpg,
        args.gpgconf,
        args.homedir,
    );

    command::Command::execute(args.command, &Context::new(gpg)).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("GPGSSHCTL_LOG", "warn")
        .write_style("GPGSSHCTL_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        host::exit(1);
    };
}
