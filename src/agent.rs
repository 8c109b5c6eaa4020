// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::info;

use crate::{error::Result, storage::LineFile};

pub(crate) const PUTTY_SUPPORT_OPTION: &str = "enable-putty-support";

/// Index of the current value in a `gpgconf --list-options` record, whose
/// fields are `name:flags:level:description:type:alt-type:argname:default:argdef:value`.
const VALUE_FIELD: usize = 9;

/// Whether `gpgconf --list-options gpg-agent` reports PuTTY support as
/// switched on.
pub(crate) fn putty_support_enabled<'line, I>(lines: I) -> bool
where
    I: IntoIterator<Item = &'line str>,
{
    lines
        .into_iter()
        .filter(|line| line.starts_with(PUTTY_SUPPORT_OPTION))
        .any(|line| line.split(':').nth(VALUE_FIELD) == Some("1"))
}

/// Appends the option that turns on PuTTY support to the agent
/// configuration. The agent has to be restarted to notice.
pub(crate) async fn enable_putty_support(conf: &LineFile) -> Result<()> {
    info!(
        "Adding {:?} to gpg-agent configuration file {}",
        PUTTY_SUPPORT_OPTION,
        conf.path().display()
    );
    conf.append_line(PUTTY_SUPPORT_OPTION).await
}
