// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// The GnuPG release whose listing format this tool was checked against.
pub(crate) const VALIDATED_VERSION: &str = "gpg (GnuPG) 2.2.4";

pub(crate) const SSHCONTROL_FILE: &str = "sshcontrol";
pub(crate) const AGENT_CONF_FILE: &str = "gpg-agent.conf";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
