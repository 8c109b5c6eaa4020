// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Parser for the output of `gpg --with-keygrip --fingerprint --fingerprint -k`.

pub(crate) mod decode;

use std::{fmt, mem};

use log::{debug, trace};

use crate::{
    error::Parse,
    model::{Key, Subkey},
};

/// How a listing line is interpreted, decided from its text alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LineKind {
    PrimaryKey,
    Subkey,
    Identity,
    Keygrip,
    Fingerprint,
    Blank,
    Other,
}

impl LineKind {
    pub(crate) fn classify(line: &str) -> Self {
        if line.starts_with("pub") {
            Self::PrimaryKey
        } else if line.starts_with("sub") {
            Self::Subkey
        } else if line.starts_with("uid") {
            Self::Identity
        } else if line.contains("Keygrip") {
            Self::Keygrip
        } else if line.starts_with(decode::INDENT) {
            Self::Fingerprint
        } else if line.is_empty() {
            Self::Blank
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PrimaryKey => "a primary key line",
            Self::Subkey => "a subkey line",
            Self::Identity => "a user ID line",
            Self::Keygrip => "a keygrip line",
            Self::Fingerprint => "a fingerprint line",
            Self::Blank => "a blank line",
            Self::Other => "an unrecognized line",
        })
    }
}

/// Where the parser is relative to the key records in the listing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum State {
    /// Between records.
    #[default]
    Outside,
    /// After a `pub` line, before any `sub` line of the same record.
    Primary,
    /// After at least one `sub` line. User IDs are no longer accepted.
    Subkeys,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Outside => "outside of a key record",
            Self::Primary => "inside a key record",
            Self::Subkeys => "after the subkeys of a key record",
        })
    }
}

/// Parsing state. The most recent subkey of the open record is kept apart
/// from `pending` until the next `sub` line or the end of the record, so
/// keygrip and fingerprint lines always have a subkey to land on.
#[derive(Debug, Default)]
struct Parser {
    state: State,
    keys: Vec<Key>,
    pending: Key,
    subkey: Subkey,
}

impl Parser {
    fn feed(mut self, line_number: usize, line: &str) -> Result<Self, Parse> {
        let kind = LineKind::classify(line);
        trace!("Line {}: {:?} in {:?}", line_number, kind, self.state);

        match (kind, self.state) {
            (LineKind::PrimaryKey, State::Outside) => {
                self.subkey = decode::subkey(line);
                self.state = State::Primary;
            }
            (LineKind::Subkey, State::Primary | State::Subkeys) => {
                let previous = mem::replace(&mut self.subkey, decode::subkey(line));
                self.pending.subkeys.push(previous);
                self.state = State::Subkeys;
            }
            (LineKind::Identity, State::Primary) => {
                self.pending.identities.push(decode::identity(line));
            }
            (LineKind::Keygrip, State::Primary | State::Subkeys) => {
                self.subkey.grip = decode::keygrip(line);
            }
            (LineKind::Fingerprint, State::Primary | State::Subkeys) => {
                self.subkey.fingerprint = decode::fingerprint(line);
                if self.state == State::Primary {
                    self.pending.hash.clone_from(&self.subkey.fingerprint);
                }
            }
            (LineKind::Blank, State::Primary | State::Subkeys) => {
                self.pending.subkeys.push(mem::take(&mut self.subkey));
                self.keys.push(mem::take(&mut self.pending));
                self.state = State::Outside;
            }
            (LineKind::Blank, State::Outside)
            | (LineKind::Other, State::Outside | State::Primary | State::Subkeys) => {}
            (LineKind::PrimaryKey, State::Primary | State::Subkeys)
            | (
                LineKind::Subkey | LineKind::Identity | LineKind::Keygrip | LineKind::Fingerprint,
                State::Outside,
            )
            | (LineKind::Identity, State::Subkeys) => {
                return Err(Parse::Unexpected {
                    line: line_number,
                    kind,
                    state: self.state,
                });
            }
        }

        Ok(self)
    }

    fn finish(self) -> Vec<Key> {
        // gpg always ends a record with a blank line, so a record still open
        // here was cut short.
        if self.state != State::Outside {
            debug!(
                "Discarding unterminated key record {:?} at end of listing",
                self.pending.hash
            );
        }
        self.keys
    }
}

/// Builds the keys described by a listing. Records are only kept once the
/// blank line that closes them has been seen. Any structural problem discards
/// everything parsed so far.
pub(crate) fn parse<'line, I>(lines: I) -> Result<Vec<Key>, Parse>
where
    I: IntoIterator<Item = &'line str>,
{
    let keys = lines
        .into_iter()
        .enumerate()
        .try_fold(Parser::default(), |parser, (index, line)| {
            parser.feed(index + 1, line)
        })?
        .finish();

    debug!("Parsed {} keys from listing", keys.len());
    Ok(keys)
}
