// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::Serialize;

/// A user ID attached to a key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Identity {
    /// The validity or expiry token shown between brackets, such as
    /// `ultimate` or `expires: 2030-01-01`.
    pub(crate) expiry: String,
    pub(crate) name: String,
    pub(crate) mail: String,
}

/// Either the primary key of a record or one of its subkeys. Both are listed
/// in the same shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Subkey {
    pub(crate) fingerprint: String,
    pub(crate) algorithm: String,
    pub(crate) authentication: bool,
    pub(crate) grip: String,
}

/// Whether the agent's SSH support is allowed to use a key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Authorization {
    /// The authorization list has not been consulted.
    #[default]
    Unknown,
    Authorized,
    Unauthorized,
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Authorized => "authorized",
            Self::Unauthorized => "not authorized",
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Key {
    /// Fingerprint of the primary key.
    pub(crate) hash: String,
    /// The primary key is always at index 0.
    pub(crate) subkeys: Vec<Subkey>,
    pub(crate) identities: Vec<Identity>,
    pub(crate) authorization: Authorization,
}

impl Key {
    pub(crate) fn can_authenticate(&self) -> bool {
        self.subkeys.iter().any(|subkey| subkey.authentication)
    }

    /// The grip to hand to the agent when authorizing this key: the first
    /// authentication-capable subkey that has a grip at all.
    pub(crate) fn authorization_grip(&self) -> Option<&str> {
        self.subkeys
            .iter()
            .find(|subkey| subkey.authentication && !subkey.grip.is_empty())
            .map(|subkey| subkey.grip.as_str())
    }

    /// The fingerprint of the first authentication-capable subkey, which is
    /// what `gpg --export-ssh-key` needs.
    pub(crate) fn authentication_fingerprint(&self) -> Option<&str> {
        self.subkeys
            .iter()
            .find(|subkey| subkey.authentication)
            .map(|subkey| subkey.fingerprint.as_str())
            .filter(|fingerprint| !fingerprint.is_empty())
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.identities.iter().map(|identity| identity.name.as_str())
    }

    /// Compares against a fingerprint typed by a user, who may have copied it
    /// in the spaced-out form gpg prints or in lowercase.
    pub(crate) fn matches(&self, hash: &str) -> bool {
        let wanted: String = hash.chars().filter(|c| !c.is_whitespace()).collect();
        !self.hash.is_empty() && wanted.eq_ignore_ascii_case(&self.hash)
    }
}

#[cfg(test)]
mod tests {
    use serde_test::{assert_ser_tokens, Token};

    use super::*;

    fn subkey(authentication: bool, grip: &str, fingerprint: &str) -> Subkey {
        Subkey {
            fingerprint: fingerprint.to_owned(),
            algorithm: "ed25519".to_owned(),
            authentication,
            grip: grip.to_owned(),
        }
    }

    #[test]
    fn authorization_grip_skips_subkeys_without_grip() {
        let key = Key {
            subkeys: vec![
                subkey(false, "G0", "F0"),
                subkey(true, "", "F1"),
                subkey(true, "G2", "F2"),
                subkey(true, "G3", "F3"),
            ],
            ..Key::default()
        };

        assert_eq!(key.authorization_grip(), Some("G2"));
    }

    #[test]
    fn authorization_grip_needs_authentication() {
        let key = Key {
            subkeys: vec![subkey(false, "G0", "F0"), subkey(false, "G1", "F1")],
            ..Key::default()
        };

        assert!(!key.can_authenticate());
        assert_eq!(key.authorization_grip(), None);
    }

    #[test]
    fn authentication_fingerprint_uses_first_capable_subkey() {
        let key = Key {
            subkeys: vec![
                subkey(false, "G0", "F0"),
                subkey(true, "G1", ""),
                subkey(true, "G2", "F2"),
            ],
            ..Key::default()
        };

        assert_eq!(key.authentication_fingerprint(), None);

        let key = Key {
            subkeys: vec![subkey(false, "G0", "F0"), subkey(true, "G1", "F1")],
            ..Key::default()
        };

        assert_eq!(key.authentication_fingerprint(), Some("F1"));
    }

    #[test]
    fn matches_ignores_spacing_and_case() {
        let key = Key {
            hash: "AAAA1111BBBB2222".to_owned(),
            ..Key::default()
        };

        assert!(key.matches("AAAA1111BBBB2222"));
        assert!(key.matches("aaaa 1111 bbbb 2222"));
        assert!(!key.matches("AAAA1111BBBB222"));
        assert!(!key.matches("AAAA1111BBBB22223"));
        assert!(!Key::default().matches(""));
    }

    #[test]
    fn authorization_display() {
        assert_eq!(Authorization::Unknown.to_string(), "unknown");
        assert_eq!(Authorization::Authorized.to_string(), "authorized");
        assert_eq!(Authorization::Unauthorized.to_string(), "not authorized");
    }

    #[test]
    fn serialize_key() {
        let key = Key {
            hash: "AAAA".to_owned(),
            subkeys: vec![subkey(true, "GRIP", "AAAA")],
            identities: vec![Identity {
                expiry: "ultimate".to_owned(),
                name: "Alice".to_owned(),
                mail: "a@example.com".to_owned(),
            }],
            authorization: Authorization::Unauthorized,
        };

        assert_ser_tokens(
            &key,
            &[
                Token::Struct {
                    name: "Key",
                    len: 4,
                },
                Token::Str("hash"),
                Token::Str("AAAA"),
                Token::Str("subkeys"),
                Token::Seq { len: Some(1) },
                Token::Struct {
                    name: "Subkey",
                    len: 4,
                },
                Token::Str("fingerprint"),
                Token::Str("AAAA"),
                Token::Str("algorithm"),
                Token::Str("ed25519"),
                Token::Str("authentication"),
                Token::Bool(true),
                Token::Str("grip"),
                Token::Str("GRIP"),
                Token::StructEnd,
                Token::SeqEnd,
                Token::Str("identities"),
                Token::Seq { len: Some(1) },
                Token::Struct {
                    name: "Identity",
                    len: 3,
                },
                Token::Str("expiry"),
                Token::Str("ultimate"),
                Token::Str("name"),
                Token::Str("Alice"),
                Token::Str("mail"),
                Token::Str("a@example.com"),
                Token::StructEnd,
                Token::SeqEnd,
                Token::Str("authorization"),
                Token::UnitVariant {
                    name: "Authorization",
                    variant: "unauthorized",
                },
                Token::StructEnd,
            ],
        );
    }
}
