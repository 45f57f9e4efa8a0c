//! Player and administrator account identifiers.
//!
//! Accounts are Ed25519 public keys rendered as base58 strings. The action
//! layer parses every caller-supplied string into a [`PlayerId`] before it
//! reaches the tracker, so the tracker never sees a malformed identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a raw public key in bytes
pub const PUBKEY_LEN: usize = 32;

/// Identifier parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The string is not a base58 encoded 32-byte public key
    #[error("Malformed account identifier: {0}")]
    Malformed(String),
}

impl IdentifierError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            IdentifierError::Malformed(_) => "Invalid \"account\" provided".to_string(),
        }
    }
}

/// Canonical account identifier.
///
/// Two identifiers compare equal exactly when they encode the same key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Parse a base58 account string.
    ///
    /// Leading and trailing whitespace is ignored. The stored form is the
    /// re-encoded key, so differently padded inputs collapse to one id.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Malformed`] if the input is not valid
    /// base58 or does not decode to exactly 32 bytes.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let trimmed = input.trim();
        let bytes = bs58::decode(trimmed)
            .into_vec()
            .map_err(|_| IdentifierError::Malformed(trimmed.to_string()))?;

        if bytes.len() != PUBKEY_LEN {
            return Err(IdentifierError::Malformed(trimmed.to_string()));
        }

        Ok(Self(bs58::encode(bytes).into_string()))
    }

    /// Build an identifier from raw key bytes
    pub fn from_bytes(bytes: [u8; PUBKEY_LEN]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    /// Raw key bytes
    pub fn to_bytes(&self) -> [u8; PUBKEY_LEN] {
        let mut out = [0u8; PUBKEY_LEN];
        // Always decodable: constructed only through parse/from_bytes.
        if let Ok(bytes) = bs58::decode(&self.0).into_vec() {
            out.copy_from_slice(&bytes[..PUBKEY_LEN]);
        }
        out
    }

    /// Base58 form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened `ABCD...WXYZ` form used in leaderboard text
    pub fn short(&self) -> String {
        let s = &self.0;
        if s.len() <= 8 {
            return s.clone();
        }
        format!("{}...{}", &s[..4], &s[s.len() - 4..])
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlayerId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlayerId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";

    #[test]
    fn test_parse_valid_key() {
        let id = PlayerId::parse("9AhjZ7ybup47fvJNvFMCxhxVz3qs4serqVEXWmGAoMTx").unwrap();
        assert_eq!(id.as_str(), "9AhjZ7ybup47fvJNvFMCxhxVz3qs4serqVEXWmGAoMTx");
    }

    #[test]
    fn test_parse_all_zero_key() {
        let id = PlayerId::parse(SYSTEM_PROGRAM).unwrap();
        assert_eq!(id.to_bytes(), [0u8; 32]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = PlayerId::parse("  11111111111111111111111111111111\n").unwrap();
        assert_eq!(id.as_str(), SYSTEM_PROGRAM);
    }

    #[test]
    fn test_parse_rejects_invalid_alphabet() {
        // '0', 'O', 'I' and 'l' are not in the base58 alphabet
        let err = PlayerId::parse("0OIl").unwrap_err();
        assert!(matches!(err, IdentifierError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(PlayerId::parse("abc").is_err());
        assert!(PlayerId::parse("").is_err());
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut bytes = [0u8; 32];
        bytes[0] = 7;
        bytes[31] = 200;
        let id = PlayerId::from_bytes(bytes);
        assert_eq!(id.to_bytes(), bytes);
        assert_eq!(PlayerId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn test_short_form() {
        let id = PlayerId::parse("9AhjZ7ybup47fvJNvFMCxhxVz3qs4serqVEXWmGAoMTx").unwrap();
        assert_eq!(id.short(), "9Ahj...oMTx");
    }

    #[test]
    fn test_serde_rejects_malformed() {
        let parsed: Result<PlayerId, _> = serde_json::from_str("\"not-a-key\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_client_message_hides_input() {
        let err = IdentifierError::Malformed("secret".to_string());
        assert!(!err.client_message().contains("secret"));
    }
}
