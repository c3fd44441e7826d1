//! Serde helper for [`MachWord`] fields.
//!
//! TOML integers are signed 64-bit, so addresses at or above `1 << 63` have no
//! integer form. Words are written as `"0x..."` strings and read back from
//! either a plain integer or a string (hex with `0x`, or decimal, underscores
//! allowed).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

use crate::MachWord;

#[derive(Deserialize)]
#[serde(untagged)]
enum WordSerde {
    Int(u64),
    Text(String),
}

pub(crate) fn serialize<S>(
    word: &MachWord,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("0x{word:x}"))
}

pub(crate) fn deserialize<'de, D>(
    deserializer: D,
) -> std::result::Result<MachWord, D::Error>
where
    D: Deserializer<'de>,
{
    match WordSerde::deserialize(deserializer)? {
        WordSerde::Int(value) => Ok(value),
        WordSerde::Text(text) => parse_word(&text).map_err(D::Error::custom),
    }
}

/// Parse `0x`-prefixed hex or decimal, ignoring `_` separators.
pub(crate) fn parse_word(s: &str) -> std::result::Result<MachWord, String> {
    let cleaned = s.trim().replace('_', "");
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => MachWord::from_str_radix(hex, 16),
        None => cleaned.parse::<MachWord>(),
    };
    parsed.map_err(|e| format!("invalid machine word '{s}': {e}"))
}
