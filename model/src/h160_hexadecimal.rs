//! Serde module serializing `H160` as a `0x` prefixed hex string.

use primitive_types::H160;
use serde::{de, Deserializer, Serializer};
use std::fmt;

pub fn serialize<S>(value: &H160, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("0x{}", hex::encode(value.as_fixed_bytes())))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<H160, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor {}
    impl de::Visitor<'_> for Visitor {
        type Value = H160;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a 20 byte hex encoded address")
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let mut value = [0u8; 20];
            hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), value.as_mut()).map_err(
                |err| de::Error::custom(format!("failed to decode {:?} as hex: {}", s, err)),
            )?;
            Ok(H160(value))
        }
    }

    deserializer.deserialize_str(Visitor {})
}
