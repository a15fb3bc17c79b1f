//! Bid types as submitted by node operators and stored by the engine.

use crate::{h160_hexadecimal, u256_decimal};
use primitive_types::{H160, U256};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display};
use std::str::FromStr;

/// The set of bid groups the auction recognizes. A group collects bids that
/// compete for a slot in a cluster of the size encoded in the tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum BidGroup {
    JoinCluster4,
    JoinCluster7,
}

impl BidGroup {
    pub const ALL: [BidGroup; 2] = [BidGroup::JoinCluster4, BidGroup::JoinCluster7];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JoinCluster4 => "JOIN_CLUSTER_4",
            Self::JoinCluster7 => "JOIN_CLUSTER_7",
        }
    }
}

impl Display for BidGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown bid group {0:?}")]
pub struct UnknownBidGroup(pub String);

impl FromStr for BidGroup {
    type Err = UnknownBidGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JOIN_CLUSTER_4" => Ok(Self::JoinCluster4),
            "JOIN_CLUSTER_7" => Ok(Self::JoinCluster7),
            _ => Err(UnknownBidGroup(s.to_string())),
        }
    }
}

impl Serialize for BidGroup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BidGroup {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Stable opaque bid identifier, derived from the submitting node operator
/// and its per-operator submission nonce. 32 bytes serialized as hex.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct BidId(pub [u8; 32]);

impl BidId {
    /// Derives the identifier for the nonce-th bid of a node operator.
    pub fn derive(node_operator: H160, nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(node_operator.as_fixed_bytes());
        hasher.update(nonce.to_be_bytes());
        Self(hasher.finalize().into())
    }
}

impl Display for BidId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for BidId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BidId({})", self)
    }
}

impl FromStr for BidId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut value = [0u8; 32];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), value.as_mut())?;
        Ok(Self(value))
    }
}

impl Serialize for BidId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BidId {
    fn deserialize<D>(deserializer: D) -> Result<BidId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor {}
        impl de::Visitor<'_> for Visitor {
            type Value = BidId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a hex encoded 32 byte bid id")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                s.parse().map_err(|err| {
                    de::Error::custom(format!("failed to decode {:?} as bid id: {}", s, err))
                })
            }
        }

        deserializer.deserialize_str(Visitor {})
    }
}

/// A bid as provided to the auctioneer by a node operator.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidCreation {
    #[serde(with = "h160_hexadecimal")]
    pub node_operator: H160,
    pub group: BidGroup,
    /// Discount against the expected daily return, in basis points.
    pub discount_rate_bps: u16,
    /// Committed service duration in validation-credit days.
    pub vc_number: u32,
    /// Amount sent along with the request. Overpayment is refunded.
    #[serde(with = "u256_decimal")]
    pub paid_amount: U256,
}

/// A re-pricing of an existing bid by its owner.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidUpdate {
    #[serde(with = "h160_hexadecimal")]
    pub node_operator: H160,
    pub discount_rate_bps: u16,
    pub vc_number: u32,
    /// Extra payment supplied in case the new price exceeds the old one.
    #[serde(with = "u256_decimal")]
    pub paid_amount: U256,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidCancellation {
    #[serde(with = "h160_hexadecimal")]
    pub node_operator: H160,
}

/// A bid as recorded by the engine and returned when querying the auctioneer.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    #[serde(with = "h160_hexadecimal")]
    pub node_operator: H160,
    pub group: BidGroup,
    pub discount_rate_bps: u16,
    pub vc_number: u32,
    /// The price the operator actually paid, bond included.
    #[serde(with = "u256_decimal")]
    pub price_paid: U256,
    /// The ranking score assigned at submission or last update.
    #[serde(with = "u256_decimal")]
    pub ranking_score: U256,
}
