//! Virtual cluster types.

use crate::{bid::BidGroup, bid::BidId, h160_hexadecimal, u256_decimal};
use chrono::{DateTime, Utc};
use primitive_types::{H160, U256};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Identifier of a virtual cluster, derived from its formation time, the
/// member operator addresses and the average score. 32 bytes as hex.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct ClusterId(pub [u8; 32]);

impl ClusterId {
    pub fn derive(formed_at: DateTime<Utc>, members: &[H160], average_score: U256) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(formed_at.timestamp().to_be_bytes());
        for member in members {
            hasher.update(member.as_fixed_bytes());
        }
        let mut score = [0u8; 32];
        average_score.to_big_endian(&mut score);
        hasher.update(score);
        Self(hasher.finalize().into())
    }
}

impl Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ClusterId({})", self)
    }
}

impl FromStr for ClusterId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut value = [0u8; 32];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), value.as_mut())?;
        Ok(Self(value))
    }
}

impl Serialize for ClusterId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClusterId {
    fn deserialize<D>(deserializer: D) -> Result<ClusterId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor {}
        impl de::Visitor<'_> for Visitor {
            type Value = ClusterId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a hex encoded 32 byte cluster id")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                s.parse().map_err(|err| {
                    de::Error::custom(format!("failed to decode {:?} as cluster id: {}", s, err))
                })
            }
        }

        deserializer.deserialize_str(Visitor {})
    }
}

/// Lifecycle of a virtual cluster. `InCreation` and `Deposited` clusters have
/// been handed to the allocator; their composition stays queryable until
/// explicitly cleared.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterStatus {
    /// Ready and registered in the main auction, not yet allocated.
    Inactive,
    /// Popped by a trigger, awaiting external activation.
    InCreation,
    /// Activation confirmed by the vault collaborator.
    Deposited,
}

/// One slot of a virtual cluster.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMember {
    pub bid_id: BidId,
    #[serde(with = "h160_hexadecimal")]
    pub node_operator: H160,
    #[serde(with = "u256_decimal")]
    pub ranking_score: U256,
}

/// The current best distinct-operator combination of bids within one group.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualCluster {
    pub id: ClusterId,
    pub group: BidGroup,
    /// Ordered best to worst; no two members share a node operator.
    pub members: Vec<ClusterMember>,
    #[serde(with = "u256_decimal")]
    pub average_score: U256,
    pub formed_at: DateTime<Utc>,
    pub status: ClusterStatus,
}

impl VirtualCluster {
    pub fn member_operators(&self) -> Vec<H160> {
        self.members.iter().map(|member| member.node_operator).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn cluster_id_depends_on_all_inputs() {
        let at = Utc.timestamp_opt(1_000, 0).unwrap();
        let members = [H160::from_low_u64_be(1), H160::from_low_u64_be(2)];
        let id = ClusterId::derive(at, &members, 10.into());
        assert_eq!(id, ClusterId::derive(at, &members, 10.into()));
        assert_ne!(id, ClusterId::derive(at, &members, 11.into()));
        assert_ne!(
            id,
            ClusterId::derive(Utc.timestamp_opt(1_001, 0).unwrap(), &members, 10.into())
        );
        assert_ne!(
            id,
            ClusterId::derive(at, &[members[1], members[0]], 10.into())
        );
    }

    #[test]
    fn status_serialization() {
        assert_eq!(
            serde_json::to_value(ClusterStatus::InCreation).unwrap(),
            serde_json::json!("IN_CREATION")
        );
    }
}
