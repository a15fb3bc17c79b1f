//! The mutable auction parameters as exposed by the config endpoint.

use crate::{bid::BidGroup, u256_decimal};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionConfigValues {
    /// Expected validator return per VC day in wei.
    #[serde(with = "u256_decimal")]
    pub expected_daily_return: U256,
    /// Largest discount an operator may offer, in basis points.
    pub max_discount_rate_bps: u16,
    /// Smallest duration an operator may commit to, in VC days.
    pub min_duration_days: u32,
    /// Bond added to the price for operators that are not whitelisted.
    #[serde(with = "u256_decimal")]
    pub provider_bond: U256,
    /// Members per cluster for each recognized group.
    pub cluster_sizes: BTreeMap<BidGroup, u32>,
}

impl Default for AuctionConfigValues {
    fn default() -> Self {
        Self {
            // 0.01 ether per VC day.
            expected_daily_return: U256::from(10_000_000_000_000_000u64),
            max_discount_rate_bps: 1_500,
            min_duration_days: 30,
            // 1 ether.
            provider_bond: U256::from(1_000_000_000_000_000_000u64),
            cluster_sizes: BidGroup::ALL
                .iter()
                .map(|group| {
                    let size = match group {
                        BidGroup::JoinCluster4 => 4,
                        BidGroup::JoinCluster7 => 7,
                    };
                    (*group, size)
                })
                .collect(),
        }
    }
}

impl AuctionConfigValues {
    pub fn cluster_size(&self, group: BidGroup) -> Option<u32> {
        self.cluster_sizes.get(&group).copied()
    }
}
