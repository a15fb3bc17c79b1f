//! Node operator account state.

use crate::{bid::BidGroup, h160_hexadecimal};
use primitive_types::H160;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per provider account. Created lazily on first bid and never deleted so
/// that reputation survives across auction cycles.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOperator {
    #[serde(with = "h160_hexadecimal")]
    pub address: H160,
    /// Whitelisted operators are presumed pre-vetted and exempt from the bond.
    pub whitelisted: bool,
    pub reputation_score: u64,
    /// Live bids per group. Consumed and withdrawn bids do not count.
    pub active_bid_counts: BTreeMap<BidGroup, u32>,
    /// Total bids ever submitted; doubles as the nonce for bid id derivation.
    pub bids_submitted: u64,
}

impl NodeOperator {
    pub fn new(address: H160) -> Self {
        Self {
            address,
            whitelisted: false,
            reputation_score: 0,
            active_bid_counts: BTreeMap::new(),
            bids_submitted: 0,
        }
    }

    pub fn active_bids_in(&self, group: BidGroup) -> u32 {
        self.active_bid_counts.get(&group).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_operator_has_no_bids() {
        let operator = NodeOperator::new(H160::from_low_u64_be(1));
        assert_eq!(operator.active_bids_in(BidGroup::JoinCluster4), 0);
        assert_eq!(operator.bids_submitted, 0);
        assert!(!operator.whitelisted);
    }
}
