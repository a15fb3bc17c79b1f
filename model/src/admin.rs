//! Payloads of the allocator and administrator endpoints.

use crate::{auction_config::AuctionConfigValues, bid::BidGroup, bid::BidId, h160_hexadecimal};
use primitive_types::H160;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    #[serde(with = "h160_hexadecimal")]
    pub caller: H160,
    /// Pops this group's cluster instead of the global winner when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<BidGroup>,
}

/// Body of endpoints that only need to authenticate the caller.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerRequest {
    #[serde(with = "h160_hexadecimal")]
    pub caller: H160,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistRequest {
    #[serde(with = "h160_hexadecimal")]
    pub caller: H160,
    #[serde(with = "h160_hexadecimal")]
    pub operator: H160,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBidRequest {
    #[serde(with = "h160_hexadecimal")]
    pub caller: H160,
    pub bid_id: BidId,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetConfigRequest {
    #[serde(with = "h160_hexadecimal")]
    pub caller: H160,
    pub config: AuctionConfigValues,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trigger_group_is_optional() {
        let request: TriggerRequest = serde_json::from_value(json!({
            "caller": "0x0000000000000000000000000000000000000001",
        }))
        .unwrap();
        assert_eq!(request.group, None);
        let request: TriggerRequest = serde_json::from_value(json!({
            "caller": "0x0000000000000000000000000000000000000001",
            "group": "JOIN_CLUSTER_7",
        }))
        .unwrap();
        assert_eq!(request.group, Some(BidGroup::JoinCluster7));
    }
}
