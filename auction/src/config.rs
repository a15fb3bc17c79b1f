//! Mutable auction parameters read on every pricing and assembly call.

use crate::error::AuctionError;
use model::{AuctionConfigValues, BidGroup};
use primitive_types::U256;

#[derive(Clone, Debug, Default)]
pub struct AuctionConfig {
    values: AuctionConfigValues,
}

impl AuctionConfig {
    pub fn new(values: AuctionConfigValues) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &AuctionConfigValues {
        &self.values
    }

    /// The number of members a cluster of this group has. Groups without a
    /// configured size are not recognized by the auction.
    pub fn cluster_size(&self, group: BidGroup) -> Result<u32, AuctionError> {
        self.values
            .cluster_size(group)
            .filter(|size| *size > 0)
            .ok_or(AuctionError::InvalidGroup(group))
    }

    pub fn expected_daily_return(&self) -> U256 {
        self.values.expected_daily_return
    }

    pub fn max_discount_rate_bps(&self) -> u16 {
        self.values.max_discount_rate_bps
    }

    pub fn min_duration_days(&self) -> u32 {
        self.values.min_duration_days
    }

    pub fn provider_bond(&self) -> U256 {
        self.values.provider_bond
    }

    /// Replaces all parameters at once. Authorization is the engine's job.
    pub fn update(&mut self, values: AuctionConfigValues) {
        self.values = values;
    }
}
