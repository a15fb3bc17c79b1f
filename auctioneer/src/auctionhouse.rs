//! Async facade over the synchronous auction engine.
//!
//! The engine is single writer. All mutating endpoints take the write half of
//! the lock so an operation's validation, escrow calls and index updates are
//! observed atomically; reads share the read half.

use crate::metrics::Metrics;
use auction::{engine::AuctionEngine, error::AuctionError};
use model::{
    AuctionConfigValues, Bid, BidCancellation, BidCreation, BidGroup, BidId, BidUpdate, ClusterId,
    NodeOperator, VirtualCluster,
};
use primitive_types::H160;
use std::sync::Arc;
use tokio::sync::RwLock;

type Result<T> = std::result::Result<T, AuctionError>;

pub struct Auctionhouse {
    engine: RwLock<AuctionEngine>,
    metrics: Arc<Metrics>,
}

impl Auctionhouse {
    pub fn new(engine: AuctionEngine, metrics: Arc<Metrics>) -> Self {
        Self {
            engine: RwLock::new(engine),
            metrics,
        }
    }

    pub async fn submit_bid(&self, creation: BidCreation) -> Result<BidId> {
        let mut engine = self.engine.write().await;
        let result = engine.submit_bid(creation);
        self.update_gauges(&engine);
        result
    }

    pub async fn update_bid(&self, id: BidId, update: BidUpdate) -> Result<BidId> {
        let mut engine = self.engine.write().await;
        let result = engine.update_bid(id, update);
        self.update_gauges(&engine);
        result
    }

    pub async fn withdraw_bid(&self, id: BidId, cancellation: BidCancellation) -> Result<()> {
        let mut engine = self.engine.write().await;
        let result = engine.withdraw_bid(id, cancellation);
        self.update_gauges(&engine);
        result
    }

    pub async fn remove_bid(&self, caller: H160, id: BidId) -> Result<()> {
        let mut engine = self.engine.write().await;
        let result = engine.remove_bid(caller, id);
        self.update_gauges(&engine);
        result
    }

    pub async fn trigger(&self, caller: H160, group: Option<BidGroup>) -> Result<VirtualCluster> {
        let mut engine = self.engine.write().await;
        let result = engine.trigger(caller, group);
        self.update_gauges(&engine);
        result
    }

    pub async fn mark_deposited(&self, caller: H160, id: ClusterId) -> Result<()> {
        self.engine.write().await.mark_deposited(caller, id)
    }

    pub async fn clear_cluster(&self, caller: H160, id: ClusterId) -> Result<()> {
        self.engine.write().await.clear_cluster(caller, id)
    }

    pub async fn add_to_whitelist(&self, caller: H160, operator: H160) -> Result<()> {
        self.engine.write().await.add_to_whitelist(caller, operator)
    }

    pub async fn remove_from_whitelist(&self, caller: H160, operator: H160) -> Result<()> {
        self.engine
            .write()
            .await
            .remove_from_whitelist(caller, operator)
    }

    pub async fn set_config(&self, caller: H160, values: AuctionConfigValues) -> Result<()> {
        let mut engine = self.engine.write().await;
        let result = engine.set_config(caller, values);
        self.update_gauges(&engine);
        result
    }

    pub async fn bid_details(&self, id: &BidId) -> Result<Bid> {
        self.engine.read().await.bid_details(id)
    }

    pub async fn node_op_details(&self, address: &H160) -> Option<NodeOperator> {
        self.engine.read().await.node_op_details(address)
    }

    pub async fn winning_cluster(&self) -> Result<VirtualCluster> {
        self.engine.read().await.winning_cluster()
    }

    pub async fn cluster_details(&self, id: &ClusterId) -> Result<VirtualCluster> {
        self.engine.read().await.cluster_details(id)
    }

    pub async fn num_bids(&self, group: BidGroup) -> Result<u32> {
        self.engine.read().await.num_bids(group)
    }

    pub async fn config_values(&self) -> AuctionConfigValues {
        self.engine.read().await.config_values()
    }

    fn update_gauges(&self, engine: &AuctionEngine) {
        for group in BidGroup::ALL {
            if let Ok(count) = engine.num_bids(group) {
                self.metrics.set_live_bids(group, count);
            }
        }
        self.metrics.set_ready_clusters(engine.ready_clusters());
    }
}

#[cfg(test)]
pub mod test_util {
    use super::*;
    use crate::collaborators::{LoggingEscrow, StaticAccessControl};
    use prometheus::Registry;

    pub fn test_auctionhouse() -> Auctionhouse {
        let values = AuctionConfigValues::default();
        let engine = AuctionEngine::new(
            values,
            Arc::new(LoggingEscrow::default()),
            Arc::new(StaticAccessControl::new(
                [H160::from_low_u64_be(0xad)],
                H160::from_low_u64_be(0xa1),
            )),
        );
        Auctionhouse::new(engine, Arc::new(Metrics::new(&Registry::default())))
    }
}

#[cfg(test)]
mod tests {
    use super::{test_util::test_auctionhouse, *};
    use primitive_types::U256;

    #[tokio::test]
    async fn submitted_bid_is_readable() {
        let house = test_auctionhouse();
        let operator = H160::from_low_u64_be(1);
        let creation = BidCreation {
            node_operator: operator,
            group: BidGroup::JoinCluster4,
            discount_rate_bps: 500,
            vc_number: 100,
            // 100 ether, comfortably above price plus bond.
            paid_amount: U256::exp10(20),
        };
        let id = house.submit_bid(creation).await.unwrap();
        let bid = house.bid_details(&id).await.unwrap();
        assert_eq!(bid.node_operator, operator);
        assert_eq!(house.num_bids(BidGroup::JoinCluster4).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn trigger_requires_the_allocator() {
        let house = test_auctionhouse();
        let err = house
            .trigger(H160::from_low_u64_be(42), None)
            .await
            .unwrap_err();
        assert_eq!(err, AuctionError::OnlyAllocator(H160::from_low_u64_be(42)));
    }
}
