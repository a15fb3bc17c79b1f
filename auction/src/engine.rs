//! The engine facade tying pricing, storage, ranking and assembly together.
//!
//! Every public operation validates fully before mutating anything, then
//! performs the store mutation and all index updates within the same
//! synchronous call, so the derived indices can never be observed out of
//! sync with the store.

use crate::{
    assembler::ClusterAssembler,
    config::AuctionConfig,
    error::AuctionError,
    escrow::{AccessControl, Escrow},
    main_index::MainAuctionIndex,
    pricing,
    score_index::ScoreIndex,
    store::BidStore,
    Result,
};
use chrono::Utc;
use model::{
    AuctionConfigValues, Bid, BidCancellation, BidCreation, BidGroup, BidId, BidUpdate, ClusterId,
    NodeOperator, VirtualCluster,
};
use primitive_types::{H160, U256};
use std::collections::HashMap;
use std::sync::Arc;

pub struct AuctionEngine {
    config: AuctionConfig,
    store: BidStore,
    scores: HashMap<BidGroup, ScoreIndex>,
    assembler: ClusterAssembler,
    main: MainAuctionIndex,
    escrow: Arc<dyn Escrow>,
    access: Arc<dyn AccessControl>,
}

impl AuctionEngine {
    pub fn new(
        values: AuctionConfigValues,
        escrow: Arc<dyn Escrow>,
        access: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            config: AuctionConfig::new(values),
            store: BidStore::default(),
            scores: HashMap::new(),
            assembler: ClusterAssembler::default(),
            main: MainAuctionIndex::default(),
            escrow,
            access,
        }
    }

    /// Submits a new bid. The operator pays the computed price (bond
    /// included unless whitelisted); any overpayment is refunded.
    pub fn submit_bid(&mut self, creation: BidCreation) -> Result<BidId> {
        self.config.cluster_size(creation.group)?;
        let whitelisted = self.store.is_whitelisted(&creation.node_operator);
        let price = pricing::price_to_pay(
            &self.config,
            whitelisted,
            creation.discount_rate_bps,
            creation.vc_number,
        )?;
        let score =
            pricing::auction_score(&self.config, creation.discount_rate_bps, creation.vc_number)?;
        if creation.paid_amount < price {
            return Err(AuctionError::InsufficientPayment {
                required: price,
                sent: creation.paid_amount,
            });
        }

        self.receive(creation.node_operator, price)?;
        self.refund(creation.node_operator, creation.paid_amount - price)?;

        let id = self.store.next_bid_id(creation.node_operator);
        self.store.insert(Bid {
            id,
            node_operator: creation.node_operator,
            group: creation.group,
            discount_rate_bps: creation.discount_rate_bps,
            vc_number: creation.vc_number,
            price_paid: price,
            ranking_score: score,
        })?;
        self.scores.entry(creation.group).or_default().insert(score, id);
        self.reassemble(creation.group)?;
        tracing::debug!(bid = %id, group = %creation.group, %score, "bid submitted");
        Ok(id)
    }

    /// Re-prices an existing bid in place. Outbidding requires the price
    /// delta to be supplied, downbidding refunds the surplus; either way the
    /// returned identifier resolves to the new score.
    pub fn update_bid(&mut self, id: BidId, update: BidUpdate) -> Result<BidId> {
        let bid = *self.store.get_live(&id)?;
        if bid.node_operator != update.node_operator {
            return Err(AuctionError::SenderNotBidder(update.node_operator));
        }
        let whitelisted = self.store.is_whitelisted(&bid.node_operator);
        let price = pricing::price_to_pay(
            &self.config,
            whitelisted,
            update.discount_rate_bps,
            update.vc_number,
        )?;
        let score =
            pricing::auction_score(&self.config, update.discount_rate_bps, update.vc_number)?;

        if price > bid.price_paid {
            let delta = price - bid.price_paid;
            if update.paid_amount < delta {
                return Err(AuctionError::InsufficientPayment {
                    required: delta,
                    sent: update.paid_amount,
                });
            }
            self.receive(bid.node_operator, delta)?;
            self.refund(bid.node_operator, update.paid_amount - delta)?;
        } else {
            // Surplus of the old price plus anything sent along comes back.
            self.refund(bid.node_operator, bid.price_paid - price)?;
            self.refund(bid.node_operator, update.paid_amount)?;
        }

        {
            let stored = self.store.get_live_mut(&id)?;
            stored.discount_rate_bps = update.discount_rate_bps;
            stored.vc_number = update.vc_number;
            stored.price_paid = price;
            stored.ranking_score = score;
        }
        self.scores.entry(bid.group).or_default().insert(score, id);
        self.reassemble(bid.group)?;
        tracing::debug!(bid = %id, %score, "bid updated");
        Ok(id)
    }

    /// Withdraws a bid, refunding its full price.
    pub fn withdraw_bid(&mut self, id: BidId, cancellation: BidCancellation) -> Result<()> {
        let bid = *self.store.get_live(&id)?;
        if bid.node_operator != cancellation.node_operator {
            return Err(AuctionError::SenderNotBidder(cancellation.node_operator));
        }
        self.evict(&bid)
    }

    /// Admin only forced eviction. The owner still gets the full refund.
    pub fn remove_bid(&mut self, caller: H160, id: BidId) -> Result<()> {
        self.ensure_admin(caller)?;
        let bid = *self.store.get_live(&id)?;
        self.evict(&bid)
    }

    fn evict(&mut self, bid: &Bid) -> Result<()> {
        self.refund(bid.node_operator, bid.price_paid)?;
        self.store.remove(&bid.id)?;
        self.score_index(bid.group)?.remove(&bid.id)?;
        self.reassemble(bid.group)?;
        tracing::debug!(bid = %bid.id, "bid withdrawn");
        Ok(())
    }

    /// Pops the winning ready cluster, consumes its member bids and hands
    /// the composition to the allocator. With a group given, that group's
    /// cluster is popped instead of the global winner.
    pub fn trigger(&mut self, caller: H160, group: Option<BidGroup>) -> Result<VirtualCluster> {
        if !self.access.is_allocator(caller) {
            return Err(AuctionError::OnlyAllocator(caller));
        }
        let id = match group {
            None => self.main.pop_winner()?.1,
            Some(group) => {
                let id = self
                    .assembler
                    .current_cluster_id(group)
                    .ok_or(AuctionError::MainAuctionEmpty)?;
                self.main.remove(&id)?;
                id
            }
        };
        let cluster = self.assembler.mark_in_creation(&id)?;
        for member in &cluster.members {
            self.store.consume(&member.bid_id)?;
            self.score_index(cluster.group)?.remove(&member.bid_id)?;
        }
        // Dormant bids of the consumed operators promote here.
        self.reassemble(cluster.group)?;
        tracing::info!(cluster = %id, group = %cluster.group, "cluster allocated");
        Ok(cluster)
    }

    /// Confirmation from the vault collaborator that the cluster went live.
    pub fn mark_deposited(&mut self, caller: H160, id: ClusterId) -> Result<()> {
        if !self.access.is_allocator(caller) {
            return Err(AuctionError::OnlyAllocator(caller));
        }
        self.assembler.mark_deposited(&id)
    }

    /// Drops a consumed cluster's composition data once the rewards
    /// checkpoint no longer needs it.
    pub fn clear_cluster(&mut self, caller: H160, id: ClusterId) -> Result<()> {
        self.ensure_admin(caller)?;
        let cluster = self.assembler.clear_cluster(&id)?;
        self.store
            .clear_consumed(cluster.members.iter().map(|member| &member.bid_id));
        Ok(())
    }

    pub fn add_to_whitelist(&mut self, caller: H160, operator: H160) -> Result<()> {
        self.ensure_admin(caller)?;
        self.store.add_to_whitelist(operator)
    }

    pub fn remove_from_whitelist(&mut self, caller: H160, operator: H160) -> Result<()> {
        self.ensure_admin(caller)?;
        self.store.remove_from_whitelist(operator)
    }

    /// Replaces the auction parameters. Existing bids keep the score they
    /// were assigned at submission; only cluster size changes re-assemble.
    pub fn set_config(&mut self, caller: H160, values: AuctionConfigValues) -> Result<()> {
        self.ensure_admin(caller)?;
        self.config.update(values);
        // Groups that lost their size dissolve inside reassemble.
        for group in BidGroup::ALL {
            self.reassemble(group)?;
        }
        Ok(())
    }

    pub fn bid_details(&self, id: &BidId) -> Result<Bid> {
        self.store
            .get(id)
            .copied()
            .ok_or(AuctionError::BidNotFound(*id))
    }

    pub fn node_op_details(&self, address: &H160) -> Option<NodeOperator> {
        self.store.operator(address).cloned()
    }

    /// The globally best ready cluster. Read only, side effect free.
    pub fn winning_cluster(&self) -> Result<VirtualCluster> {
        let (_, id) = self.main.winner().ok_or(AuctionError::MainAuctionEmpty)?;
        self.cluster_details(&id)
    }

    pub fn cluster_details(&self, id: &ClusterId) -> Result<VirtualCluster> {
        self.assembler
            .cluster(id)
            .cloned()
            .ok_or(AuctionError::ClusterNotFound(*id))
    }

    pub fn num_bids(&self, group: BidGroup) -> Result<u32> {
        self.config.cluster_size(group)?;
        Ok(self.store.num_bids(group))
    }

    pub fn config_values(&self) -> AuctionConfigValues {
        self.config.values().clone()
    }

    /// Number of clusters currently registered in the main auction.
    pub fn ready_clusters(&self) -> usize {
        self.main.len()
    }

    fn ensure_admin(&self, caller: H160) -> Result<()> {
        if self.access.is_admin(caller) {
            Ok(())
        } else {
            Err(AuctionError::SenderNotAdmin(caller))
        }
    }

    fn score_index(&mut self, group: BidGroup) -> Result<&mut ScoreIndex> {
        self.scores
            .get_mut(&group)
            .ok_or(AuctionError::InvalidGroup(group))
    }

    fn reassemble(&mut self, group: BidGroup) -> Result<()> {
        // Bids of a group whose size was removed from the config stay
        // withdrawable and updatable; there is just no cluster to form.
        let size = match self.config.cluster_size(group) {
            Ok(size) => size,
            Err(AuctionError::InvalidGroup(_)) => {
                return self.assembler.dissolve(group, &mut self.main);
            }
            Err(err) => return Err(err),
        };
        let index = self.scores.entry(group).or_default();
        self.assembler.reassemble(
            group,
            size,
            index,
            &self.store,
            &mut self.main,
            Utc::now(),
        )?;
        Ok(())
    }

    fn receive(&self, from: H160, amount: U256) -> Result<()> {
        self.escrow
            .receive(from, amount)
            .map_err(|err| AuctionError::Escrow(err.to_string()))
    }

    fn refund(&self, to: H160, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        self.escrow
            .refund(to, amount)
            .map_err(|err| AuctionError::Escrow(err.to_string()))
    }
}
