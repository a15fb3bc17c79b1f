//! Canonical storage of bids and node operator accounts.
//!
//! The store is the single source of truth; the score and main auction
//! indices only hold back references into it and are maintained by the
//! engine within the same call as any store mutation.

use crate::{error::AuctionError, Result};
use model::{Bid, BidGroup, BidId, NodeOperator};
use primitive_types::H160;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct BidStore {
    /// Live bids, competing in their group's score index.
    bids: HashMap<BidId, Bid>,
    /// Bids consumed by a trigger. Kept queryable for the rewards
    /// checkpoint collaborator until their cluster is cleared.
    consumed: HashMap<BidId, Bid>,
    operators: HashMap<H160, NodeOperator>,
    live_counts: HashMap<BidGroup, u32>,
}

impl BidStore {
    /// Reserves the next bid id for an operator, creating the account on
    /// first contact.
    pub fn next_bid_id(&mut self, operator: H160) -> BidId {
        let account = self
            .operators
            .entry(operator)
            .or_insert_with(|| NodeOperator::new(operator));
        let id = BidId::derive(operator, account.bids_submitted);
        account.bids_submitted += 1;
        id
    }

    pub fn insert(&mut self, bid: Bid) -> Result<()> {
        match self.bids.entry(bid.id) {
            Entry::Occupied(_) => Err(AuctionError::DuplicatedBid(bid.id)),
            Entry::Vacant(entry) => {
                let account = self
                    .operators
                    .entry(bid.node_operator)
                    .or_insert_with(|| NodeOperator::new(bid.node_operator));
                *account.active_bid_counts.entry(bid.group).or_default() += 1;
                *self.live_counts.entry(bid.group).or_default() += 1;
                entry.insert(bid);
                Ok(())
            }
        }
    }

    /// A live or consumed bid.
    pub fn get(&self, id: &BidId) -> Option<&Bid> {
        self.bids.get(id).or_else(|| self.consumed.get(id))
    }

    pub fn get_live(&self, id: &BidId) -> Result<&Bid> {
        self.bids.get(id).ok_or(AuctionError::BidNotFound(*id))
    }

    pub fn get_live_mut(&mut self, id: &BidId) -> Result<&mut Bid> {
        self.bids.get_mut(id).ok_or(AuctionError::BidNotFound(*id))
    }

    /// Removes a live bid entirely (withdrawal or forced eviction).
    pub fn remove(&mut self, id: &BidId) -> Result<Bid> {
        let bid = self.bids.remove(id).ok_or(AuctionError::BidNotFound(*id))?;
        self.decrement_counts(&bid);
        Ok(bid)
    }

    /// Moves a live bid to the consumed side map (cluster allocation).
    pub fn consume(&mut self, id: &BidId) -> Result<Bid> {
        let bid = self.bids.remove(id).ok_or(AuctionError::BidNotFound(*id))?;
        self.decrement_counts(&bid);
        self.consumed.insert(bid.id, bid);
        Ok(bid)
    }

    /// Drops consumed bids once their cluster's composition data is no
    /// longer needed.
    pub fn clear_consumed<'a>(&mut self, ids: impl IntoIterator<Item = &'a BidId>) {
        for id in ids {
            self.consumed.remove(id);
        }
    }

    fn decrement_counts(&mut self, bid: &Bid) {
        if let Some(account) = self.operators.get_mut(&bid.node_operator) {
            if let Some(count) = account.active_bid_counts.get_mut(&bid.group) {
                *count = count.saturating_sub(1);
            }
        }
        if let Some(count) = self.live_counts.get_mut(&bid.group) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn operator(&self, address: &H160) -> Option<&NodeOperator> {
        self.operators.get(address)
    }

    pub fn num_bids(&self, group: BidGroup) -> u32 {
        self.live_counts.get(&group).copied().unwrap_or(0)
    }

    pub fn is_whitelisted(&self, address: &H160) -> bool {
        self.operators
            .get(address)
            .map(|account| account.whitelisted)
            .unwrap_or(false)
    }

    pub fn add_to_whitelist(&mut self, address: H160) -> Result<()> {
        let account = self
            .operators
            .entry(address)
            .or_insert_with(|| NodeOperator::new(address));
        if account.whitelisted {
            return Err(AuctionError::AlreadyWhitelisted(address));
        }
        account.whitelisted = true;
        Ok(())
    }

    pub fn remove_from_whitelist(&mut self, address: H160) -> Result<()> {
        let account = self
            .operators
            .get_mut(&address)
            .filter(|account| account.whitelisted)
            .ok_or(AuctionError::NotWhitelisted(address))?;
        account.whitelisted = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;

    fn bid(store: &mut BidStore, operator: H160, group: BidGroup) -> Bid {
        let id = store.next_bid_id(operator);
        let bid = Bid {
            id,
            node_operator: operator,
            group,
            discount_rate_bps: 500,
            vc_number: 100,
            price_paid: U256::from(1_000),
            ranking_score: U256::from(10),
        };
        store.insert(bid).unwrap();
        bid
    }

    #[test]
    fn ids_are_unique_per_operator() {
        let mut store = BidStore::default();
        let operator = H160::from_low_u64_be(1);
        let first = store.next_bid_id(operator);
        let second = store.next_bid_id(operator);
        assert_ne!(first, second);
    }

    #[test]
    fn counts_follow_bid_lifecycle() {
        let mut store = BidStore::default();
        let operator = H160::from_low_u64_be(1);
        let group = BidGroup::JoinCluster4;
        let first = bid(&mut store, operator, group);
        let second = bid(&mut store, operator, group);
        assert_eq!(store.num_bids(group), 2);
        assert_eq!(store.operator(&operator).unwrap().active_bids_in(group), 2);

        store.remove(&first.id).unwrap();
        assert_eq!(store.num_bids(group), 1);
        assert_eq!(store.operator(&operator).unwrap().active_bids_in(group), 1);
        assert!(store.get(&first.id).is_none());

        store.consume(&second.id).unwrap();
        assert_eq!(store.num_bids(group), 0);
        assert_eq!(store.operator(&operator).unwrap().active_bids_in(group), 0);
        // Consumed bids remain queryable until cleared.
        assert_eq!(store.get(&second.id), Some(&second));
        store.clear_consumed([&second.id]);
        assert!(store.get(&second.id).is_none());
    }

    #[test]
    fn whitelist_misuse_errors() {
        let mut store = BidStore::default();
        let operator = H160::from_low_u64_be(1);
        assert_eq!(
            store.remove_from_whitelist(operator),
            Err(AuctionError::NotWhitelisted(operator))
        );
        store.add_to_whitelist(operator).unwrap();
        assert!(store.is_whitelisted(&operator));
        assert_eq!(
            store.add_to_whitelist(operator),
            Err(AuctionError::AlreadyWhitelisted(operator))
        );
        store.remove_from_whitelist(operator).unwrap();
        assert!(!store.is_whitelisted(&operator));
    }

    #[test]
    fn operator_account_survives_bid_removal() {
        let mut store = BidStore::default();
        let operator = H160::from_low_u64_be(1);
        let bid = bid(&mut store, operator, BidGroup::JoinCluster4);
        store.remove(&bid.id).unwrap();
        let account = store.operator(&operator).unwrap();
        assert_eq!(account.bids_submitted, 1);
    }
}
