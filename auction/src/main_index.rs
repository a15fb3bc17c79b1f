//! Cross group ranking of the ready virtual clusters.
//!
//! Each group contributes at most its single current ready cluster, keyed by
//! the cluster's average ranking score. The same most-recent-wins tie-break
//! as the score index applies, so equal averages still order totally.

use crate::{error::AuctionError, Result};
use model::ClusterId;
use primitive_types::U256;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
struct ClusterKey {
    average_score: U256,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct MainAuctionIndex {
    by_score: BTreeMap<ClusterKey, ClusterId>,
    keys: HashMap<ClusterId, ClusterKey>,
    next_seq: u64,
}

impl MainAuctionIndex {
    /// Registers a ready cluster. The caller deregisters a group's previous
    /// cluster first; double registration of an id is an invariant breach.
    pub fn insert(&mut self, average_score: U256, id: ClusterId) -> Result<()> {
        if self.keys.contains_key(&id) {
            return Err(AuctionError::WrongClusterStatus(id));
        }
        let key = ClusterKey {
            average_score,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.by_score.insert(key, id);
        self.keys.insert(id, key);
        Ok(())
    }

    pub fn remove(&mut self, id: &ClusterId) -> Result<U256> {
        let key = self
            .keys
            .remove(id)
            .ok_or(AuctionError::ClusterNotFound(*id))?;
        self.by_score.remove(&key);
        Ok(key.average_score)
    }

    /// The globally best ready cluster. Read only.
    pub fn winner(&self) -> Option<(U256, ClusterId)> {
        self.by_score
            .iter()
            .next_back()
            .map(|(key, id)| (key.average_score, *id))
    }

    /// Removes and returns the winner.
    pub fn pop_winner(&mut self) -> Result<(U256, ClusterId)> {
        let (key, id) = self
            .by_score
            .pop_last()
            .ok_or(AuctionError::MainAuctionEmpty)?;
        self.keys.remove(&id);
        Ok((key.average_score, id))
    }

    pub fn contains(&self, id: &ClusterId) -> bool {
        self.keys.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_score.is_empty()
    }
}
