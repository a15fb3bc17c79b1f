//! Maintains the best virtual cluster of every group.
//!
//! After any bid mutation in a group the assembler re-derives the top
//! `cluster_size` distinct-operator set by walking the group's score index
//! from the top and skipping bids whose operator already holds a
//! higher-ranked slot. An operator's lower bids stay dormant in the index
//! and are promoted automatically once the active one leaves.

use crate::{
    error::AuctionError, main_index::MainAuctionIndex, score_index::ScoreIndex, store::BidStore,
    Result,
};
use chrono::{DateTime, Utc};
use model::{BidGroup, ClusterId, ClusterMember, ClusterStatus, VirtualCluster};
use primitive_types::{H160, U256};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ClusterAssembler {
    /// Every known cluster, including consumed ones that are kept queryable
    /// for the rewards checkpoint until explicitly cleared.
    clusters: HashMap<ClusterId, VirtualCluster>,
    /// The currently registered ready cluster of each group.
    current: HashMap<BidGroup, ClusterId>,
}

impl ClusterAssembler {
    /// Re-derives the group's virtual cluster and keeps the main auction
    /// index in sync. Returns the id of the group's ready cluster, if any.
    pub fn reassemble(
        &mut self,
        group: BidGroup,
        cluster_size: u32,
        index: &ScoreIndex,
        store: &BidStore,
        main: &mut MainAuctionIndex,
        now: DateTime<Utc>,
    ) -> Result<Option<ClusterId>> {
        let members = best_distinct_members(index, store, cluster_size)?;

        if members.len() < cluster_size as usize {
            // Not enough distinct operators.
            self.dissolve(group, main)?;
            return Ok(None);
        }

        if let Some(current) = self.current.get(&group) {
            // Scores matter too: an in-place re-price keeps the membership
            // but must refresh the stored scores and the main auction key.
            let unchanged = self
                .clusters
                .get(current)
                .map(|cluster| {
                    cluster
                        .members
                        .iter()
                        .map(|member| (member.bid_id, member.ranking_score))
                        .eq(members
                            .iter()
                            .map(|member| (member.bid_id, member.ranking_score)))
                })
                .unwrap_or(false);
            if unchanged {
                return Ok(Some(*current));
            }
            let old = *current;
            self.current.remove(&group);
            main.remove(&old)?;
            self.clusters.remove(&old);
        }

        let average_score = average_score(&members)?;
        let operators: Vec<H160> = members.iter().map(|member| member.node_operator).collect();
        let id = ClusterId::derive(now, &operators, average_score);
        let cluster = VirtualCluster {
            id,
            group,
            members,
            average_score,
            formed_at: now,
            status: ClusterStatus::Inactive,
        };
        main.insert(average_score, id)?;
        self.clusters.insert(id, cluster);
        self.current.insert(group, id);
        tracing::debug!(%group, cluster = %id, %average_score, "cluster registered");
        Ok(Some(id))
    }

    /// Deregisters and drops a group's ready cluster, if any.
    pub fn dissolve(&mut self, group: BidGroup, main: &mut MainAuctionIndex) -> Result<()> {
        if let Some(old) = self.current.remove(&group) {
            main.remove(&old)?;
            self.clusters.remove(&old);
            tracing::debug!(%group, cluster = %old, "cluster dissolved");
        }
        Ok(())
    }

    pub fn cluster(&self, id: &ClusterId) -> Option<&VirtualCluster> {
        self.clusters.get(id)
    }

    pub fn current_cluster_id(&self, group: BidGroup) -> Option<ClusterId> {
        self.current.get(&group).copied()
    }

    /// Transitions a popped cluster to `InCreation` and detaches it from its
    /// group. The caller already removed it from the main auction index.
    pub fn mark_in_creation(&mut self, id: &ClusterId) -> Result<VirtualCluster> {
        let cluster = self
            .clusters
            .get_mut(id)
            .ok_or(AuctionError::ClusterNotFound(*id))?;
        if cluster.status != ClusterStatus::Inactive {
            return Err(AuctionError::WrongClusterStatus(*id));
        }
        cluster.status = ClusterStatus::InCreation;
        self.current.retain(|_, current| current != id);
        Ok(cluster.clone())
    }

    /// Activation confirmation from the vault collaborator.
    pub fn mark_deposited(&mut self, id: &ClusterId) -> Result<()> {
        let cluster = self
            .clusters
            .get_mut(id)
            .ok_or(AuctionError::ClusterNotFound(*id))?;
        if cluster.status != ClusterStatus::InCreation {
            return Err(AuctionError::WrongClusterStatus(*id));
        }
        cluster.status = ClusterStatus::Deposited;
        Ok(())
    }

    /// Drops a consumed cluster's composition data. Ready clusters cannot be
    /// cleared; they dissolve through reassembly.
    pub fn clear_cluster(&mut self, id: &ClusterId) -> Result<VirtualCluster> {
        let status = self
            .clusters
            .get(id)
            .ok_or(AuctionError::ClusterNotFound(*id))?
            .status;
        if status == ClusterStatus::Inactive {
            return Err(AuctionError::WrongClusterStatus(*id));
        }
        self.clusters
            .remove(id)
            .ok_or(AuctionError::ClusterNotFound(*id))
    }
}

/// The `cluster_size` best bids with pairwise distinct operators. The walk
/// visits at most one winning bid per operator, everything else is skipped.
fn best_distinct_members(
    index: &ScoreIndex,
    store: &BidStore,
    cluster_size: u32,
) -> Result<Vec<ClusterMember>> {
    let mut members = Vec::with_capacity(cluster_size as usize);
    let mut seen: HashSet<H160> = HashSet::with_capacity(cluster_size as usize);
    for (score, bid_id) in index.descending() {
        if members.len() == cluster_size as usize {
            break;
        }
        let bid = store.get_live(&bid_id)?;
        if !seen.insert(bid.node_operator) {
            continue;
        }
        members.push(ClusterMember {
            bid_id,
            node_operator: bid.node_operator,
            ranking_score: score,
        });
    }
    Ok(members)
}

fn average_score(members: &[ClusterMember]) -> Result<U256> {
    let mut sum = U256::zero();
    for member in members {
        sum = sum
            .checked_add(member.ranking_score)
            .ok_or(AuctionError::NumericOverflow)?;
    }
    Ok(sum / U256::from(members.len()))
}
