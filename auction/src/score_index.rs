//! Score ordered index over the live bids of one group.
//!
//! An ordered map from `(score, insertion seq)` to bid id together with a
//! reverse map for deletion by id. The insertion sequence makes the ordering
//! total even on score ties; the most recently inserted bid ranks ahead of
//! an earlier one with an equal score, which is the documented deterministic
//! tie-break.

use crate::{error::AuctionError, Result};
use model::BidId;
use primitive_types::U256;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
struct ScoreKey {
    score: U256,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct ScoreIndex {
    by_score: BTreeMap<ScoreKey, BidId>,
    keys: HashMap<BidId, ScoreKey>,
    next_seq: u64,
}

impl ScoreIndex {
    /// Inserts a bid at the given score. Re-inserting an id that is already
    /// present moves it to the new score and refreshes its tie-break rank.
    pub fn insert(&mut self, score: U256, id: BidId) {
        if let Some(key) = self.keys.remove(&id) {
            self.by_score.remove(&key);
        }
        let key = ScoreKey {
            score,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.by_score.insert(key, id);
        self.keys.insert(id, key);
    }

    /// Removes a bid and returns the score it was ranked at. A stale id is a
    /// caller bug surfaced as `BidNotFound`, never silently ignored.
    pub fn remove(&mut self, id: &BidId) -> Result<U256> {
        let key = self.keys.remove(id).ok_or(AuctionError::BidNotFound(*id))?;
        self.by_score.remove(&key);
        Ok(key.score)
    }

    pub fn contains(&self, id: &BidId) -> bool {
        self.keys.contains_key(id)
    }

    pub fn score_of(&self, id: &BidId) -> Option<U256> {
        self.keys.get(id).map(|key| key.score)
    }

    pub fn highest(&self) -> Option<(U256, BidId)> {
        self.descending().next()
    }

    /// All live bids from best to worst.
    pub fn descending(&self) -> impl Iterator<Item = (U256, BidId)> + '_ {
        self.by_score.iter().rev().map(|(key, id)| (key.score, *id))
    }

    /// The n-th best bid, 0 based. Only used with small n; walks n entries.
    pub fn nth_highest(&self, n: usize) -> Option<(U256, BidId)> {
        self.descending().nth(n)
    }

    /// The worst ranked bid above the given score, if any.
    pub fn successor(&self, score: U256) -> Option<(U256, BidId)> {
        let bound = ScoreKey {
            score,
            seq: u64::MAX,
        };
        self.by_score
            .range((std::ops::Bound::Excluded(bound), std::ops::Bound::Unbounded))
            .next()
            .map(|(key, id)| (key.score, *id))
    }

    /// The best ranked bid below the given score, if any.
    pub fn predecessor(&self, score: U256) -> Option<(U256, BidId)> {
        let bound = ScoreKey { score, seq: 0 };
        self.by_score
            .range(..bound)
            .next_back()
            .map(|(key, id)| (key.score, *id))
    }

    pub fn len(&self) -> usize {
        self.by_score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_score.is_empty()
    }
}
