//! Error taxonomy of the engine.
//!
//! Validation and authorization errors are detected before any state is
//! mutated, so re-issuing a failed call is always safe.

use model::{BidGroup, BidId, ClusterId};
use primitive_types::{H160, U256};

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum AuctionError {
    // Input validation.
    #[error("discount rate {offered} bps exceeds the maximum of {max} bps")]
    DiscountRateTooHigh { offered: u16, max: u16 },
    #[error("duration of {offered} VC days is below the minimum of {min}")]
    DurationTooShort { offered: u32, min: u32 },
    #[error("bid group {0} is not recognized by the auction")]
    InvalidGroup(BidGroup),
    #[error("sent {sent} but the bid requires {required}")]
    InsufficientPayment { required: U256, sent: U256 },
    #[error("arithmetic overflow computing price or score")]
    NumericOverflow,

    // Authorization.
    #[error("sender {0:?} is not the owner of the bid")]
    SenderNotBidder(H160),
    #[error("sender {0:?} is not the allocator")]
    OnlyAllocator(H160),
    #[error("sender {0:?} is not an administrator")]
    SenderNotAdmin(H160),
    #[error("operator {0:?} is already whitelisted")]
    AlreadyWhitelisted(H160),
    #[error("operator {0:?} is not whitelisted")]
    NotWhitelisted(H160),

    // State.
    #[error("no group has a ready cluster")]
    MainAuctionEmpty,
    #[error("bid {0} does not exist")]
    BidNotFound(BidId),
    #[error("bid {0} already exists")]
    DuplicatedBid(BidId),
    #[error("cluster {0} does not exist")]
    ClusterNotFound(ClusterId),
    #[error("cluster {0} is not in the expected status")]
    WrongClusterStatus(ClusterId),

    #[error("escrow call failed: {0}")]
    Escrow(String),
}
