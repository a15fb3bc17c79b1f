//! Contains the bid, node operator and cluster types used by the auction
//! engine, with serialization as exposed by the HTTP API.
//!
//! This is in its own crate because we want to share these types between the
//! auction engine and the auctioneer service.

pub mod admin;
pub mod auction_config;
pub mod bid;
pub mod cluster;
pub mod h160_hexadecimal;
pub mod node_operator;
pub mod u256_decimal;

pub use admin::{
    CallerRequest, RemoveBidRequest, SetConfigRequest, TriggerRequest, WhitelistRequest,
};
pub use auction_config::AuctionConfigValues;
pub use bid::{Bid, BidCancellation, BidCreation, BidGroup, BidId, BidUpdate};
pub use cluster::{ClusterId, ClusterMember, ClusterStatus, VirtualCluster};
pub use node_operator::NodeOperator;
