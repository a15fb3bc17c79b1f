//! The bid ranking and cluster formation engine.
//!
//! Bids are priced and scored by [`pricing`], recorded in the [`store`],
//! ranked per group by a [`score_index::ScoreIndex`] and assembled by the
//! [`assembler`] into the best distinct-operator virtual cluster of each
//! group. The [`main_index::MainAuctionIndex`] ranks those clusters across
//! groups and backs the trigger operation that hands the winning cluster to
//! the allocator.
//!
//! The engine is synchronous and single-writer: every mutating call updates
//! the store and both derived indices before returning, so callers always
//! observe a consistent ranking.

pub mod assembler;
pub mod config;
pub mod engine;
pub mod error;
pub mod escrow;
pub mod main_index;
pub mod pricing;
pub mod score_index;
pub mod store;

pub use config::AuctionConfig;
pub use engine::AuctionEngine;
pub use error::AuctionError;
pub use escrow::{AccessControl, Escrow};

pub type Result<T> = std::result::Result<T, error::AuctionError>;
