//! Helpers shared between the auctioneer binary and its tests: tracing
//! setup, the metrics endpoint and common command line argument plumbing.

pub mod arguments;
pub mod metrics;
pub mod tracing;
