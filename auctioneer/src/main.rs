use auction::engine::AuctionEngine;
use auctioneer::{
    auctionhouse::Auctionhouse,
    collaborators::{LoggingEscrow, StaticAccessControl},
    metrics::Metrics,
    serve_task,
};
use model::{AuctionConfigValues, BidGroup};
use primitive_types::{H160, U256};
use prometheus::Registry;
use std::{net::SocketAddr, sync::Arc};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Arguments {
    #[structopt(flatten)]
    shared: shared::arguments::Arguments,

    #[structopt(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8080")]
    bind_address: SocketAddr,

    /// Expected validator return per VC day in wei.
    #[structopt(
        long,
        env = "EXPECTED_DAILY_RETURN",
        default_value = "10000000000000000",
        parse(try_from_str = U256::from_dec_str),
    )]
    expected_daily_return: U256,

    /// Largest discount an operator may offer, in basis points.
    #[structopt(long, env = "MAX_DISCOUNT_RATE_BPS", default_value = "1500")]
    max_discount_rate_bps: u16,

    /// Smallest duration an operator may commit to, in VC days.
    #[structopt(long, env = "MIN_DURATION_DAYS", default_value = "30")]
    min_duration_days: u32,

    /// Bond added to the price for operators that are not whitelisted, in wei.
    #[structopt(
        long,
        env = "PROVIDER_BOND",
        default_value = "1000000000000000000",
        parse(try_from_str = U256::from_dec_str),
    )]
    provider_bond: U256,

    #[structopt(long, env = "JOIN_CLUSTER_4_SIZE", default_value = "4")]
    join_cluster_4_size: u32,

    #[structopt(long, env = "JOIN_CLUSTER_7_SIZE", default_value = "7")]
    join_cluster_7_size: u32,

    /// Addresses allowed to change the auction configuration, manage the
    /// whitelist and remove bids.
    #[structopt(long, env = "ADMINS", use_delimiter = true)]
    admins: Vec<H160>,

    /// The address allowed to trigger cluster creation.
    #[structopt(long, env = "ALLOCATOR")]
    allocator: H160,
}

#[tokio::main]
async fn main() {
    let args = Arguments::from_args();
    shared::tracing::initialize(args.shared.log_filter.as_str());
    tracing::info!("running auctioneer with {:#?}", args);

    let values = AuctionConfigValues {
        expected_daily_return: args.expected_daily_return,
        max_discount_rate_bps: args.max_discount_rate_bps,
        min_duration_days: args.min_duration_days,
        provider_bond: args.provider_bond,
        cluster_sizes: [
            (BidGroup::JoinCluster4, args.join_cluster_4_size),
            (BidGroup::JoinCluster7, args.join_cluster_7_size),
        ]
        .into_iter()
        .filter(|(_, size)| *size > 0)
        .collect(),
    };

    let registry = Registry::default();
    let metrics = Arc::new(Metrics::new(&registry));
    let engine = AuctionEngine::new(
        values,
        Arc::new(LoggingEscrow::default()),
        Arc::new(StaticAccessControl::new(args.admins, args.allocator)),
    );
    let auctionhouse = Arc::new(Auctionhouse::new(engine, metrics.clone()));

    let serve_task = serve_task(auctionhouse, metrics, registry, args.bind_address);
    let result = serve_task.await;
    tracing::error!(?result, "serve task exited");
}
