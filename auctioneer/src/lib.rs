pub mod api;
pub mod auctionhouse;
pub mod collaborators;
pub mod metrics;

use crate::{auctionhouse::Auctionhouse, metrics::Metrics};
use prometheus::Registry;
use shared::metrics::{serve_metrics, DEFAULT_METRICS_PORT};
use std::{net::SocketAddr, sync::Arc};
use tokio::{task, task::JoinHandle};

pub fn serve_task(
    auctionhouse: Arc<Auctionhouse>,
    metrics: Arc<Metrics>,
    registry: Registry,
    address: SocketAddr,
) -> JoinHandle<()> {
    let filter = api::handle_all_routes(auctionhouse, metrics);
    tracing::info!(%address, "serving auctioneer");
    task::spawn(warp::serve(filter).bind(address));

    let mut metrics_address = address;
    metrics_address.set_port(DEFAULT_METRICS_PORT);
    serve_metrics(registry, metrics_address)
}
