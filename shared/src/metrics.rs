use prometheus::{Encoder, Registry, TextEncoder};
use std::net::SocketAddr;
use tokio::task::{self, JoinHandle};
use warp::Filter;

pub const DEFAULT_METRICS_PORT: u16 = 9586;

/// Serves the prometheus registry on `/metrics`.
pub fn serve_metrics(registry: Registry, address: SocketAddr) -> JoinHandle<()> {
    let filter = warp::path!("metrics").map(move || encode(&registry));
    tracing::info!(%address, "serving metrics");
    task::spawn(warp::serve(filter).bind(address))
}

fn encode(registry: &Registry) -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(err) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::error!(?err, "could not encode metrics");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::IntCounter;

    #[test]
    fn encodes_registered_metrics() {
        let registry = Registry::default();
        let counter = IntCounter::new("live_bids", "number of live bids").unwrap();
        registry.register(Box::new(counter.clone())).unwrap();
        counter.inc();
        let text = encode(&registry);
        assert!(text.contains("live_bids 1"));
    }
}
