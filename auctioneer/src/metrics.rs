use model::BidGroup;
use prometheus::{HistogramOpts, HistogramVec, IntGauge, IntGaugeVec, Opts, Registry};
use std::{convert::Infallible, sync::Arc, time::Instant};
use warp::{reply::Response, Filter, Reply};

pub struct Metrics {
    requests: HistogramVec,
    live_bids: IntGaugeVec,
    ready_clusters: IntGauge,
}

impl Metrics {
    pub fn new(registry: &Registry) -> Self {
        let opts = HistogramOpts::new(
            "auction_api_requests",
            "API request durations labelled by route and response status code",
        );
        let requests = HistogramVec::new(opts, &["response", "request_type"]).unwrap();
        registry
            .register(Box::new(requests.clone()))
            .expect("Failed to register metric");
        let live_bids = IntGaugeVec::new(
            Opts::new("auction_live_bids", "Live bids per bid group"),
            &["group"],
        )
        .unwrap();
        registry
            .register(Box::new(live_bids.clone()))
            .expect("Failed to register metric");
        let ready_clusters = IntGauge::new(
            "auction_ready_clusters",
            "Clusters registered in the main auction",
        )
        .unwrap();
        registry
            .register(Box::new(ready_clusters.clone()))
            .expect("Failed to register metric");
        Self {
            requests,
            live_bids,
            ready_clusters,
        }
    }

    pub fn set_live_bids(&self, group: BidGroup, count: u32) {
        self.live_bids
            .with_label_values(&[group.as_str()])
            .set(count as i64);
    }

    pub fn set_ready_clusters(&self, count: usize) {
        self.ready_clusters.set(count as i64);
    }
}

// Response wrapper needed because we cannot inspect the reply's status code without consuming it
struct MetricsReply {
    response: Response,
}

impl Reply for MetricsReply {
    fn into_response(self) -> Response {
        self.response
    }
}

// Wrapper struct to annotate a reply with a handler label for logging purposes
pub struct LabelledReply {
    inner: Box<dyn Reply>,
    label: &'static str,
}

impl LabelledReply {
    pub fn new(inner: impl Reply + 'static, label: &'static str) -> Self {
        Self {
            inner: Box::new(inner),
            label,
        }
    }
}

impl Reply for LabelledReply {
    fn into_response(self) -> Response {
        self.inner.into_response()
    }
}

pub fn start_request() -> impl Filter<Extract = (Instant,), Error = Infallible> + Clone {
    warp::any().map(Instant::now)
}

pub fn end_request(metrics: Arc<Metrics>, timer: Instant, reply: LabelledReply) -> impl Reply {
    let LabelledReply { inner, label } = reply;
    let response = inner.into_response();
    let elapsed = timer.elapsed().as_secs_f64();
    metrics
        .requests
        .with_label_values(&[response.status().as_str(), label])
        .observe(elapsed);
    MetricsReply { response }
}
