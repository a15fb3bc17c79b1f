use crate::{
    api::{convert_auction_error_to_reply, extract_payload},
    auctionhouse::Auctionhouse,
};
use auction::error::AuctionError;
use model::{TriggerRequest, VirtualCluster};
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn trigger_cluster_request() -> impl Filter<Extract = (TriggerRequest,), Error = Rejection> + Clone
{
    warp::path!("auction" / "trigger")
        .and(warp::post())
        .and(extract_payload())
}

fn trigger_cluster_response(result: Result<VirtualCluster, AuctionError>) -> impl Reply {
    match result {
        Ok(cluster) => reply::with_status(reply::json(&cluster), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn trigger_cluster(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    trigger_cluster_request().and_then(move |trigger: TriggerRequest| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.trigger(trigger.caller, trigger.group).await;
            Result::<_, Infallible>::Ok(trigger_cluster_response(result))
        }
    })
}
