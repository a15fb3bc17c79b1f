//! Allocator and admin endpoints driving a popped cluster through its
//! remaining lifecycle.

use crate::{
    api::{convert_auction_error_to_reply, extract_payload},
    auctionhouse::Auctionhouse,
};
use auction::error::AuctionError;
use model::{CallerRequest, ClusterId};
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn mark_deposited_request(
) -> impl Filter<Extract = (ClusterId, CallerRequest), Error = Rejection> + Clone {
    warp::path!("clusters" / ClusterId / "deposited")
        .and(warp::post())
        .and(extract_payload())
}

fn clear_cluster_request(
) -> impl Filter<Extract = (ClusterId, CallerRequest), Error = Rejection> + Clone {
    warp::path!("clusters" / ClusterId)
        .and(warp::delete())
        .and(extract_payload())
}

fn lifecycle_response(result: Result<(), AuctionError>) -> impl Reply {
    match result {
        Ok(()) => reply::with_status(reply::json(&"OK"), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn mark_deposited(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    mark_deposited_request().and_then(move |id, request: CallerRequest| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.mark_deposited(request.caller, id).await;
            Result::<_, Infallible>::Ok(lifecycle_response(result))
        }
    })
}

pub fn clear_cluster(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    clear_cluster_request().and_then(move |id, request: CallerRequest| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.clear_cluster(request.caller, id).await;
            Result::<_, Infallible>::Ok(lifecycle_response(result))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use primitive_types::{H160, U256};
    use serde_json::json;
    use warp::test::request;

    fn cluster_id() -> ClusterId {
        ClusterId::derive(Utc::now(), &[H160::from_low_u64_be(1)], U256::exp10(16))
    }

    #[tokio::test]
    async fn mark_deposited_request_parses() {
        let id = cluster_id();
        let filter = mark_deposited_request();
        let (parsed_id, caller) = request()
            .path(&format!("/clusters/{}/deposited", id))
            .method("POST")
            .json(&json!({
                "caller": "0x00000000000000000000000000000000000000a1",
            }))
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(parsed_id, id);
        assert_eq!(caller.caller, H160::from_low_u64_be(0xa1));
    }

    #[tokio::test]
    async fn clear_cluster_request_parses() {
        let id = cluster_id();
        let filter = clear_cluster_request();
        let (parsed_id, _) = request()
            .path(&format!("/clusters/{}", id))
            .method("DELETE")
            .json(&json!({
                "caller": "0x00000000000000000000000000000000000000ad",
            }))
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(parsed_id, id);
    }

    #[tokio::test]
    async fn wrong_status_is_a_conflict() {
        let response =
            lifecycle_response(Err(AuctionError::WrongClusterStatus(cluster_id())))
                .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
