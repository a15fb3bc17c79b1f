use crate::{api::convert_auction_error_to_reply, auctionhouse::Auctionhouse};
use auction::error::AuctionError;
use model::BidGroup;
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn get_num_bids_request() -> impl Filter<Extract = (BidGroup,), Error = Rejection> + Clone {
    warp::path!("groups" / BidGroup / "bids" / "count").and(warp::get())
}

fn get_num_bids_response(result: Result<u32, AuctionError>) -> impl Reply {
    match result {
        Ok(count) => reply::with_status(reply::json(&count), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn get_num_bids(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    get_num_bids_request().and_then(move |group| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.num_bids(group).await;
            Result::<_, Infallible>::Ok(get_num_bids_response(result))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::response_body;
    use warp::test::request;

    #[tokio::test]
    async fn get_num_bids_request_parses_the_group() {
        let filter = get_num_bids_request();
        let parsed = request()
            .path("/groups/JOIN_CLUSTER_7/bids/count")
            .method("GET")
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(parsed, BidGroup::JoinCluster7);
    }

    #[tokio::test]
    async fn get_num_bids_response_ok() {
        let response = get_num_bids_response(Ok(12)).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_body(response).await;
        assert_eq!(body, b"12");
    }
}
