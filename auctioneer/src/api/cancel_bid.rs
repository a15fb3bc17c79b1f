use crate::{
    api::{convert_auction_error_to_reply, extract_payload},
    auctionhouse::Auctionhouse,
};
use auction::error::AuctionError;
use model::{BidCancellation, BidId};
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn cancel_bid_request() -> impl Filter<Extract = (BidId, BidCancellation), Error = Rejection> + Clone
{
    warp::path!("bids" / BidId)
        .and(warp::delete())
        .and(extract_payload())
}

fn cancel_bid_response(result: Result<(), AuctionError>) -> impl Reply {
    match result {
        Ok(()) => reply::with_status(reply::json(&"Cancelled"), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn cancel_bid(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    cancel_bid_request().and_then(move |id, cancellation| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.withdraw_bid(id, cancellation).await;
            Result::<_, Infallible>::Ok(cancel_bid_response(result))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::H160;
    use serde_json::json;
    use warp::test::request;

    #[tokio::test]
    async fn cancel_bid_request_parses() {
        let id = BidId::derive(H160::from_low_u64_be(2), 0);
        let filter = cancel_bid_request();
        let (parsed_id, cancellation) = request()
            .path(&format!("/bids/{}", id))
            .method("DELETE")
            .json(&json!({
                "nodeOperator": "0x0000000000000000000000000000000000000002",
            }))
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(parsed_id, id);
        assert_eq!(cancellation.node_operator, H160::from_low_u64_be(2));
    }

    #[tokio::test]
    async fn cancel_bid_response_not_found() {
        let id = BidId::derive(H160::from_low_u64_be(2), 0);
        let response = cancel_bid_response(Err(AuctionError::BidNotFound(id))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
