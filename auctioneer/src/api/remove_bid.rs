use crate::{
    api::{convert_auction_error_to_reply, extract_payload},
    auctionhouse::Auctionhouse,
};
use auction::error::AuctionError;
use model::RemoveBidRequest;
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn remove_bid_request() -> impl Filter<Extract = (RemoveBidRequest,), Error = Rejection> + Clone {
    warp::path!("admin" / "remove-bid")
        .and(warp::post())
        .and(extract_payload())
}

fn remove_bid_response(result: Result<(), AuctionError>) -> impl Reply {
    match result {
        Ok(()) => reply::with_status(reply::json(&"Removed"), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn remove_bid(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    remove_bid_request().and_then(move |request: RemoveBidRequest| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.remove_bid(request.caller, request.bid_id).await;
            Result::<_, Infallible>::Ok(remove_bid_response(result))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::BidId;
    use primitive_types::H160;
    use warp::test::request;

    #[tokio::test]
    async fn remove_bid_request_parses() {
        let payload = RemoveBidRequest {
            caller: H160::from_low_u64_be(0xad),
            bid_id: BidId::derive(H160::from_low_u64_be(1), 0),
        };
        let filter = remove_bid_request();
        let parsed = request()
            .path("/admin/remove-bid")
            .method("POST")
            .json(&payload)
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(parsed, payload);
    }

    #[tokio::test]
    async fn removing_by_non_admin_is_forbidden() {
        let caller = H160::from_low_u64_be(5);
        let response =
            remove_bid_response(Err(AuctionError::SenderNotAdmin(caller))).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
