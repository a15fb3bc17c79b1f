use crate::{
    api::{convert_auction_error_to_reply, extract_payload},
    auctionhouse::Auctionhouse,
};
use auction::error::AuctionError;
use model::WhitelistRequest;
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn add_request() -> impl Filter<Extract = (WhitelistRequest,), Error = Rejection> + Clone {
    warp::path!("whitelist")
        .and(warp::post())
        .and(extract_payload())
}

fn remove_request() -> impl Filter<Extract = (WhitelistRequest,), Error = Rejection> + Clone {
    warp::path!("whitelist")
        .and(warp::delete())
        .and(extract_payload())
}

fn whitelist_response(result: Result<(), AuctionError>) -> impl Reply {
    match result {
        Ok(()) => reply::with_status(reply::json(&"OK"), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn add_to_whitelist(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    add_request().and_then(move |request: WhitelistRequest| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse
                .add_to_whitelist(request.caller, request.operator)
                .await;
            Result::<_, Infallible>::Ok(whitelist_response(result))
        }
    })
}

pub fn remove_from_whitelist(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    remove_request().and_then(move |request: WhitelistRequest| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse
                .remove_from_whitelist(request.caller, request.operator)
                .await;
            Result::<_, Infallible>::Ok(whitelist_response(result))
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
    async fn whitelist_requests_parse() {
        let payload = json!({
            "caller": "0x00000000000000000000000000000000000000ad",
            "operator": "0x0000000000000000000000000000000000000001",
        });
        let parsed = request()
            .path("/whitelist")
            .method("POST")
            .json(&payload)
            .filter(&add_request())
            .await
            .unwrap();
        assert_eq!(parsed.caller, H160::from_low_u64_be(0xad));
        assert_eq!(parsed.operator, H160::from_low_u64_be(1));
        let parsed = request()
            .path("/whitelist")
            .method("DELETE")
            .json(&payload)
            .filter(&remove_request())
            .await
            .unwrap();
        assert_eq!(parsed.operator, H160::from_low_u64_be(1));
    }

    #[tokio::test]
    async fn double_whitelisting_is_a_bad_request() {
        let response =
            whitelist_response(Err(AuctionError::AlreadyWhitelisted(H160::from_low_u64_be(1))))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
