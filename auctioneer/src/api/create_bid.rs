use crate::{
    api::{convert_auction_error_to_reply, extract_payload},
    auctionhouse::Auctionhouse,
};
use auction::error::AuctionError;
use model::{BidCreation, BidId};
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn create_bid_request() -> impl Filter<Extract = (BidCreation,), Error = Rejection> + Clone {
    warp::path!("bids")
        .and(warp::post())
        .and(extract_payload())
}

fn create_bid_response(result: Result<BidId, AuctionError>) -> impl Reply {
    match result {
        Ok(id) => reply::with_status(reply::json(&id), StatusCode::CREATED),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn create_bid(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    create_bid_request().and_then(move |creation| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.submit_bid(creation).await;
            Result::<_, Infallible>::Ok(create_bid_response(result))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::response_body;
    use model::BidGroup;
    use primitive_types::{H160, U256};
    use serde_json::json;
    use warp::test::request;

    #[tokio::test]
    async fn create_bid_request_parses_payload() {
        let payload = json!({
            "nodeOperator": "0x0000000000000000000000000000000000000001",
            "group": "JOIN_CLUSTER_4",
            "discountRateBps": 500,
            "vcNumber": 100,
            "paidAmount": "2000000000000000000",
        });
        let filter = create_bid_request();
        let creation = request()
            .path("/bids")
            .method("POST")
            .json(&payload)
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(creation.node_operator, H160::from_low_u64_be(1));
        assert_eq!(creation.group, BidGroup::JoinCluster4);
        assert_eq!(creation.discount_rate_bps, 500);
        assert_eq!(creation.vc_number, 100);
        assert_eq!(creation.paid_amount, U256::from(2u64) * U256::exp10(18));
    }

    #[tokio::test]
    async fn create_bid_response_created() {
        let id = BidId::derive(H160::from_low_u64_be(1), 0);
        let response = create_bid_response(Ok(id)).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_body(response).await;
        let returned: BidId = serde_json::from_slice(&body).unwrap();
        assert_eq!(returned, id);
    }

    #[tokio::test]
    async fn create_bid_response_rejects_underpayment() {
        let err = AuctionError::InsufficientPayment {
            required: U256::from(100),
            sent: U256::from(1),
        };
        let response = create_bid_response(Err(err)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_body(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errorType"], "InsufficientPayment");
    }
}
