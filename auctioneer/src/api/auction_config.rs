use crate::{
    api::{convert_auction_error_to_reply, extract_payload},
    auctionhouse::Auctionhouse,
};
use auction::error::AuctionError;
use model::{AuctionConfigValues, SetConfigRequest};
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn get_auction_config_request() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path!("config").and(warp::get())
}

fn get_auction_config_response(values: AuctionConfigValues) -> impl Reply {
    reply::with_status(reply::json(&values), StatusCode::OK)
}

pub fn get_auction_config(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    get_auction_config_request().and_then(move || {
        let auctionhouse = auctionhouse.clone();
        async move {
            let values = auctionhouse.config_values().await;
            Result::<_, Infallible>::Ok(get_auction_config_response(values))
        }
    })
}

fn set_auction_config_request(
) -> impl Filter<Extract = (SetConfigRequest,), Error = Rejection> + Clone {
    warp::path!("config").and(warp::put()).and(extract_payload())
}

fn set_auction_config_response(result: Result<(), AuctionError>) -> impl Reply {
    match result {
        Ok(()) => reply::with_status(reply::json(&"OK"), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn set_auction_config(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    set_auction_config_request().and_then(move |request: SetConfigRequest| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse
                .set_config(request.caller, request.config)
                .await;
            Result::<_, Infallible>::Ok(set_auction_config_response(result))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::response_body;
    use primitive_types::H160;
    use warp::test::request;

    #[tokio::test]
    async fn get_config_response_roundtrips() {
        let values = AuctionConfigValues::default();
        let response = get_auction_config_response(values.clone()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_body(response).await;
        let returned: AuctionConfigValues = serde_json::from_slice(&body).unwrap();
        assert_eq!(returned, values);
    }

    #[tokio::test]
    async fn set_config_request_parses() {
        let payload = SetConfigRequest {
            caller: H160::from_low_u64_be(0xad),
            config: AuctionConfigValues::default(),
        };
        let filter = set_auction_config_request();
        let parsed = request()
            .path("/config")
            .method("PUT")
            .json(&payload)
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(parsed, payload);
    }

    #[tokio::test]
    async fn set_config_requires_an_admin() {
        let caller = H160::from_low_u64_be(1);
        let response =
            set_auction_config_response(Err(AuctionError::SenderNotAdmin(caller))).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
