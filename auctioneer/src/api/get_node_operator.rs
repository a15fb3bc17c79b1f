use crate::auctionhouse::Auctionhouse;
use model::NodeOperator;
use primitive_types::H160;
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn get_node_operator_request() -> impl Filter<Extract = (H160,), Error = Rejection> + Clone {
    warp::path!("operators" / H160).and(warp::get())
}

fn get_node_operator_response(result: Option<NodeOperator>) -> impl Reply {
    match result {
        Some(operator) => reply::with_status(reply::json(&operator), StatusCode::OK),
        None => reply::with_status(
            super::error("NotFound", "unknown node operator"),
            StatusCode::NOT_FOUND,
        ),
    }
}

pub fn get_node_operator(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    get_node_operator_request().and_then(move |address| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.node_op_details(&address).await;
            Result::<_, Infallible>::Ok(get_node_operator_response(result))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::response_body;
    use warp::test::request;

    #[tokio::test]
    async fn get_node_operator_request_parses_the_address() {
        let address = H160::from_low_u64_be(0x42);
        let filter = get_node_operator_request();
        let parsed = request()
            .path(&format!("/operators/{:x}", address))
            .method("GET")
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(parsed, address);
    }

    #[tokio::test]
    async fn get_node_operator_response_ok() {
        let operator = NodeOperator::new(H160::from_low_u64_be(0x42));
        let response = get_node_operator_response(Some(operator.clone())).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_body(response).await;
        let returned: NodeOperator = serde_json::from_slice(&body).unwrap();
        assert_eq!(returned, operator);
    }

    #[tokio::test]
    async fn get_node_operator_response_not_found() {
        let response = get_node_operator_response(None).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
