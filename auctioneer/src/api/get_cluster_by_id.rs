use crate::{api::convert_auction_error_to_reply, auctionhouse::Auctionhouse};
use auction::error::AuctionError;
use model::{ClusterId, VirtualCluster};
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn get_cluster_by_id_request() -> impl Filter<Extract = (ClusterId,), Error = Rejection> + Clone {
    warp::path!("clusters" / ClusterId).and(warp::get())
}

fn get_cluster_by_id_response(result: Result<VirtualCluster, AuctionError>) -> impl Reply {
    match result {
        Ok(cluster) => reply::with_status(reply::json(&cluster), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn get_cluster_by_id(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    get_cluster_by_id_request().and_then(move |id| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.cluster_details(&id).await;
            Result::<_, Infallible>::Ok(get_cluster_by_id_response(result))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use primitive_types::{H160, U256};
    use warp::test::request;

    #[tokio::test]
    async fn get_cluster_request_parses_the_id() {
        let id = ClusterId::derive(Utc::now(), &[H160::from_low_u64_be(1)], U256::exp10(16));
        let filter = get_cluster_by_id_request();
        let parsed = request()
            .path(&format!("/clusters/{}", id))
            .method("GET")
            .filter(&filter)
            .await
            .unwrap();
        assert_eq!(parsed, id);
    }

    #[tokio::test]
    async fn unknown_cluster_is_not_found() {
        let id = ClusterId::derive(Utc::now(), &[H160::from_low_u64_be(1)], U256::exp10(16));
        let response =
            get_cluster_by_id_response(Err(AuctionError::ClusterNotFound(id))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
